use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use tintaria_core::{DomainError, DomainResult};

use crate::product::{Product, WeightClass};

/// Full key of one price book entry.
///
/// A unit price depends on the whole attribute tuple plus where the goods are
/// sold (`location`) and under which pricing scheme (`tier`). Locations are
/// matched case-insensitively; the other components verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceKey {
    category: String,
    finish: String,
    color: String,
    weight: WeightClass,
    location: String,
    tier: String,
}

impl PriceKey {
    pub fn new(
        category: impl Into<String>,
        finish: impl Into<String>,
        color: impl Into<String>,
        weight: WeightClass,
        location: impl Into<String>,
        tier: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            finish: finish.into(),
            color: color.into(),
            weight,
            location: location.into().to_lowercase(),
            tier: tier.into(),
        }
    }

    /// Key for a catalog product at a given location/tier.
    pub fn for_product(product: &Product, location: &str, tier: &str) -> Self {
        Self::new(
            product.category(),
            product.finish(),
            product.color(),
            product.weight(),
            location,
            tier,
        )
    }
}

/// Read-only unit-price lookup table.
///
/// Invariant (enforced by the pricing engine, not here): every
/// (product, location, tier) combination the shop actually sells must have an
/// entry. Lookups return `None` on a miss; callers must treat that as a hard
/// error rather than defaulting.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceBook {
    entries: HashMap<PriceKey, f64>,
}

impl PriceBook {
    /// Build a price book from `(key, unit_price)` pairs.
    ///
    /// Rejects non-finite or negative prices and duplicate keys.
    pub fn build(entries: impl IntoIterator<Item = (PriceKey, f64)>) -> DomainResult<Self> {
        let mut map = HashMap::new();
        for (key, price) in entries {
            if !price.is_finite() || price < 0.0 {
                return Err(DomainError::validation(format!(
                    "unit price must be non-negative, got {price}"
                )));
            }
            if map.insert(key.clone(), price).is_some() {
                return Err(DomainError::validation(format!(
                    "duplicate price book entry: {key:?}"
                )));
            }
        }
        Ok(Self { entries: map })
    }

    /// Unit price of a product at a location under a pricing tier.
    pub fn unit_price(&self, product: &Product, location: &str, tier: &str) -> Option<f64> {
        self.entries
            .get(&PriceKey::for_product(product, location, tier))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tintaria_core::ProductCode;

    fn black_500() -> Product {
        Product::new(
            ProductCode::new("APF-BLK-500").unwrap(),
            "Acrilico premium",
            "fosco",
            "black",
            WeightClass::W500,
            2.5,
        )
        .unwrap()
    }

    #[test]
    fn unit_price_matches_full_attribute_tuple() {
        let book = PriceBook::build([(
            PriceKey::new(
                "Acrilico premium",
                "fosco",
                "black",
                WeightClass::W500,
                "goiania",
                "711",
            ),
            4.0,
        )])
        .unwrap();

        let product = black_500();
        assert_eq!(book.unit_price(&product, "goiania", "711"), Some(4.0));
        // Unknown tier or location is a miss, never a default.
        assert_eq!(book.unit_price(&product, "goiania", "712"), None);
        assert_eq!(book.unit_price(&product, "bahia", "711"), None);
    }

    #[test]
    fn location_matching_is_case_insensitive() {
        let book = PriceBook::build([(
            PriceKey::new(
                "Acrilico premium",
                "fosco",
                "black",
                WeightClass::W500,
                "Goiania",
                "711",
            ),
            4.0,
        )])
        .unwrap();

        assert_eq!(book.unit_price(&black_500(), "goiania", "711"), Some(4.0));
        assert_eq!(book.unit_price(&black_500(), "GOIANIA", "711"), Some(4.0));
    }

    #[test]
    fn build_rejects_negative_price_and_duplicates() {
        let key = PriceKey::new(
            "Acrilico premium",
            "fosco",
            "black",
            WeightClass::W500,
            "goiania",
            "711",
        );
        assert!(PriceBook::build([(key.clone(), -0.5)]).is_err());
        assert!(PriceBook::build([(key.clone(), 4.0), (key, 5.0)]).is_err());
    }
}
