use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use tintaria_core::{DomainError, DomainResult, ProductCode, ValueObject};

/// Colors whose pigments are solvent-based; goods in these colors are
/// flammable and taxed (see the pricing engine).
const FLAMMABLE_COLORS: &[&str] = &["black", "red", "orange"];

/// Package size a product ships in, in the catalog's base unit (milliliters).
///
/// The set is fixed: products only exist in these three tin sizes. The class
/// determines both the per-unit price key and the packaging-count rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightClass {
    W500,
    W1000,
    W2000,
}

impl WeightClass {
    /// Weight of a single unit, in milliliters.
    pub fn units(self) -> u32 {
        match self {
            WeightClass::W500 => 500,
            WeightClass::W1000 => 1000,
            WeightClass::W2000 => 2000,
        }
    }

    /// How many units form one shippable package.
    ///
    /// 500ml tins ship four to a package; larger tins ship individually.
    pub fn units_per_package(self) -> u32 {
        match self {
            WeightClass::W500 => 4,
            _ => 1,
        }
    }

    /// Check an order quantity against this class's packaging constraint.
    pub fn validate_quantity(self, code: &ProductCode, quantity: u32) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::invalid_quantity(
                code.clone(),
                quantity,
                "quantity must be positive",
            ));
        }
        let per_package = self.units_per_package();
        if quantity % per_package != 0 {
            return Err(DomainError::invalid_quantity(
                code.clone(),
                quantity,
                format!("quantity must be a multiple of {per_package} for {}ml tins", self.units()),
            ));
        }
        Ok(())
    }
}

impl ValueObject for WeightClass {}

/// A catalog product. Immutable once created.
///
/// `flammable` is not a free attribute: it is derived from the color when the
/// product is built, so two products of the same color can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    code: ProductCode,
    category: String,
    finish: String,
    color: String,
    weight: WeightClass,
    flammable: bool,
    unit_cost: f64,
}

impl Product {
    pub fn new(
        code: ProductCode,
        category: impl Into<String>,
        finish: impl Into<String>,
        color: impl Into<String>,
        weight: WeightClass,
        unit_cost: f64,
    ) -> DomainResult<Self> {
        let category = category.into();
        let finish = finish.into();
        let color = color.into();

        if category.trim().is_empty() {
            return Err(DomainError::validation("product category cannot be empty"));
        }
        if finish.trim().is_empty() {
            return Err(DomainError::validation("product finish cannot be empty"));
        }
        if color.trim().is_empty() {
            return Err(DomainError::validation("product color cannot be empty"));
        }
        if !unit_cost.is_finite() || unit_cost < 0.0 {
            return Err(DomainError::validation(format!(
                "unit cost must be non-negative, got {unit_cost}"
            )));
        }

        let flammable = is_flammable_color(&color);

        Ok(Self {
            code,
            category,
            finish,
            color,
            weight,
            flammable,
            unit_cost,
        })
    }

    pub fn code(&self) -> &ProductCode {
        &self.code
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn finish(&self) -> &str {
        &self.finish
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn weight(&self) -> WeightClass {
        self.weight
    }

    pub fn is_flammable(&self) -> bool {
        self.flammable
    }

    pub fn unit_cost(&self) -> f64 {
        self.unit_cost
    }
}

fn is_flammable_color(color: &str) -> bool {
    let color = color.to_lowercase();
    FLAMMABLE_COLORS.contains(&color.as_str())
}

/// Read-only lookup table of products by code.
///
/// Built once at startup; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    products: HashMap<ProductCode, Product>,
}

impl ProductCatalog {
    /// Build a catalog from a collection of products.
    ///
    /// Duplicate product codes are rejected: a code identifies exactly one
    /// product.
    pub fn build(products: impl IntoIterator<Item = Product>) -> DomainResult<Self> {
        let mut map = HashMap::new();
        for product in products {
            let code = product.code().clone();
            if map.insert(code.clone(), product).is_some() {
                return Err(DomainError::validation(format!(
                    "duplicate product code in catalog: {code}"
                )));
            }
        }
        Ok(Self { products: map })
    }

    pub fn get(&self, code: &ProductCode) -> Option<&Product> {
        self.products.get(code)
    }

    pub fn contains(&self, code: &ProductCode) -> bool {
        self.products.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }
}
