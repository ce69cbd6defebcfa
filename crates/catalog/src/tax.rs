use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use tintaria_core::{DomainError, DomainResult};

/// Per-location tax rates, as fractions (0.17 = 17%).
///
/// Locations are matched case-insensitively. A missing location yields `None`;
/// the pricing engine turns that into a hard `MissingTaxRate` error instead of
/// silently assuming 0%.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaxTable {
    rates: HashMap<String, f64>,
}

impl TaxTable {
    /// Build a tax table from `(location, rate)` pairs.
    ///
    /// Rates must lie within `[0, 1]`; duplicate locations are rejected.
    pub fn build<L, I>(rates: I) -> DomainResult<Self>
    where
        L: Into<String>,
        I: IntoIterator<Item = (L, f64)>,
    {
        let mut map = HashMap::new();
        for (location, rate) in rates {
            let location = location.into().to_lowercase();
            if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
                return Err(DomainError::validation(format!(
                    "tax rate for \"{location}\" must be a fraction within [0, 1], got {rate}"
                )));
            }
            if map.insert(location.clone(), rate).is_some() {
                return Err(DomainError::validation(format!(
                    "duplicate tax table entry for \"{location}\""
                )));
            }
        }
        Ok(Self { rates: map })
    }

    pub fn rate(&self, location: &str) -> Option<f64> {
        self.rates.get(&location.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_lookup_is_case_insensitive() {
        let table = TaxTable::build([("Goiania", 0.17), ("bahia", 0.12)]).unwrap();
        assert_eq!(table.rate("goiania"), Some(0.17));
        assert_eq!(table.rate("GOIANIA"), Some(0.17));
        assert_eq!(table.rate("bahia"), Some(0.12));
    }

    #[test]
    fn missing_location_is_none_not_zero() {
        let table = TaxTable::build([("goiania", 0.17)]).unwrap();
        assert_eq!(table.rate("atlantis"), None);
    }

    #[test]
    fn build_rejects_out_of_range_rates() {
        assert!(TaxTable::build([("goiania", 1.5)]).is_err());
        assert!(TaxTable::build([("goiania", -0.1)]).is_err());
    }

    #[test]
    fn build_rejects_duplicate_locations() {
        assert!(TaxTable::build([("Goiania", 0.17), ("goiania", 0.18)]).is_err());
    }
}
