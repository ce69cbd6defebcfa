use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tintaria_catalog::{PriceBook, TaxTable, WeightClass};
use tintaria_core::{DomainError, DomainResult, ProductCode};

use crate::cart::Cart;

/// Per-line pricing breakdown, for report rendering by the caller.
///
/// `unit_tax` is zero for non-flammable goods: only flammable goods are taxed
/// (explicit business rule, not an omission).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineBreakdown {
    pub code: ProductCode,
    pub quantity: u32,
    pub discount: f64,
    pub unit_price: f64,
    pub discounted_unit: f64,
    pub unit_tax: f64,
    pub line_total: f64,
    pub flammable: bool,
    pub weight: WeightClass,
}

/// Order-level aggregates, recomputed from scratch on every call.
///
/// `total_price` is tax-inclusive and pre-transport-fee; weights are in the
/// catalog base unit (milliliters). `volumes` counts shippable packaging:
/// 500ml tins are counted in packages of four, other classes in raw units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub lines: Vec<LineBreakdown>,
    pub total_price: f64,
    pub total_weight: u64,
    pub flammable_weight: u64,
    pub non_flammable_weight: u64,
    pub volumes: BTreeMap<WeightClass, u32>,
}

/// Round a monetary value to 2 decimal places.
///
/// Presentation-time only: internal accumulation keeps full precision so
/// rounding error cannot compound across lines.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn apply_discount(unit_price: f64, discount: f64) -> f64 {
    unit_price * (1.0 - discount / 100.0)
}

/// Price the cart's current contents at a location under a pricing tier.
///
/// Side-effect-free full recomputation: no prior aggregate is ever reused, so
/// there is no incremental state to drift. Any unpriced line or unknown tax
/// location aborts the whole computation; a partial total is worse than no
/// total.
pub fn price_order(
    cart: &Cart,
    prices: &PriceBook,
    taxes: &TaxTable,
    location: &str,
    tier: &str,
) -> DomainResult<OrderTotals> {
    // Resolved up front so an unknown location fails fast even for a cart of
    // purely non-flammable (untaxed) goods.
    let tax_rate = taxes
        .rate(location)
        .ok_or_else(|| DomainError::MissingTaxRate(location.to_owned()))?;

    let mut lines = Vec::with_capacity(cart.line_count());
    let mut total_price = 0.0_f64;
    let mut total_weight = 0_u64;
    let mut flammable_weight = 0_u64;
    let mut non_flammable_weight = 0_u64;
    let mut volumes: BTreeMap<WeightClass, u32> = BTreeMap::new();

    for line in cart.lines() {
        let product = cart
            .catalog()
            .get(&line.code)
            .ok_or_else(|| DomainError::UnknownProduct(line.code.clone()))?;

        let unit_price = prices
            .unit_price(product, location, tier)
            .ok_or_else(|| DomainError::PriceNotFound {
                code: line.code.clone(),
                location: location.to_owned(),
                tier: tier.to_owned(),
            })?;

        let discounted_unit = apply_discount(unit_price, line.discount);
        let unit_tax = if product.is_flammable() {
            discounted_unit * tax_rate
        } else {
            0.0
        };
        let line_total = (discounted_unit + unit_tax) * f64::from(line.quantity);

        let weight_class = product.weight();
        let line_weight = u64::from(weight_class.units()) * u64::from(line.quantity);
        total_weight += line_weight;
        if product.is_flammable() {
            flammable_weight += line_weight;
        } else {
            non_flammable_weight += line_weight;
        }

        // W500 tins ship four to a package; line quantities are validated as
        // multiples of four, so the division is exact.
        *volumes.entry(weight_class).or_insert(0) += line.quantity / weight_class.units_per_package();

        total_price += line_total;

        lines.push(LineBreakdown {
            code: line.code.clone(),
            quantity: line.quantity,
            discount: line.discount,
            unit_price,
            discounted_unit,
            unit_tax,
            line_total,
            flammable: product.is_flammable(),
            weight: weight_class,
        });
    }

    Ok(OrderTotals {
        lines,
        total_price,
        total_weight,
        flammable_weight,
        non_flammable_weight,
        volumes,
    })
}
