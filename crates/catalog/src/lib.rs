//! Catalog domain module (products, prices, taxes).
//!
//! Reference data for order composition: the product catalog, the location-
//! and tier-keyed price book, and the per-location tax table. Everything in
//! this crate is built once at startup and read-only thereafter, which makes
//! it safe to share across readers.

pub mod prices;
pub mod product;
pub mod tax;

pub use prices::{PriceBook, PriceKey};
pub use product::{Product, ProductCatalog, WeightClass};
pub use tax::TaxTable;
