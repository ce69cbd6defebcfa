//! Domain error model.

use thiserror::Error;

use crate::id::{PartyId, ProductCode};

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures surfaced synchronously
/// to the immediate caller. Nothing here is retried automatically; interactive
/// re-prompting is the shell's concern, not the domain's.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// The product code is not present in the product catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductCode),

    /// A cart line for this product code already exists.
    #[error("duplicate line for product: {0}")]
    DuplicateLine(ProductCode),

    /// No cart line exists for this product code.
    #[error("no line for product: {0}")]
    LineNotFound(ProductCode),

    /// Quantity is zero or violates the product's packaging multiple.
    #[error("invalid quantity {quantity} for product {code}: {reason}")]
    InvalidQuantity {
        code: ProductCode,
        quantity: u32,
        reason: String,
    },

    /// Discount percentage outside the `[0, 100]` range.
    #[error("invalid discount {discount}%: must be within 0..=100")]
    InvalidDiscount { discount: f64 },

    /// The price book has no entry for this product at the given location/tier.
    ///
    /// Always a hard error: silently omitting an unpriced line would corrupt
    /// the order total.
    #[error("no price for product {code} at location \"{location}\", tier \"{tier}\"")]
    PriceNotFound {
        code: ProductCode,
        location: String,
        tier: String,
    },

    /// The tax table has no rate for this location.
    #[error("no tax rate registered for location \"{0}\"")]
    MissingTaxRate(String),

    /// The installment plan is unusable (e.g. no due-day offsets).
    #[error("invalid installment plan: {0}")]
    InvalidInstallment(String),

    /// The transporter's sender decision was never made for this order.
    #[error("transporter {0} has no sender decision for this order")]
    TransportUnresolved(PartyId),

    /// A blocked party attempted to take part in an order.
    #[error("party {0} is blocked and cannot transact")]
    PartyBlocked(PartyId),

    /// A residual validation or invariant failure.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_quantity(code: ProductCode, quantity: u32, reason: impl Into<String>) -> Self {
        Self::InvalidQuantity {
            code,
            quantity,
            reason: reason.into(),
        }
    }

    pub fn invalid_installment(msg: impl Into<String>) -> Self {
        Self::InvalidInstallment(msg.into())
    }
}
