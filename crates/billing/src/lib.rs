//! Billing domain module (commission, installments, checkout).
//!
//! Everything that happens once a cart is finished: the seller commission
//! ledger, the installment payment scheduler, and the checkout orchestration
//! that sequences pricing, transport fee, commission and scheduling in the
//! mandatory order.

pub mod checkout;
pub mod commission;
pub mod installments;

pub use checkout::{CheckoutOutcome, CheckoutRequest, checkout};
pub use commission::{CommissionEntry, CommissionLedger};
pub use installments::{Installment, schedule};
