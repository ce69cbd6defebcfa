use serde::{Deserialize, Serialize};

use tintaria_core::{DomainError, DomainResult, ValueObject};

/// One payment of an installment plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub amount: f64,
    pub due_in_days: u32,
}

impl ValueObject for Installment {}

/// Split a final total into equal installments over the given due-day offsets.
///
/// Every installment is `total_price / offsets.len()`, with no remainder
/// redistribution: once amounts are rounded for display, their sum may differ
/// from the total by up to half a cent per installment. The schedule preserves
/// the caller-given offset order; it does not sort by due date.
pub fn schedule(total_price: f64, due_day_offsets: &[u32]) -> DomainResult<Vec<Installment>> {
    if due_day_offsets.is_empty() {
        return Err(DomainError::invalid_installment(
            "at least one due-day offset is required",
        ));
    }
    if !total_price.is_finite() || total_price < 0.0 {
        return Err(DomainError::invalid_installment(format!(
            "total price must be non-negative, got {total_price}"
        )));
    }

    let amount = total_price / due_day_offsets.len() as f64;
    Ok(due_day_offsets
        .iter()
        .map(|&due_in_days| Installment {
            amount,
            due_in_days,
        })
        .collect())
}
