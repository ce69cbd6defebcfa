use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tintaria_core::{DomainError, DomainResult, OrderId, PartyId};

/// One commission accrual, kept as the seller's sales history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionEntry {
    pub seller: PartyId,
    pub order: OrderId,
    pub price_base: f64,
    pub amount: f64,
    pub accrued_at: DateTime<Utc>,
}

/// Process-wide seller commission ledger.
///
/// This is the one piece of mutable state that outlives an order session. It
/// is explicitly injected wherever commission is accrued, and accrual is the
/// only write path, so per-seller totals only ever increase. There is no
/// internal concurrency guard: callers targeting concurrent use must
/// serialize updates externally.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommissionLedger {
    totals: HashMap<PartyId, f64>,
    entries: Vec<CommissionEntry>,
}

impl CommissionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accrue commission for a sale and return the accrued amount.
    ///
    /// `price_base` is the order total **before** the transport fee: transport
    /// fees earn no commission, even though the displayed final total
    /// includes them.
    pub fn accrue(
        &mut self,
        seller: PartyId,
        order: OrderId,
        price_base: f64,
        rate_percent: f64,
    ) -> DomainResult<f64> {
        if !price_base.is_finite() || price_base < 0.0 {
            return Err(DomainError::validation(format!(
                "commission base must be non-negative, got {price_base}"
            )));
        }
        if !rate_percent.is_finite() || !(0.0..=100.0).contains(&rate_percent) {
            return Err(DomainError::validation(format!(
                "commission rate must be a percentage within [0, 100], got {rate_percent}"
            )));
        }

        let amount = price_base * rate_percent / 100.0;
        *self.totals.entry(seller).or_insert(0.0) += amount;
        self.entries.push(CommissionEntry {
            seller,
            order,
            price_base,
            amount,
            accrued_at: Utc::now(),
        });

        tracing::debug!(%seller, %order, amount, "commission accrued");
        Ok(amount)
    }

    /// Cumulative commission earned by a seller across all orders.
    pub fn total_for(&self, seller: PartyId) -> f64 {
        self.totals.get(&seller).copied().unwrap_or(0.0)
    }

    /// The seller's accruals, oldest first.
    pub fn entries_for(&self, seller: PartyId) -> impl Iterator<Item = &CommissionEntry> {
        self.entries.iter().filter(move |e| e.seller == seller)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accrue_computes_base_times_rate() {
        let mut ledger = CommissionLedger::new();
        let seller = PartyId::new();

        let amount = ledger.accrue(seller, OrderId::new(), 200.0, 5.0).unwrap();
        assert!((amount - 10.0).abs() < 1e-9);
        assert!((ledger.total_for(seller) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn repeated_accruals_accumulate_additively() {
        let mut ledger = CommissionLedger::new();
        let seller = PartyId::new();

        ledger.accrue(seller, OrderId::new(), 100.0, 5.0).unwrap();
        ledger.accrue(seller, OrderId::new(), 50.0, 10.0).unwrap();

        assert!((ledger.total_for(seller) - 10.0).abs() < 1e-9);
        assert_eq!(ledger.entries_for(seller).count(), 2);
    }

    #[test]
    fn totals_are_per_seller() {
        let mut ledger = CommissionLedger::new();
        let dave = PartyId::new();
        let frank = PartyId::new();

        ledger.accrue(dave, OrderId::new(), 100.0, 5.0).unwrap();
        ledger.accrue(frank, OrderId::new(), 100.0, 10.0).unwrap();

        assert!((ledger.total_for(dave) - 5.0).abs() < 1e-9);
        assert!((ledger.total_for(frank) - 10.0).abs() < 1e-9);
        assert_eq!(ledger.total_for(PartyId::new()), 0.0);
    }

    #[test]
    fn accrue_rejects_negative_base_and_bad_rate() {
        let mut ledger = CommissionLedger::new();
        let seller = PartyId::new();

        assert!(ledger.accrue(seller, OrderId::new(), -1.0, 5.0).is_err());
        assert!(ledger.accrue(seller, OrderId::new(), 100.0, -5.0).is_err());
        assert!(ledger.accrue(seller, OrderId::new(), 100.0, 101.0).is_err());
        // A failed accrual leaves no trace.
        assert_eq!(ledger.entry_count(), 0);
        assert_eq!(ledger.total_for(seller), 0.0);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: a seller's total is exactly the running sum of the
            /// accrued amounts, in accrual order.
            #[test]
            fn total_is_running_sum_of_accruals(
                bases in prop::collection::vec(0.0_f64..10_000.0, 1..10),
                rate in 0.0_f64..=100.0,
            ) {
                let mut ledger = CommissionLedger::new();
                let seller = PartyId::new();

                let mut expected = 0.0_f64;
                for base in bases {
                    let amount = ledger.accrue(seller, OrderId::new(), base, rate).unwrap();
                    prop_assert_eq!(amount, base * rate / 100.0);
                    expected += amount;
                    prop_assert_eq!(ledger.total_for(seller), expected);
                }
            }
        }
    }
}
