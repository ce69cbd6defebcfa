use serde::{Deserialize, Serialize};

use tintaria_core::{DomainError, DomainResult, PartyId};

/// Customer capability: ties a customer to their assigned seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRole {
    party: PartyId,
    seller: PartyId,
}

impl CustomerRole {
    pub fn new(party: PartyId, seller: PartyId) -> Self {
        Self { party, seller }
    }

    pub fn party(&self) -> PartyId {
        self.party
    }

    pub fn seller(&self) -> PartyId {
        self.seller
    }
}

/// Seller capability.
///
/// Carries the seller's default commission percentage. The cumulative
/// commission total deliberately does NOT live here: it is kept in the
/// billing ledger, which is the single writer for accruals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SellerRole {
    party: PartyId,
    commission_rate: f64,
}

impl SellerRole {
    /// Default commission percentage when none is given.
    pub const DEFAULT_RATE: f64 = 5.0;

    pub fn new(party: PartyId, commission_rate: f64) -> DomainResult<Self> {
        if !commission_rate.is_finite() || !(0.0..=100.0).contains(&commission_rate) {
            return Err(DomainError::validation(format!(
                "commission rate must be a percentage within [0, 100], got {commission_rate}"
            )));
        }
        Ok(Self {
            party,
            commission_rate,
        })
    }

    pub fn with_default_rate(party: PartyId) -> Self {
        Self {
            party,
            commission_rate: Self::DEFAULT_RATE,
        }
    }

    pub fn party(&self) -> PartyId {
        self.party
    }

    pub fn commission_rate(&self) -> f64 {
        self.commission_rate
    }
}

/// Transport capability.
///
/// `sender` is a per-order decision: whether this transporter ships the
/// current order at the customer's expense. It is made exactly once per order
/// (checkout refuses an undecided transporter) and cleared before the next
/// order begins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransportRole {
    party: PartyId,
    cost_per_kg: f64,
    sender: Option<bool>,
}

impl TransportRole {
    pub fn new(party: PartyId, cost_per_kg: f64) -> DomainResult<Self> {
        if !cost_per_kg.is_finite() || cost_per_kg < 0.0 {
            return Err(DomainError::validation(format!(
                "cost per kg must be non-negative, got {cost_per_kg}"
            )));
        }
        Ok(Self {
            party,
            cost_per_kg,
            sender: None,
        })
    }

    pub fn party(&self) -> PartyId {
        self.party
    }

    pub fn cost_per_kg(&self) -> f64 {
        self.cost_per_kg
    }

    /// The sender decision for the current order, if already made.
    pub fn sender(&self) -> Option<bool> {
        self.sender
    }

    /// Record the sender decision for the current order.
    ///
    /// Fails if a decision was already made; use [`clear_sender`] between
    /// orders.
    ///
    /// [`clear_sender`]: TransportRole::clear_sender
    pub fn set_sender(&mut self, sender: bool) -> DomainResult<()> {
        if self.sender.is_some() {
            return Err(DomainError::validation(
                "sender decision already made for this order",
            ));
        }
        self.sender = Some(sender);
        Ok(())
    }

    /// Reset the sender decision at the end of an order.
    pub fn clear_sender(&mut self) {
        self.sender = None;
    }
}
