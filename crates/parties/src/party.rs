use serde::{Deserialize, Serialize};

use tintaria_core::{DomainError, DomainResult, Entity, PartyId};

/// Contact information for a party.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A registered party: customer, seller or transporter.
///
/// The address doubles as the party's pricing location (taxes and unit prices
/// are keyed by it). Capabilities live in role records, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    id: PartyId,
    name: String,
    address: String,
    contact: ContactInfo,
    blocked: bool,
}

impl Party {
    pub fn new(
        id: PartyId,
        name: impl Into<String>,
        address: impl Into<String>,
        contact: ContactInfo,
    ) -> DomainResult<Self> {
        let name = name.into();
        let address = address.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("party name cannot be empty"));
        }
        if address.trim().is_empty() {
            return Err(DomainError::validation("party address cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            address,
            contact,
            blocked: false,
        })
    }

    pub fn id_typed(&self) -> PartyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The party's address, used as pricing location for its orders.
    pub fn location(&self) -> &str {
        &self.address
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    /// Invariant helper: whether this party is allowed to transact.
    ///
    /// Blocked parties cannot take part in orders, in any role.
    pub fn can_transact(&self) -> bool {
        !self.blocked
    }
}

impl Entity for Party {
    type Id = PartyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
