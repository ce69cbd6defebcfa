use tintaria_core::{DomainError, DomainResult};
use tintaria_parties::TransportRole;

/// Catalog weights are in milliliters; transport bills per kilogram.
const UNITS_PER_KG: f64 = 1000.0;

/// Weight-based transport fee for the current order.
///
/// The transporter's sender decision must already be made; an undecided
/// transporter refuses checkout. When the transporter is not the sender the
/// fee is exactly zero regardless of weight. The fee is added to the order
/// total only after per-line aggregation is final, since it depends on the
/// settled total weight.
pub fn transport_fee(role: &TransportRole, total_weight: u64) -> DomainResult<f64> {
    match role.sender() {
        None => Err(DomainError::TransportUnresolved(role.party())),
        Some(false) => Ok(0.0),
        Some(true) => Ok(total_weight as f64 / UNITS_PER_KG * role.cost_per_kg()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tintaria_core::PartyId;

    fn role(cost_per_kg: f64) -> TransportRole {
        TransportRole::new(PartyId::new(), cost_per_kg).unwrap()
    }

    #[test]
    fn undecided_sender_refuses_the_fee() {
        let role = role(1.5);
        let err = transport_fee(&role, 4000).unwrap_err();
        assert_eq!(err, DomainError::TransportUnresolved(role.party()));
    }

    #[test]
    fn non_sender_fee_is_zero_regardless_of_weight() {
        let mut role = role(1.5);
        role.set_sender(false).unwrap();
        assert_eq!(transport_fee(&role, 0).unwrap(), 0.0);
        assert_eq!(transport_fee(&role, 1_000_000).unwrap(), 0.0);
    }

    #[test]
    fn sender_fee_converts_milliliters_to_kilograms() {
        let mut role = role(1.5);
        role.set_sender(true).unwrap();
        // 4000ml = 4kg at 1.5 per kg.
        assert!((transport_fee(&role, 4000).unwrap() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn fractional_kilograms_are_billed_pro_rata() {
        let mut role = role(2.0);
        role.set_sender(true).unwrap();
        assert!((transport_fee(&role, 500).unwrap() - 1.0).abs() < 1e-9);
    }
}
