use serde::{Deserialize, Serialize};

use tintaria_catalog::{PriceBook, TaxTable};
use tintaria_core::{DomainError, DomainResult};
use tintaria_orders::{Cart, OrderTotals, price_order, transport_fee};
use tintaria_parties::{CustomerRole, Party, SellerRole, TransportRole};

use crate::commission::CommissionLedger;
use crate::installments::{Installment, schedule};

/// Everything checkout needs, borrowed from the calling session.
#[derive(Debug)]
pub struct CheckoutRequest<'a> {
    pub cart: &'a Cart,
    pub prices: &'a PriceBook,
    pub taxes: &'a TaxTable,
    /// Pricing tier selected for this order.
    pub tier: &'a str,
    pub customer: &'a Party,
    pub customer_role: &'a CustomerRole,
    pub seller: &'a Party,
    pub seller_role: &'a SellerRole,
    pub transporter: &'a Party,
    pub transport_role: &'a TransportRole,
    pub due_day_offsets: &'a [u32],
}

/// Result of a completed checkout.
///
/// `commission` is computed on `totals.total_price` (the pre-transport-fee
/// base) while `final_total` includes the fee. The asymmetry is stated
/// business logic: transport fees earn no commission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutOutcome {
    pub totals: OrderTotals,
    pub transport_fee: f64,
    pub commission: f64,
    pub final_total: f64,
    pub schedule: Vec<Installment>,
}

/// Close out a finished cart in the mandatory sequence: full repricing, then
/// transport fee, then commission accrual, then the installment plan.
///
/// The sequencing is not incidental: the fee needs the settled total weight,
/// and the installment plan needs the fee-inclusive final total. Commission
/// is nevertheless accrued on the pre-fee base. All gating checks run before
/// the first side effect, so a refused checkout leaves the ledger untouched.
pub fn checkout(
    req: &CheckoutRequest<'_>,
    ledger: &mut CommissionLedger,
) -> DomainResult<CheckoutOutcome> {
    for party in [req.customer, req.seller, req.transporter] {
        if !party.can_transact() {
            return Err(DomainError::PartyBlocked(party.id_typed()));
        }
    }

    if !req.cart.is_finished() {
        return Err(DomainError::validation("cart is not finished"));
    }
    if req.cart.transporter() != Some(req.transporter.id_typed()) {
        return Err(DomainError::validation(
            "cart is assigned to a different transporter",
        ));
    }

    if req.customer_role.party() != req.customer.id_typed() {
        return Err(DomainError::validation("customer role/party mismatch"));
    }
    if req.customer_role.seller() != req.seller.id_typed() {
        return Err(DomainError::validation(
            "customer is not assigned to this seller",
        ));
    }
    if req.seller_role.party() != req.seller.id_typed() {
        return Err(DomainError::validation("seller role/party mismatch"));
    }
    if req.transport_role.party() != req.transporter.id_typed() {
        return Err(DomainError::validation("transport role/party mismatch"));
    }
    // Checked up front so a bad plan cannot refuse checkout after commission
    // has already been accrued.
    if req.due_day_offsets.is_empty() {
        return Err(DomainError::invalid_installment(
            "at least one due-day offset is required",
        ));
    }

    let totals = price_order(
        req.cart,
        req.prices,
        req.taxes,
        req.customer.location(),
        req.tier,
    )?;
    let fee = transport_fee(req.transport_role, totals.total_weight)?;

    let commission = ledger.accrue(
        req.seller.id_typed(),
        req.cart.id_typed(),
        totals.total_price,
        req.seller_role.commission_rate(),
    )?;

    let final_total = totals.total_price + fee;
    let plan = schedule(final_total, req.due_day_offsets)?;

    tracing::info!(
        order = %req.cart.id_typed(),
        customer = %req.customer.id_typed(),
        seller = %req.seller.id_typed(),
        total = final_total,
        fee,
        commission,
        "checkout complete"
    );

    Ok(CheckoutOutcome {
        totals,
        transport_fee: fee,
        commission,
        final_total,
        schedule: plan,
    })
}
