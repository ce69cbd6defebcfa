//! End-to-end order flow: compose a cart command by command, check out, and
//! verify the cross-order state (commission totals, sender flag reset).

use std::sync::Arc;

use tintaria_billing::{CheckoutRequest, CommissionLedger, checkout};
use tintaria_catalog::{PriceBook, PriceKey, Product, ProductCatalog, TaxTable, WeightClass};
use tintaria_core::{Aggregate, OrderId, PartyId, ProductCode};
use tintaria_orders::{AddLine, Cart, CartCommand, SetDiscount};
use tintaria_parties::{ContactInfo, CustomerRole, Party, SellerRole, TransportRole};

fn code(s: &str) -> ProductCode {
    ProductCode::new(s).unwrap()
}

fn products() -> Vec<Product> {
    vec![
        Product::new(
            code("APF-BLK-500"),
            "Acrilico premium",
            "fosco",
            "black",
            WeightClass::W500,
            2.5,
        )
        .unwrap(),
        Product::new(
            code("APS-WHT-1000"),
            "Acrilico premium",
            "semibrilho",
            "white",
            WeightClass::W1000,
            3.0,
        )
        .unwrap(),
    ]
}

fn price_book() -> PriceBook {
    let [black, white] = <[Product; 2]>::try_from(products()).unwrap();
    PriceBook::build([
        (PriceKey::for_product(&black, "goiania", "711"), 4.0),
        (PriceKey::for_product(&white, "goiania", "711"), 6.0),
        (PriceKey::for_product(&black, "bahia", "711"), 3.5),
        (PriceKey::for_product(&white, "bahia", "711"), 5.5),
    ])
    .unwrap()
}

fn taxes() -> TaxTable {
    TaxTable::build([
        ("sao paulo", 0.18),
        ("rio de janeiro", 0.20),
        ("minas gerais", 0.18),
        ("goiania", 0.17),
        ("pernambuco", 0.18),
        ("bahia", 0.12),
    ])
    .unwrap()
}

#[test]
fn two_orders_accumulate_commission_and_reset_the_sender_flag() {
    tintaria_observability::init();

    let catalog = Arc::new(ProductCatalog::build(products()).unwrap());
    let prices = price_book();
    let taxes = taxes();

    let customer = Party::new(PartyId::new(), "Alice", "goiania", ContactInfo::default()).unwrap();
    let seller = Party::new(PartyId::new(), "Dave", "goiania", ContactInfo::default()).unwrap();
    let transporter =
        Party::new(PartyId::new(), "Carrier Co", "bahia", ContactInfo::default()).unwrap();

    let customer_role = CustomerRole::new(customer.id_typed(), seller.id_typed());
    let seller_role = SellerRole::with_default_rate(seller.id_typed());
    let mut transport_role = TransportRole::new(transporter.id_typed(), 2.0).unwrap();

    let mut ledger = CommissionLedger::new();
    let mut commissions = Vec::new();

    for _ in 0..2 {
        // Compose the cart through the explicit command surface, the way an
        // interactive shell dispatches parsed input.
        let mut cart = Cart::open(OrderId::new(), Arc::clone(&catalog));
        let commands = [
            CartCommand::AddLine(AddLine {
                order_id: cart.id_typed(),
                code: code("APF-BLK-500"),
                quantity: 8,
                discount: 0.0,
                occurred_at: chrono::Utc::now(),
            }),
            CartCommand::SetDiscount(SetDiscount {
                order_id: cart.id_typed(),
                code: code("APF-BLK-500"),
                discount: 10.0,
                occurred_at: chrono::Utc::now(),
            }),
            CartCommand::AddLine(AddLine {
                order_id: cart.id_typed(),
                code: code("APS-WHT-1000"),
                quantity: 3,
                discount: 0.0,
                occurred_at: chrono::Utc::now(),
            }),
        ];
        for command in &commands {
            let events = cart.handle(command).unwrap();
            for event in &events {
                cart.apply(event);
            }
        }
        cart.set_transport(transporter.id_typed()).unwrap();
        cart.finish().unwrap();

        // The sender decision is made once per order.
        transport_role.set_sender(true).unwrap();

        let outcome = checkout(
            &CheckoutRequest {
                cart: &cart,
                prices: &prices,
                taxes: &taxes,
                tier: "711",
                customer: &customer,
                customer_role: &customer_role,
                seller: &seller,
                seller_role: &seller_role,
                transporter: &transporter,
                transport_role: &transport_role,
                due_day_offsets: &[30, 60, 90],
            },
            &mut ledger,
        )
        .unwrap();

        // black: 4.0 * 0.9 = 3.6, tax 17% = 0.612, (3.6 + 0.612) * 8 = 33.696
        // white: untaxed, 6.0 * 3 = 18.0
        assert!((outcome.totals.total_price - 51.696).abs() < 1e-9);
        // 8 * 500ml + 3 * 1000ml = 7kg at 2.0 per kg.
        assert!((outcome.transport_fee - 14.0).abs() < 1e-9);
        assert!((outcome.final_total - 65.696).abs() < 1e-9);
        assert!((outcome.commission - 51.696 * 0.05).abs() < 1e-9);
        assert_eq!(outcome.schedule.len(), 3);
        assert!((outcome.schedule[0].amount - 65.696 / 3.0).abs() < 1e-9);
        assert_eq!(outcome.totals.volumes[&WeightClass::W500], 2);
        assert_eq!(outcome.totals.volumes[&WeightClass::W1000], 3);

        commissions.push(outcome.commission);
        transport_role.clear_sender();
    }

    // The ledger outlives order sessions: totals accumulate across orders.
    let expected: f64 = commissions.iter().sum();
    assert!((ledger.total_for(seller.id_typed()) - expected).abs() < 1e-9);
    assert_eq!(ledger.entries_for(seller.id_typed()).count(), 2);
}

#[test]
fn relocating_the_customer_reprices_the_same_cart() {
    let catalog = Arc::new(ProductCatalog::build(products()).unwrap());
    let prices = price_book();
    let taxes = taxes();

    let mut cart = Cart::open(OrderId::new(), catalog);
    cart.add_line(code("APF-BLK-500"), 4, 0.0).unwrap();

    let goiania = tintaria_orders::price_order(&cart, &prices, &taxes, "goiania", "711").unwrap();
    let bahia = tintaria_orders::price_order(&cart, &prices, &taxes, "bahia", "711").unwrap();

    // Same cart, different location: different unit price and tax rate.
    assert!((goiania.total_price - (4.0 * 1.17) * 4.0).abs() < 1e-9);
    assert!((bahia.total_price - (3.5 * 1.12) * 4.0).abs() < 1e-9);
}
