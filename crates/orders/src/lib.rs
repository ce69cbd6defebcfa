//! Orders domain module (cart composition and pricing).
//!
//! This crate contains the business rules for assembling and pricing one
//! order: the mutable cart aggregate (command/event based), the full
//! recomputation pricing engine, and the weight-based transport fee.
//! Everything is deterministic domain logic (no IO, no HTTP, no storage).

pub mod cart;
pub mod pricing;
pub mod transport;

pub use cart::{
    AddLine, Cart, CartCommand, CartEvent, CartFinished, CartLine, DiscountChanged, Finish,
    LineAdded, LineRemoved, QuantityChanged, RemoveLine, SetDiscount, SetQuantity, SetTransport,
    TransportAssigned,
};
pub use pricing::{LineBreakdown, OrderTotals, price_order, round2};
pub use transport::transport_fee;
