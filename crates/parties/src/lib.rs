//! Parties domain module (customers, sellers, transporters).
//!
//! A party is a single identity record; what a party can *do* is expressed by
//! role records attached by reference (composition instead of a rigid is-a
//! hierarchy), so one party may act as both seller and transporter.

pub mod party;
pub mod roles;

pub use party::{ContactInfo, Party};
pub use roles::{CustomerRole, SellerRole, TransportRole};
