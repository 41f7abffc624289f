//! Storage-free business rules: catalog composition, cart merging and order pricing.

pub mod cart;
pub mod catalog;
pub mod pricing;
pub mod slug;
