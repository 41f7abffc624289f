pub mod auth;
pub mod cart;
pub mod catalog;
pub mod contact;
pub mod feedback;
pub mod form;
pub mod orders;
pub mod showcase;
