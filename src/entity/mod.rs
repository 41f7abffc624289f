pub mod cart_items;
pub mod categories;
pub mod feedback;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod services;
pub mod showcases;
pub mod users;

pub use cart_items::Entity as CartItems;
pub use categories::Entity as Categories;
pub use feedback::Entity as Feedback;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use services::Entity as Services;
pub use showcases::Entity as Showcases;
pub use users::Entity as Users;
