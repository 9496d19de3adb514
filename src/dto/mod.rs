pub mod cart;
pub mod products;
