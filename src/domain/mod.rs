pub mod catalog;
pub mod errors;
pub mod order;
pub mod ports;
pub mod product_patch;
pub mod product_query;
pub(crate) mod string_enum;
pub mod user;
pub mod wishlist;
