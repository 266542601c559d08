pub mod order_service;
pub mod password;
pub mod product_service;
pub mod user_service;
pub mod wishlist_service;
