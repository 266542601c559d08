pub mod errors;
pub mod models;
pub mod order_repo;
pub mod product_repo;
#[cfg(test)]
pub(crate) mod test_support;
pub mod user_repo;
pub mod wishlist_repo;

pub use order_repo::DieselOrderRepository;
pub use product_repo::DieselProductRepository;
pub use user_repo::DieselUserRepository;
pub use wishlist_repo::DieselWishlistRepository;
