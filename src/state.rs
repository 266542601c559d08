use std::sync::Arc;

use crate::application::order_service::OrderService;
use crate::application::product_service::ProductService;
use crate::application::user_service::UserService;
use crate::application::wishlist_service::WishlistService;
use crate::db::DbPool;
use crate::domain::ports::{
    Clock, OrderRepository, ProductRepository, SystemClock, UserRepository, WishlistRepository,
};
use crate::infrastructure::{
    DieselOrderRepository, DieselProductRepository, DieselUserRepository,
    DieselWishlistRepository,
};

/// Services shared by every worker, handed to handlers as `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
    pub users: UserService,
    pub orders: OrderService,
    pub wishlists: WishlistService,
}

impl AppState {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        users: Arc<dyn UserRepository>,
        orders: Arc<dyn OrderRepository>,
        wishlists: Arc<dyn WishlistRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        AppState {
            products: ProductService::new(products.clone(), clock.clone()),
            users: UserService::new(users.clone()),
            orders: OrderService::new(orders, users.clone(), products.clone(), clock),
            wishlists: WishlistService::new(wishlists, users, products),
        }
    }

    /// Wires the Diesel repositories over `pool`.
    pub fn from_pool(pool: DbPool) -> Self {
        AppState::new(
            Arc::new(DieselProductRepository::new(pool.clone())),
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselOrderRepository::new(pool.clone())),
            Arc::new(DieselWishlistRepository::new(pool)),
            Arc::new(SystemClock),
        )
    }
}
