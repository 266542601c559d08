use chrono::NaiveDate;

use super::catalog::{NewProduct, Product};
use super::errors::DomainError;
use super::order::{LineItem, NewOrder, Order, OrderStatus};
use super::product_query::ProductQuery;
use super::user::{NewUser, User};
use super::wishlist::Wishlist;

#[cfg_attr(test, mockall::automock)]
pub trait ProductRepository: Send + Sync + 'static {
    fn create(&self, product: NewProduct) -> Result<Product, DomainError>;
    /// Overwrites every stored field of `product`.
    fn update(&self, product: &Product) -> Result<Product, DomainError>;
    fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError>;
    fn find(&self, query: &ProductQuery) -> Result<Vec<Product>, DomainError>;
    fn count(&self, query: &ProductQuery) -> Result<i64, DomainError>;
    /// Returns `false` when nothing was deleted.
    fn delete(&self, id: i64) -> Result<bool, DomainError>;
    /// Whether any order line references the product.
    fn is_ordered(&self, id: i64) -> Result<bool, DomainError>;
    /// Whether any wishlist line references the product.
    fn is_wishlisted(&self, id: i64) -> Result<bool, DomainError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync + 'static {
    fn create(&self, user: NewUser) -> Result<User, DomainError>;
    fn update(&self, user: &User) -> Result<User, DomainError>;
    fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    fn find_all(&self) -> Result<Vec<User>, DomainError>;
    /// Deletes the user together with their orders and wishlist.
    fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

/// Order persistence. Every write runs in one transaction and leaves the
/// stored total consistent with the stored lines.
#[cfg_attr(test, mockall::automock)]
pub trait OrderRepository: Send + Sync + 'static {
    /// Allocates the user's next tracking sequence, inserts the order as
    /// PENDING with its lines and stores the computed total.
    fn create(&self, order: NewOrder) -> Result<Order, DomainError>;
    fn add_lines(&self, order_id: i64, lines: Vec<LineItem>) -> Result<Order, DomainError>;
    /// Reloads the order's lines from storage and stores the recomputed total.
    fn recalculate(&self, order_id: i64) -> Result<Order, DomainError>;
    /// Moves the order to `to` only while it is still `from`; a concurrent
    /// change in between is a conflict.
    fn update_status(
        &self,
        order_id: i64,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Order, DomainError>;
    fn find_by_id(&self, id: i64) -> Result<Option<Order>, DomainError>;
    fn find_by_user(&self, user_id: i64) -> Result<Vec<Order>, DomainError>;
    fn find_latest_by_user(&self, user_id: i64) -> Result<Option<Order>, DomainError>;
    fn find_all(&self) -> Result<Vec<Order>, DomainError>;
    fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait WishlistRepository: Send + Sync + 'static {
    fn find_by_user(&self, user_id: i64) -> Result<Option<Wishlist>, DomainError>;
    fn find_all(&self) -> Result<Vec<Wishlist>, DomainError>;
    /// Creates the wishlist on first use.
    fn add_product(&self, user_id: i64, product_id: i64) -> Result<Wishlist, DomainError>;
    fn remove_product(&self, user_id: i64, product_id: i64) -> Result<bool, DomainError>;
    /// Removes the wishlist and all its lines.
    fn delete(&self, user_id: i64) -> Result<bool, DomainError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync + 'static {
    fn today(&self) -> NaiveDate;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}
