use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::ports::{ProductRepository, UserRepository, WishlistRepository};
use crate::domain::wishlist::Wishlist;

#[derive(Clone)]
pub struct WishlistService {
    wishlists: Arc<dyn WishlistRepository>,
    users: Arc<dyn UserRepository>,
    products: Arc<dyn ProductRepository>,
}

impl WishlistService {
    pub fn new(
        wishlists: Arc<dyn WishlistRepository>,
        users: Arc<dyn UserRepository>,
        products: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            wishlists,
            users,
            products,
        }
    }

    /// Adds a product to the user's wishlist, creating the wishlist on first
    /// use. A product can appear at most once per wishlist.
    pub fn add_product(&self, user_id: i64, product_id: i64) -> Result<Wishlist, DomainError> {
        self.ensure_user(user_id)?;
        if self.products.find_by_id(product_id)?.is_none() {
            return Err(DomainError::not_found("Product", product_id));
        }
        let already_listed = self
            .wishlists
            .find_by_user(user_id)?
            .is_some_and(|wishlist| wishlist.contains(product_id));
        if already_listed {
            return Err(DomainError::Conflict(format!(
                "Product {} is already in the wishlist of user {}",
                product_id, user_id
            )));
        }

        let wishlist = self.wishlists.add_product(user_id, product_id)?;
        log::info!("User {} wishlisted product {}", user_id, product_id);
        Ok(wishlist)
    }

    pub fn remove_product(&self, user_id: i64, product_id: i64) -> Result<(), DomainError> {
        self.ensure_user(user_id)?;
        if !self.wishlists.remove_product(user_id, product_id)? {
            return Err(DomainError::NotFound(format!(
                "Product {} is not in the wishlist of user {}",
                product_id, user_id
            )));
        }
        log::info!("User {} removed product {} from wishlist", user_id, product_id);
        Ok(())
    }

    /// The user's wishlist, empty if they never added anything.
    pub fn get_wishlist(&self, user_id: i64) -> Result<Wishlist, DomainError> {
        self.ensure_user(user_id)?;
        Ok(self
            .wishlists
            .find_by_user(user_id)?
            .unwrap_or_else(|| Wishlist::empty(user_id)))
    }

    pub fn list_wishlists(&self) -> Result<Vec<Wishlist>, DomainError> {
        self.wishlists.find_all()
    }

    pub fn clear_wishlist(&self, user_id: i64) -> Result<(), DomainError> {
        self.ensure_user(user_id)?;
        if self.wishlists.delete(user_id)? {
            log::info!("Cleared wishlist of user {}", user_id);
        }
        Ok(())
    }

    fn ensure_user(&self, user_id: i64) -> Result<(), DomainError> {
        match self.users.find_by_id(user_id)? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("User", user_id)),
        }
    }
}
