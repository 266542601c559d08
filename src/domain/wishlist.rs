use bigdecimal::BigDecimal;

use super::catalog::Category;

#[derive(Debug, Clone, PartialEq)]
pub struct WishlistItem {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub category: Category,
    pub price: BigDecimal,
}

/// A user's wishlist. `id` is `None` until the first product is added.
#[derive(Debug, Clone, PartialEq)]
pub struct Wishlist {
    pub id: Option<i64>,
    pub user_id: i64,
    pub items: Vec<WishlistItem>,
}

impl Wishlist {
    pub fn empty(user_id: i64) -> Self {
        Wishlist {
            id: None,
            user_id,
            items: Vec::new(),
        }
    }

    pub fn contains(&self, product_id: i64) -> bool {
        self.items.iter().any(|item| item.product_id == product_id)
    }
}
