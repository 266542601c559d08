use std::collections::HashMap;

use bigdecimal::BigDecimal;
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::WishlistRepository;
use crate::domain::wishlist::{Wishlist, WishlistItem};
use crate::schema::{products, wishlist_products, wishlists};

use super::models::{column, NewWishlistProductRow, WishlistRow};

pub struct DieselWishlistRepository {
    pool: DbPool,
}

impl DieselWishlistRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl WishlistRepository for DieselWishlistRepository {
    fn find_by_user(&self, user_id: i64) -> Result<Option<Wishlist>, DomainError> {
        let mut conn = self.pool.get()?;
        load_for_user(&mut conn, user_id)
    }

    fn find_all(&self) -> Result<Vec<Wishlist>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = wishlists::table
            .select(WishlistRow::as_select())
            .order(wishlists::id.asc())
            .load(&mut conn)?;

        with_items(&mut conn, rows)
    }

    fn add_product(&self, user_id: i64, product_id: i64) -> Result<Wishlist, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            diesel::insert_into(wishlists::table)
                .values(wishlists::user_id.eq(user_id))
                .on_conflict(wishlists::user_id)
                .do_nothing()
                .execute(conn)?;

            let wishlist_id: i64 = wishlists::table
                .filter(wishlists::user_id.eq(user_id))
                .select(wishlists::id)
                .first(conn)?;

            diesel::insert_into(wishlist_products::table)
                .values(&NewWishlistProductRow {
                    wishlist_id,
                    product_id,
                })
                .execute(conn)?;

            load_for_user(conn, user_id)?
                .ok_or_else(|| {
                    DomainError::Internal(format!("wishlist of user {} vanished", user_id))
                })
        })
    }

    fn remove_product(&self, user_id: i64, product_id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let owned = wishlists::table
            .filter(wishlists::user_id.eq(user_id))
            .select(wishlists::id);
        let deleted = diesel::delete(
            wishlist_products::table
                .filter(wishlist_products::wishlist_id.eq_any(owned))
                .filter(wishlist_products::product_id.eq(product_id)),
        )
        .execute(&mut conn)?;

        Ok(deleted > 0)
    }

    fn delete(&self, user_id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(wishlists::table.filter(wishlists::user_id.eq(user_id)))
            .execute(&mut conn)?;
        Ok(deleted > 0)
    }
}

fn load_for_user(conn: &mut PgConnection, user_id: i64) -> Result<Option<Wishlist>, DomainError> {
    let row = wishlists::table
        .filter(wishlists::user_id.eq(user_id))
        .select(WishlistRow::as_select())
        .first(conn)
        .optional()?;

    let Some(row) = row else {
        return Ok(None);
    };

    Ok(with_items(conn, vec![row])?.pop())
}

fn with_items(
    conn: &mut PgConnection,
    rows: Vec<WishlistRow>,
) -> Result<Vec<Wishlist>, DomainError> {
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

    let items: Vec<(i64, i64, i64, String, String, BigDecimal)> = wishlist_products::table
        .inner_join(products::table)
        .filter(wishlist_products::wishlist_id.eq_any(&ids))
        .select((
            wishlist_products::id,
            wishlist_products::wishlist_id,
            wishlist_products::product_id,
            products::name,
            products::category,
            products::price,
        ))
        .order(wishlist_products::id.asc())
        .load(conn)?;

    let mut by_wishlist: HashMap<i64, Vec<WishlistItem>> = HashMap::new();
    for (id, wishlist_id, product_id, product_name, category, price) in items {
        by_wishlist.entry(wishlist_id).or_default().push(WishlistItem {
            id,
            product_id,
            product_name,
            category: column(&category)?,
            price,
        });
    }

    Ok(rows
        .into_iter()
        .map(|row| Wishlist {
            id: Some(row.id),
            user_id: row.user_id,
            items: by_wishlist.remove(&row.id).unwrap_or_default(),
        })
        .collect())
}
