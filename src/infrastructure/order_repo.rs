use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    check_total, order_total, tracking_number, LineItem, NewOrder, Order, OrderLine, OrderStatus,
};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_products, orders, products, user_order_sequences};

use super::models::{column, NewOrderProductRow, NewOrderRow, OrderRow};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Claim the user's next tracking sequence. The upsert takes a
            //    row lock that is held until commit.
            let sequence: i32 = diesel::insert_into(user_order_sequences::table)
                .values((
                    user_order_sequences::user_id.eq(order.user_id),
                    user_order_sequences::last_value.eq(1),
                ))
                .on_conflict(user_order_sequences::user_id)
                .do_update()
                .set(user_order_sequences::last_value.eq(user_order_sequences::last_value + 1))
                .returning(user_order_sequences::last_value)
                .get_result(conn)?;

            // 2. Insert the order
            let row = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    tracking_number: tracking_number(
                        order.user_id,
                        &order.user_name,
                        order.placed_on,
                        sequence,
                    ),
                    user_id: order.user_id,
                    status: OrderStatus::Pending.as_str().to_string(),
                    total_amount: BigDecimal::from(0),
                })
                .returning(OrderRow::as_returning())
                .get_result(conn)?;

            // 3. Insert the lines and store the resulting total
            insert_lines(conn, row.id, &order.lines)?;
            store_total(conn, row)
        })
    }

    fn add_lines(&self, order_id: i64, lines: Vec<LineItem>) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = lock_order(conn, order_id)?;
            insert_lines(conn, order_id, &lines)?;
            store_total(conn, row)
        })
    }

    fn recalculate(&self, order_id: i64) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = lock_order(conn, order_id)?;
            store_total(conn, row)
        })
    }

    fn update_status(
        &self,
        order_id: i64,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let updated = diesel::update(
                orders::table
                    .find(order_id)
                    .filter(orders::status.eq(from.as_str())),
            )
            .set((
                orders::status.eq(to.as_str()),
                orders::updated_at.eq(Utc::now()),
            ))
            .returning(OrderRow::as_returning())
            .get_result(conn)
            .optional()?;

            let row = match updated {
                Some(row) => row,
                None => {
                    let exists = diesel::select(diesel::dsl::exists(orders::table.find(order_id)))
                        .get_result::<bool>(conn)?;
                    return Err(if exists {
                        DomainError::Conflict(format!("order {} is no longer {}", order_id, from))
                    } else {
                        DomainError::not_found("Order", order_id)
                    });
                }
            };

            let lines = load_lines(conn, &[order_id])?.remove(&order_id).unwrap_or_default();
            into_order(row, lines)
        })
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(with_lines(&mut conn, vec![row])?.pop())
    }

    fn find_by_user(&self, user_id: i64) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .filter(orders::user_id.eq(user_id))
            .select(OrderRow::as_select())
            .order((orders::created_at.desc(), orders::id.desc()))
            .load(&mut conn)?;

        with_lines(&mut conn, rows)
    }

    fn find_latest_by_user(&self, user_id: i64) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = orders::table
            .filter(orders::user_id.eq(user_id))
            .select(OrderRow::as_select())
            .order((orders::created_at.desc(), orders::id.desc()))
            .first(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(with_lines(&mut conn, vec![row])?.pop())
    }

    fn find_all(&self) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .select(OrderRow::as_select())
            .order((orders::created_at.desc(), orders::id.desc()))
            .load(&mut conn)?;

        with_lines(&mut conn, rows)
    }

    fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(orders::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }
}

fn lock_order(conn: &mut PgConnection, order_id: i64) -> Result<OrderRow, DomainError> {
    orders::table
        .find(order_id)
        .select(OrderRow::as_select())
        .for_update()
        .first(conn)
        .optional()?
        .ok_or_else(|| DomainError::not_found("Order", order_id))
}

fn insert_lines(conn: &mut PgConnection, order_id: i64, lines: &[LineItem]) -> QueryResult<()> {
    let rows: Vec<NewOrderProductRow> = lines
        .iter()
        .map(|l| NewOrderProductRow {
            order_id,
            product_id: l.product_id,
            quantity: l.quantity,
        })
        .collect();
    diesel::insert_into(order_products::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

/// Recomputes the total from the stored lines and writes it back.
fn store_total(conn: &mut PgConnection, row: OrderRow) -> Result<Order, DomainError> {
    let lines = load_lines(conn, &[row.id])?.remove(&row.id).unwrap_or_default();
    let total = order_total(&lines);
    check_total(&total)?;

    let row = diesel::update(orders::table.find(row.id))
        .set((
            orders::total_amount.eq(total),
            orders::updated_at.eq(Utc::now()),
        ))
        .returning(OrderRow::as_returning())
        .get_result(conn)?;

    into_order(row, lines)
}

/// Lines of every order in `order_ids`, priced at the current catalog price.
fn load_lines(
    conn: &mut PgConnection,
    order_ids: &[i64],
) -> QueryResult<HashMap<i64, Vec<OrderLine>>> {
    let rows: Vec<(i64, i64, i64, i32, String, BigDecimal)> = order_products::table
        .inner_join(products::table)
        .filter(order_products::order_id.eq_any(order_ids))
        .select((
            order_products::id,
            order_products::order_id,
            order_products::product_id,
            order_products::quantity,
            products::name,
            products::price,
        ))
        .order(order_products::id.asc())
        .load(conn)?;

    let mut by_order: HashMap<i64, Vec<OrderLine>> = HashMap::new();
    for (id, order_id, product_id, quantity, product_name, unit_price) in rows {
        by_order.entry(order_id).or_default().push(OrderLine {
            id,
            product_id,
            product_name,
            unit_price,
            quantity,
        });
    }
    Ok(by_order)
}

fn with_lines(conn: &mut PgConnection, rows: Vec<OrderRow>) -> Result<Vec<Order>, DomainError> {
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let mut lines = load_lines(conn, &ids)?;

    rows.into_iter()
        .map(|row| {
            let order_lines = lines.remove(&row.id).unwrap_or_default();
            into_order(row, order_lines)
        })
        .collect()
}

fn into_order(row: OrderRow, lines: Vec<OrderLine>) -> Result<Order, DomainError> {
    Ok(Order {
        id: row.id,
        tracking_number: row.tracking_number,
        user_id: row.user_id,
        status: column(&row.status)?,
        total_amount: row.total_amount,
        created_at: row.created_at,
        lines,
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    use super::DieselOrderRepository;
    use crate::db::DbPool;
    use crate::domain::catalog::NewProduct;
    use crate::domain::errors::DomainError;
    use crate::domain::order::{LineItem, NewOrder, OrderStatus};
    use crate::domain::ports::{OrderRepository, ProductRepository};
    use crate::domain::user::User;
    use crate::infrastructure::product_repo::DieselProductRepository;
    use crate::infrastructure::test_support::{headphone, seed_user, setup_db};

    fn placed_on() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 9).expect("valid date")
    }

    fn priced(name: &str, price: &str) -> NewProduct {
        NewProduct {
            price: BigDecimal::from_str(price).expect("valid decimal"),
            ..headphone(name)
        }
    }

    fn new_order(user: &User, lines: Vec<LineItem>) -> NewOrder {
        NewOrder {
            user_id: user.id,
            user_name: user.name.clone(),
            placed_on: placed_on(),
            lines,
        }
    }

    fn seed_products(pool: &DbPool) -> (i64, i64) {
        let repo = DieselProductRepository::new(pool.clone());
        let a = repo.create(priced("HD 25", "10.00")).expect("create failed");
        let b = repo.create(priced("HD 600", "15.00")).expect("create failed");
        (a.id, b.id)
    }

    fn line(product_id: i64, quantity: i32) -> LineItem {
        LineItem {
            product_id,
            quantity,
        }
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn create_stores_lines_total_and_tracking_number() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool.clone());
        let user = seed_user(&pool, "Juan Perez", "juan@example.com");
        let (a, b) = seed_products(&pool);

        let order = repo
            .create(new_order(&user, vec![line(a, 2), line(b, 3)]))
            .expect("create failed");

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.total_amount, BigDecimal::from_str("65.00").unwrap());
        assert_eq!(
            order.tracking_number,
            format!("RCD-{:03}-JUA-090326-001", user.id)
        );

        let found = repo.find_by_id(order.id).unwrap().expect("order should exist");
        assert_eq!(found, order);
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn tracking_sequence_is_per_user() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool.clone());
        let juan = seed_user(&pool, "Juan Perez", "juan@example.com");
        let ana = seed_user(&pool, "Ana Diaz", "ana@example.com");
        let (a, _) = seed_products(&pool);

        let first = repo.create(new_order(&juan, vec![line(a, 1)])).unwrap();
        let second = repo.create(new_order(&juan, vec![line(a, 1)])).unwrap();
        let other = repo.create(new_order(&ana, vec![line(a, 1)])).unwrap();

        assert!(first.tracking_number.ends_with("-001"));
        assert!(second.tracking_number.ends_with("-002"));
        assert!(other.tracking_number.ends_with("-001"));

        let latest = repo.find_latest_by_user(juan.id).unwrap().unwrap();
        assert_eq!(latest.id, second.id);
        assert_eq!(repo.find_by_user(juan.id).unwrap().len(), 2);
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn add_lines_updates_total() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool.clone());
        let user = seed_user(&pool, "Juan Perez", "juan@example.com");
        let (a, b) = seed_products(&pool);
        let order = repo.create(new_order(&user, vec![line(a, 1)])).unwrap();

        let order = repo.add_lines(order.id, vec![line(b, 2)]).unwrap();

        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.total_amount, BigDecimal::from_str("40.00").unwrap());
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn recalculate_picks_up_price_changes() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool.clone());
        let products = DieselProductRepository::new(pool.clone());
        let user = seed_user(&pool, "Juan Perez", "juan@example.com");
        let (a, _) = seed_products(&pool);
        let order = repo.create(new_order(&user, vec![line(a, 3)])).unwrap();

        let mut product = products.find_by_id(a).unwrap().unwrap();
        product.price = BigDecimal::from_str("12.50").unwrap();
        products.update(&product).unwrap();

        let order = repo.recalculate(order.id).unwrap();
        assert_eq!(order.total_amount, BigDecimal::from_str("37.50").unwrap());
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn update_status_and_delete() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool.clone());
        let user = seed_user(&pool, "Juan Perez", "juan@example.com");
        let (a, _) = seed_products(&pool);
        let order = repo.create(new_order(&user, vec![line(a, 1)])).unwrap();

        let paid = repo
            .update_status(order.id, OrderStatus::Pending, OrderStatus::Paid)
            .unwrap();
        assert_eq!(paid.status, OrderStatus::Paid);
        assert_eq!(paid.lines.len(), 1);

        // A second writer that still saw PENDING loses.
        assert!(matches!(
            repo.update_status(order.id, OrderStatus::Pending, OrderStatus::Cancelled),
            Err(DomainError::Conflict(_))
        ));
        assert_eq!(
            repo.find_by_id(order.id).unwrap().unwrap().status,
            OrderStatus::Paid
        );

        assert!(repo.delete(order.id).unwrap());
        assert!(repo.find_by_id(order.id).unwrap().is_none());
        assert!(matches!(
            repo.update_status(order.id, OrderStatus::Paid, OrderStatus::Shipped),
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn find_by_id_returns_none_for_unknown_id() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);

        assert!(repo.find_by_id(4242).expect("find should not error").is_none());
        assert!(repo.find_all().unwrap().is_empty());
    }
}
