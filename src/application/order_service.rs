use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::order::{LineItem, NewOrder, Order, OrderDraft, OrderStatus, MAX_LINE_QUANTITY};
use crate::domain::ports::{Clock, OrderRepository, ProductRepository, UserRepository};
use crate::domain::user::User;

#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    users: Arc<dyn UserRepository>,
    products: Arc<dyn ProductRepository>,
    clock: Arc<dyn Clock>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        users: Arc<dyn UserRepository>,
        products: Arc<dyn ProductRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            orders,
            users,
            products,
            clock,
        }
    }

    /// Creates a PENDING order for `user_id` with the given lines, a fresh
    /// tracking number and its computed total.
    pub fn create_order(&self, user_id: i64, lines: Vec<LineItem>) -> Result<Order, DomainError> {
        if lines.is_empty() {
            return Err(DomainError::validation("an order needs at least one product"));
        }
        self.insert(user_id, lines)
    }

    pub fn add_product(
        &self,
        order_id: i64,
        product_id: i64,
        quantity: i32,
    ) -> Result<Order, DomainError> {
        self.add_products(
            order_id,
            vec![LineItem {
                product_id,
                quantity,
            }],
        )
    }

    /// Appends every line and recomputes the total once.
    pub fn add_products(&self, order_id: i64, lines: Vec<LineItem>) -> Result<Order, DomainError> {
        if lines.is_empty() {
            return Err(DomainError::validation("no products to add"));
        }
        validate_quantities(&lines)?;
        self.get_order(order_id)?;
        self.ensure_products_exist(&lines)?;

        let order = self.orders.add_lines(order_id, lines)?;
        log::info!(
            "Order {} now has {} line(s), total {}",
            order.tracking_number,
            order.lines.len(),
            order.total_amount
        );
        Ok(order)
    }

    /// Upsert. A draft for an existing order only moves its status; the lines
    /// are always taken from storage, never from the draft.
    pub fn save_order(&self, draft: OrderDraft) -> Result<Order, DomainError> {
        if let Some(id) = draft.id {
            if let Some(existing) = self.orders.find_by_id(id)? {
                if let Some(status) = draft.status {
                    self.transition(&existing, status)?;
                }
                return self.orders.recalculate(id);
            }
        }

        if let Some(status) = draft.status.filter(|s| *s != OrderStatus::Pending) {
            return Err(DomainError::validation(format!(
                "a new order starts as PENDING, not {}",
                status
            )));
        }
        self.insert(draft.user_id, draft.lines)
    }

    /// Reloads the order's lines from storage and refreshes both the lines
    /// and the total of `order` in place.
    pub fn calculate_total(&self, order: &mut Order) -> Result<(), DomainError> {
        *order = self.orders.recalculate(order.id)?;
        Ok(())
    }

    pub fn recalculate(&self, order_id: i64) -> Result<Order, DomainError> {
        let mut order = self.get_order(order_id)?;
        self.calculate_total(&mut order)?;
        Ok(order)
    }

    pub fn update_status(&self, order_id: i64, status: OrderStatus) -> Result<Order, DomainError> {
        let order = self.get_order(order_id)?;
        self.transition(&order, status)
    }

    pub fn get_order(&self, id: i64) -> Result<Order, DomainError> {
        self.orders
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found("Order", id))
    }

    pub fn get_orders_by_user(&self, user_id: i64) -> Result<Vec<Order>, DomainError> {
        self.load_user(user_id)?;
        self.orders.find_by_user(user_id)
    }

    pub fn get_latest_order(&self, user_id: i64) -> Result<Order, DomainError> {
        self.load_user(user_id)?;
        self.orders
            .find_latest_by_user(user_id)?
            .ok_or_else(|| DomainError::NotFound(format!("User {} has no orders", user_id)))
    }

    pub fn list_orders(&self) -> Result<Vec<Order>, DomainError> {
        self.orders.find_all()
    }

    pub fn delete_order(&self, id: i64) -> Result<(), DomainError> {
        if !self.orders.delete(id)? {
            return Err(DomainError::not_found("Order", id));
        }
        log::info!("Deleted order {}", id);
        Ok(())
    }

    fn insert(&self, user_id: i64, lines: Vec<LineItem>) -> Result<Order, DomainError> {
        validate_quantities(&lines)?;
        let user = self.load_user(user_id)?;
        self.ensure_products_exist(&lines)?;

        let order = self.orders.create(NewOrder {
            user_id: user.id,
            user_name: user.name,
            placed_on: self.clock.today(),
            lines,
        })?;
        log::info!(
            "Created order {} for user {} (total {})",
            order.tracking_number,
            user_id,
            order.total_amount
        );
        Ok(order)
    }

    fn transition(&self, order: &Order, status: OrderStatus) -> Result<Order, DomainError> {
        if order.status == status {
            return Ok(order.clone());
        }
        if !order.status.can_transition_to(status) {
            return Err(DomainError::validation(format!(
                "order {} cannot move from {} to {}",
                order.tracking_number, order.status, status
            )));
        }
        let updated = self.orders.update_status(order.id, order.status, status)?;
        log::info!(
            "Order {} moved from {} to {}",
            order.tracking_number,
            order.status,
            status
        );
        Ok(updated)
    }

    fn load_user(&self, user_id: i64) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)?
            .ok_or_else(|| DomainError::not_found("User", user_id))
    }

    fn ensure_products_exist(&self, lines: &[LineItem]) -> Result<(), DomainError> {
        let ids: BTreeSet<i64> = lines.iter().map(|line| line.product_id).collect();
        for id in ids {
            if self.products.find_by_id(id)?.is_none() {
                return Err(DomainError::not_found("Product", id));
            }
        }
        Ok(())
    }
}

fn validate_quantities(lines: &[LineItem]) -> Result<(), DomainError> {
    let out_of_range = lines
        .iter()
        .find(|line| !(1..=MAX_LINE_QUANTITY).contains(&line.quantity));
    match out_of_range {
        Some(line) => Err(DomainError::validation(format!(
            "quantity for product {} must be between 1 and {} (got {})",
            line.product_id, MAX_LINE_QUANTITY, line.quantity
        ))),
        None => Ok(()),
    }
}
