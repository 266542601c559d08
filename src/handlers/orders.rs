use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::order::{LineItem, Order, OrderDraft, OrderLine, OrderStatus};
use crate::errors::AppError;
use crate::state::AppState;

use super::blocking;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderLineRequest {
    pub product_id: i64,
    pub quantity: i32,
}

impl From<OrderLineRequest> for LineItem {
    fn from(line: OrderLineRequest) -> Self {
        LineItem {
            product_id: line.product_id,
            quantity: line.quantity,
        }
    }
}

fn line_items(lines: Vec<OrderLineRequest>) -> Vec<LineItem> {
    lines.into_iter().map(LineItem::from).collect()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub user_id: i64,
    pub lines: Vec<OrderLineRequest>,
}

/// Body of `PUT /orders/save`. Without an `id` (or with an unknown one) a new
/// order is created; otherwise only `status` is applied to the stored order.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveOrderRequest {
    pub id: Option<i64>,
    pub user_id: i64,
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub lines: Vec<OrderLineRequest>,
}

/// Either a single product or a batch of lines.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AddProductsRequest {
    Batch { lines: Vec<OrderLineRequest> },
    Single(OrderLineRequest),
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    /// Current catalog price, e.g. "20.00"
    pub unit_price: String,
    pub quantity: i32,
    pub subtotal: String,
}

impl From<OrderLine> for OrderLineResponse {
    fn from(line: OrderLine) -> Self {
        OrderLineResponse {
            subtotal: line.subtotal().to_string(),
            id: line.id,
            product_id: line.product_id,
            product_name: line.product_name,
            unit_price: line.unit_price.to_string(),
            quantity: line.quantity,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    /// e.g. "RCD-001-JUA-090326-001"
    pub tracking_number: String,
    pub user_id: i64,
    pub status: OrderStatus,
    pub total_amount: String,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLineResponse>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.id,
            tracking_number: order.tracking_number,
            user_id: order.user_id,
            status: order.status,
            total_amount: order.total_amount.to_string(),
            created_at: order.created_at,
            lines: order.lines.into_iter().map(OrderLineResponse::from).collect(),
        }
    }
}

fn order_list(orders: Vec<Order>) -> Vec<OrderResponse> {
    orders.into_iter().map(OrderResponse::from).collect()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders
///
/// Every order with its lines, newest first.
#[utoipa::path(
    get,
    path = "/orders",
    responses((status = 200, description = "All orders", body = [OrderResponse])),
    tag = "orders"
)]
pub async fn list_orders(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let orders = blocking(move || state.orders.list_orders()).await?;
    Ok(HttpResponse::Ok().json(order_list(orders)))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let order = blocking(move || state.orders.get_order(id)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// GET /orders/user/{userId}
#[utoipa::path(
    get,
    path = "/orders/user/{userId}",
    params(("userId" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Orders of the user, newest first", body = [OrderResponse]),
        (status = 404, description = "User not found"),
    ),
    tag = "orders"
)]
pub async fn get_orders_by_user(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let orders = blocking(move || state.orders.get_orders_by_user(user_id)).await?;
    Ok(HttpResponse::Ok().json(order_list(orders)))
}

/// GET /orders/latest/{userId}
#[utoipa::path(
    get,
    path = "/orders/latest/{userId}",
    params(("userId" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Most recent order of the user", body = OrderResponse),
        (status = 404, description = "User not found or without orders"),
    ),
    tag = "orders"
)]
pub async fn get_latest_order(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let order = blocking(move || state.orders.get_latest_order(user_id)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// POST /orders/new
///
/// Creates a PENDING order with a fresh tracking number. The order row, its
/// lines and the total are written in a single transaction.
#[utoipa::path(
    post,
    path = "/orders/new",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "No lines or a quantity below 1"),
        (status = 404, description = "Unknown user or product"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let lines = line_items(body.lines);
    let order = blocking(move || state.orders.create_order(body.user_id, lines)).await?;
    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// PUT /orders/save
#[utoipa::path(
    put,
    path = "/orders/save",
    request_body = SaveOrderRequest,
    responses(
        (status = 200, description = "Order saved", body = OrderResponse),
        (status = 400, description = "Invalid order or status transition"),
        (status = 404, description = "Unknown user or product"),
    ),
    tag = "orders"
)]
pub async fn save_order(
    state: web::Data<AppState>,
    body: web::Json<SaveOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let draft = OrderDraft {
        id: body.id,
        user_id: body.user_id,
        status: body.status,
        lines: line_items(body.lines),
    };
    let order = blocking(move || state.orders.save_order(draft)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// POST /orders/{orderId}/products
///
/// Appends lines to an order and recomputes its total once.
#[utoipa::path(
    post,
    path = "/orders/{orderId}/products",
    params(("orderId" = i64, Path, description = "Order id")),
    request_body = AddProductsRequest,
    responses(
        (status = 200, description = "Updated order", body = OrderResponse),
        (status = 400, description = "No lines or a quantity below 1"),
        (status = 404, description = "Unknown order or product"),
    ),
    tag = "orders"
)]
pub async fn add_products(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<AddProductsRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let order = match body.into_inner() {
        AddProductsRequest::Single(line) => {
            blocking(move || state.orders.add_product(order_id, line.product_id, line.quantity))
                .await?
        }
        AddProductsRequest::Batch { lines } => {
            let lines = line_items(lines);
            blocking(move || state.orders.add_products(order_id, lines)).await?
        }
    };
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// POST /orders/{orderId}/recalculate
///
/// Reloads the lines and stores the total at current catalog prices.
#[utoipa::path(
    post,
    path = "/orders/{orderId}/recalculate",
    params(("orderId" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order with refreshed total", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn recalculate(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let order = blocking(move || state.orders.recalculate(order_id)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PUT /orders/{orderId}/status
#[utoipa::path(
    put,
    path = "/orders/{orderId}/status",
    params(("orderId" = i64, Path, description = "Order id")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Order with its new status", body = OrderResponse),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn update_status(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<StatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let status = body.into_inner().status;
    let order = blocking(move || state.orders.update_status(order_id, status)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// DELETE /orders/delete/{id}
#[utoipa::path(
    delete,
    path = "/orders/delete/{id}",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    blocking(move || state.orders.delete_order(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::get().to(list_orders))
            .route("/new", web::post().to(create_order))
            .route("/save", web::put().to(save_order))
            .route("/user/{user_id}", web::get().to(get_orders_by_user))
            .route("/latest/{user_id}", web::get().to(get_latest_order))
            .route("/delete/{id}", web::delete().to(delete_order))
            .route("/{order_id}/products", web::post().to(add_products))
            .route("/{order_id}/recalculate", web::post().to(recalculate))
            .route("/{order_id}/status", web::put().to(update_status))
            .route("/{id}", web::get().to(get_order)),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};
    use bigdecimal::BigDecimal;
    use chrono::TimeZone;
    use mockall::predicate::eq;
    use serde_json::{json, Value};

    use super::*;
    use crate::domain::order::{order_total, tracking_number};
    use crate::handlers::test_support::{album, juan, state_with, today, vinyl, Ports};

    fn line(id: i64, product_id: i64, price: &str, quantity: i32) -> OrderLine {
        OrderLine {
            id,
            product_id,
            product_name: "Artaud".to_string(),
            unit_price: price.parse().unwrap(),
            quantity,
        }
    }

    fn placed(id: i64, status: OrderStatus, lines: Vec<OrderLine>) -> Order {
        Order {
            id,
            tracking_number: tracking_number(1, "Juan Perez", today(), 1),
            user_id: 1,
            status,
            total_amount: order_total(&lines),
            created_at: Utc.with_ymd_and_hms(2026, 3, 9, 10, 0, 0).unwrap(),
            lines,
        }
    }

    #[actix_web::test]
    async fn create_order_returns_201_with_total_and_tracking_number() {
        let mut ports = Ports::default();
        ports.users.expect_find_by_id().returning(|_| Ok(Some(juan())));
        ports.products.expect_find_by_id().returning(|id| {
            Ok(Some(if id == 10 { album(id) } else { vinyl(id) }))
        });
        ports
            .orders
            .expect_create()
            .withf(|new| new.user_id == 1 && new.user_name == "Juan Perez" && new.lines.len() == 2)
            .returning(|_| {
                Ok(placed(
                    1,
                    OrderStatus::Pending,
                    vec![line(1, 11, "20.00", 2), line(2, 10, "25.00", 1)],
                ))
            });
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/orders/new")
            .set_json(json!({
                "user_id": 1,
                "lines": [
                    { "product_id": 11, "quantity": 2 },
                    { "product_id": 10, "quantity": 1 }
                ]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 201);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["total_amount"], "65.00");
        assert_eq!(body["tracking_number"], "RCD-001-JUA-090326-001");
        assert_eq!(body["status"], "PENDING");
        assert_eq!(body["lines"][0]["subtotal"], "40.00");
    }

    #[actix_web::test]
    async fn empty_order_is_400() {
        let mut ports = Ports::default();
        ports.orders.expect_create().never();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/orders/new")
            .set_json(json!({ "user_id": 1, "lines": [] }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn single_product_body_is_added() {
        let mut ports = Ports::default();
        ports
            .orders
            .expect_find_by_id()
            .returning(|id| Ok(Some(placed(id, OrderStatus::Pending, vec![]))));
        ports
            .products
            .expect_find_by_id()
            .returning(|id| Ok(Some(album(id))));
        ports
            .orders
            .expect_add_lines()
            .withf(|order_id, lines| {
                *order_id == 5
                    && lines
                        == &vec![LineItem {
                            product_id: 10,
                            quantity: 3,
                        }]
            })
            .returning(|id, _| Ok(placed(id, OrderStatus::Pending, vec![line(1, 10, "25.00", 3)])));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/orders/5/products")
            .set_json(json!({ "product_id": 10, "quantity": 3 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total_amount"], "75.00");
    }

    #[actix_web::test]
    async fn forbidden_status_transition_is_400() {
        let mut ports = Ports::default();
        ports
            .orders
            .expect_find_by_id()
            .with(eq(4))
            .returning(|id| Ok(Some(placed(id, OrderStatus::Cancelled, vec![]))));
        ports.orders.expect_update_status().never();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/orders/4/status")
            .set_json(json!({ "status": "SHIPPED" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn save_existing_order_applies_status_and_recalculates() {
        let mut ports = Ports::default();
        ports
            .orders
            .expect_find_by_id()
            .returning(|id| Ok(Some(placed(id, OrderStatus::Pending, vec![]))));
        ports
            .orders
            .expect_update_status()
            .with(eq(3), eq(OrderStatus::Pending), eq(OrderStatus::Paid))
            .returning(|id, _, status| Ok(placed(id, status, vec![])));
        ports.orders.expect_recalculate().with(eq(3)).returning(|id| {
            Ok(placed(id, OrderStatus::Paid, vec![line(1, 10, "25.00", 1)]))
        });
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/orders/save")
            .set_json(json!({ "id": 3, "user_id": 1, "status": "PAID" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "PAID");
        assert_eq!(body["total_amount"], "25.00");
    }

    #[actix_web::test]
    async fn latest_order_for_user_without_orders_is_404() {
        let mut ports = Ports::default();
        ports.users.expect_find_by_id().returning(|_| Ok(Some(juan())));
        ports
            .orders
            .expect_find_latest_by_user()
            .returning(|_| Ok(None));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/orders/latest/1").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 404);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "User 1 has no orders");
    }

    #[::core::prelude::v1::test]
    fn line_subtotal_is_rendered_as_decimal_string() {
        let response = OrderLineResponse::from(line(1, 10, "19.99", 3));
        assert_eq!(response.subtotal, "59.97");
        assert_eq!(
            "59.97".parse::<BigDecimal>().unwrap(),
            line(1, 10, "19.99", 3).subtotal()
        );
    }
}
