use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::catalog::{Category, Portable, PortableType, PowerType, ProductKind, Resistance};
use crate::domain::product_patch::{KindPatch, PlayerPatch, PortablePatch};
use crate::errors::AppError;
use crate::state::AppState;

use super::products::{self, ProductQueryParams, ProductResponse};
use super::CountResponse;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePortableRequest {
    pub name: String,
    /// Decimal price as a string, e.g. "59.90"
    pub price: String,
    pub stock: i32,
    pub attributes: Portable,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PortableChanges {
    #[serde(default)]
    pub player: PlayerPatch,
    pub portable_type: Option<PortableType>,
    pub power_type: Option<PowerType>,
    pub battery_life: Option<i32>,
    pub resistance: Option<Resistance>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePortableRequest {
    pub name: Option<String>,
    pub price: Option<String>,
    pub stock: Option<i32>,
    #[serde(default)]
    pub attributes: PortableChanges,
}

/// GET /portables
#[utoipa::path(
    get,
    path = "/portables",
    params(ProductQueryParams),
    responses((status = 200, description = "Matching portables", body = [ProductResponse])),
    tag = "portables"
)]
pub async fn list_portables(
    state: web::Data<AppState>,
    query: web::Query<ProductQueryParams>,
) -> Result<HttpResponse, AppError> {
    products::list_kind(state, Category::Portable, query.into_inner()).await
}

/// GET /portables/count
#[utoipa::path(
    get,
    path = "/portables/count",
    params(ProductQueryParams),
    responses((status = 200, description = "Number of matching portables", body = CountResponse)),
    tag = "portables"
)]
pub async fn count_portables(
    state: web::Data<AppState>,
    query: web::Query<ProductQueryParams>,
) -> Result<HttpResponse, AppError> {
    products::count_kind(state, Category::Portable, query.into_inner()).await
}

/// GET /portables/{id}
#[utoipa::path(
    get,
    path = "/portables/{id}",
    params(("id" = i64, Path, description = "Portable id")),
    responses(
        (status = 200, description = "Portable found", body = ProductResponse),
        (status = 404, description = "Portable not found"),
    ),
    tag = "portables"
)]
pub async fn get_portable(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    products::get_kind(state, Category::Portable, path.into_inner()).await
}

/// POST /portables/new
#[utoipa::path(
    post,
    path = "/portables/new",
    request_body = CreatePortableRequest,
    responses(
        (status = 201, description = "Portable created", body = ProductResponse),
        (status = 400, description = "Invalid portable"),
    ),
    tag = "portables"
)]
pub async fn create_portable(
    state: web::Data<AppState>,
    body: web::Json<CreatePortableRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    products::create_kind(
        state,
        body.name,
        &body.price,
        body.stock,
        ProductKind::Portable(body.attributes),
    )
    .await
}

/// PUT /portables/update/{id}
#[utoipa::path(
    put,
    path = "/portables/update/{id}",
    params(("id" = i64, Path, description = "Portable id")),
    request_body = UpdatePortableRequest,
    responses(
        (status = 200, description = "Portable updated", body = ProductResponse),
        (status = 400, description = "Invalid portable"),
        (status = 404, description = "Portable not found"),
    ),
    tag = "portables"
)]
pub async fn update_portable(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdatePortableRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let changes = body.attributes;
    products::update_kind(
        state,
        path.into_inner(),
        body.name,
        body.price,
        body.stock,
        KindPatch::Portable(
            changes.player,
            PortablePatch {
                portable_type: changes.portable_type,
                power_type: changes.power_type,
                battery_life: changes.battery_life,
                resistance: changes.resistance,
            },
        ),
    )
    .await
}

/// DELETE /portables/delete/{id}
#[utoipa::path(
    delete,
    path = "/portables/delete/{id}",
    params(("id" = i64, Path, description = "Portable id")),
    responses(
        (status = 204, description = "Portable deleted"),
        (status = 404, description = "Portable not found"),
        (status = 409, description = "Portable is ordered or wishlisted"),
    ),
    tag = "portables"
)]
pub async fn delete_portable(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    products::delete_kind(state, Category::Portable, path.into_inner()).await
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/portables")
            .route("", web::get().to(list_portables))
            .route("/count", web::get().to(count_portables))
            .route("/new", web::post().to(create_portable))
            .route("/update/{id}", web::put().to(update_portable))
            .route("/delete/{id}", web::delete().to(delete_portable))
            .route("/{id}", web::get().to(get_portable)),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};

    use super::*;
    use crate::handlers::test_support::{headphone, state_with, Ports};

    #[actix_web::test]
    async fn update_of_another_kind_is_404() {
        let mut ports = Ports::default();
        ports
            .products
            .expect_find_by_id()
            .returning(|id| Ok(Some(headphone(id))));
        ports.products.expect_update().never();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/portables/update/3")
            .set_json(serde_json::json!({ "stock": 9 }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 404);
    }
}
