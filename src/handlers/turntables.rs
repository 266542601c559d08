use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::catalog::{Category, Mechanism, ProductKind, Rpm, Traction, Turntable};
use crate::domain::product_patch::{KindPatch, PlayerPatch, TurntablePatch};
use crate::errors::AppError;
use crate::state::AppState;

use super::products::{self, ProductQueryParams, ProductResponse};
use super::CountResponse;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTurntableRequest {
    pub name: String,
    /// Decimal price as a string, e.g. "699.00"
    pub price: String,
    pub stock: i32,
    pub attributes: Turntable,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TurntableChanges {
    #[serde(default)]
    pub player: PlayerPatch,
    pub has_built_in_pre_amp: Option<bool>,
    pub rpm: Option<Rpm>,
    pub traction: Option<Traction>,
    pub mechanism: Option<Mechanism>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTurntableRequest {
    pub name: Option<String>,
    pub price: Option<String>,
    pub stock: Option<i32>,
    #[serde(default)]
    pub attributes: TurntableChanges,
}

/// GET /turntables
#[utoipa::path(
    get,
    path = "/turntables",
    params(ProductQueryParams),
    responses((status = 200, description = "Matching turntables", body = [ProductResponse])),
    tag = "turntables"
)]
pub async fn list_turntables(
    state: web::Data<AppState>,
    query: web::Query<ProductQueryParams>,
) -> Result<HttpResponse, AppError> {
    products::list_kind(state, Category::Turntable, query.into_inner()).await
}

/// GET /turntables/count
#[utoipa::path(
    get,
    path = "/turntables/count",
    params(ProductQueryParams),
    responses((status = 200, description = "Number of matching turntables", body = CountResponse)),
    tag = "turntables"
)]
pub async fn count_turntables(
    state: web::Data<AppState>,
    query: web::Query<ProductQueryParams>,
) -> Result<HttpResponse, AppError> {
    products::count_kind(state, Category::Turntable, query.into_inner()).await
}

/// GET /turntables/{id}
#[utoipa::path(
    get,
    path = "/turntables/{id}",
    params(("id" = i64, Path, description = "Turntable id")),
    responses(
        (status = 200, description = "Turntable found", body = ProductResponse),
        (status = 404, description = "Turntable not found"),
    ),
    tag = "turntables"
)]
pub async fn get_turntable(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    products::get_kind(state, Category::Turntable, path.into_inner()).await
}

/// POST /turntables/new
///
/// Unlike vinyls, turntables accept combined speeds such as RPM_33_45.
#[utoipa::path(
    post,
    path = "/turntables/new",
    request_body = CreateTurntableRequest,
    responses(
        (status = 201, description = "Turntable created", body = ProductResponse),
        (status = 400, description = "Invalid turntable"),
    ),
    tag = "turntables"
)]
pub async fn create_turntable(
    state: web::Data<AppState>,
    body: web::Json<CreateTurntableRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    products::create_kind(
        state,
        body.name,
        &body.price,
        body.stock,
        ProductKind::Turntable(body.attributes),
    )
    .await
}

/// PUT /turntables/update/{id}
#[utoipa::path(
    put,
    path = "/turntables/update/{id}",
    params(("id" = i64, Path, description = "Turntable id")),
    request_body = UpdateTurntableRequest,
    responses(
        (status = 200, description = "Turntable updated", body = ProductResponse),
        (status = 400, description = "Invalid turntable"),
        (status = 404, description = "Turntable not found"),
    ),
    tag = "turntables"
)]
pub async fn update_turntable(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateTurntableRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let changes = body.attributes;
    products::update_kind(
        state,
        path.into_inner(),
        body.name,
        body.price,
        body.stock,
        KindPatch::Turntable(
            changes.player,
            TurntablePatch {
                has_built_in_pre_amp: changes.has_built_in_pre_amp,
                rpm: changes.rpm,
                traction: changes.traction,
                mechanism: changes.mechanism,
            },
        ),
    )
    .await
}

/// DELETE /turntables/delete/{id}
#[utoipa::path(
    delete,
    path = "/turntables/delete/{id}",
    params(("id" = i64, Path, description = "Turntable id")),
    responses(
        (status = 204, description = "Turntable deleted"),
        (status = 404, description = "Turntable not found"),
        (status = 409, description = "Turntable is ordered or wishlisted"),
    ),
    tag = "turntables"
)]
pub async fn delete_turntable(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    products::delete_kind(state, Category::Turntable, path.into_inner()).await
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/turntables")
            .route("", web::get().to(list_turntables))
            .route("/count", web::get().to(count_turntables))
            .route("/new", web::post().to(create_turntable))
            .route("/update/{id}", web::put().to(update_turntable))
            .route("/delete/{id}", web::delete().to(delete_turntable))
            .route("/{id}", web::get().to(get_turntable)),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};
    use serde_json::{json, Value};

    use super::*;
    use crate::domain::catalog::Product;
    use crate::handlers::test_support::{state_with, Ports};

    #[actix_web::test]
    async fn combined_speed_is_accepted() {
        let mut ports = Ports::default();
        ports.products.expect_create().returning(|new| {
            Ok(Product {
                id: 21,
                name: new.name,
                price: new.price,
                stock: new.stock,
                kind: new.kind,
            })
        });
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/turntables/new")
            .set_json(json!({
                "name": "SL-1200",
                "price": "699",
                "stock": 1,
                "attributes": {
                    "player": {
                        "brand": "Technics",
                        "color": "silver",
                        "warranty": 24,
                        "bluetooth": false,
                        "usb": false,
                        "radio": false,
                        "aux": false,
                        "rca": true,
                        "built_in_speaker": false
                    },
                    "has_built_in_pre_amp": false,
                    "rpm": "RPM_33_45_78",
                    "traction": "DIRECT_DRIVE",
                    "mechanism": "MANUAL"
                }
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 201);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["category"], "TURNTABLE");
        assert_eq!(body["price"], "699.00");
        assert_eq!(body["attributes"]["rpm"], "RPM_33_45_78");
    }
}
