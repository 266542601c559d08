use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::catalog::{Category, ProductKind, Rpm, Vinyl, VinylSize};
use crate::domain::product_patch::{AlbumPatch, KindPatch, VinylPatch};
use crate::errors::AppError;
use crate::state::AppState;

use super::products::{self, ProductQueryParams, ProductResponse};
use super::CountResponse;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVinylRequest {
    pub name: String,
    /// Decimal price as a string, e.g. "39.90"
    pub price: String,
    pub stock: i32,
    pub attributes: Vinyl,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct VinylChanges {
    #[serde(default)]
    pub album: AlbumPatch,
    pub size: Option<VinylSize>,
    /// RPM_33, RPM_45 or RPM_78.
    pub rpm: Option<Rpm>,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateVinylRequest {
    pub name: Option<String>,
    pub price: Option<String>,
    pub stock: Option<i32>,
    #[serde(default)]
    pub attributes: VinylChanges,
}

/// GET /vinyls
#[utoipa::path(
    get,
    path = "/vinyls",
    params(ProductQueryParams),
    responses((status = 200, description = "Matching vinyls", body = [ProductResponse])),
    tag = "vinyls"
)]
pub async fn list_vinyls(
    state: web::Data<AppState>,
    query: web::Query<ProductQueryParams>,
) -> Result<HttpResponse, AppError> {
    products::list_kind(state, Category::Vinyl, query.into_inner()).await
}

/// GET /vinyls/count
#[utoipa::path(
    get,
    path = "/vinyls/count",
    params(ProductQueryParams),
    responses((status = 200, description = "Number of matching vinyls", body = CountResponse)),
    tag = "vinyls"
)]
pub async fn count_vinyls(
    state: web::Data<AppState>,
    query: web::Query<ProductQueryParams>,
) -> Result<HttpResponse, AppError> {
    products::count_kind(state, Category::Vinyl, query.into_inner()).await
}

/// GET /vinyls/{id}
#[utoipa::path(
    get,
    path = "/vinyls/{id}",
    params(("id" = i64, Path, description = "Vinyl id")),
    responses(
        (status = 200, description = "Vinyl found", body = ProductResponse),
        (status = 404, description = "Vinyl not found"),
    ),
    tag = "vinyls"
)]
pub async fn get_vinyl(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    products::get_kind(state, Category::Vinyl, path.into_inner()).await
}

/// POST /vinyls/new
///
/// A record is cut at exactly one speed, so combined rpm values are refused.
#[utoipa::path(
    post,
    path = "/vinyls/new",
    request_body = CreateVinylRequest,
    responses(
        (status = 201, description = "Vinyl created", body = ProductResponse),
        (status = 400, description = "Invalid vinyl"),
    ),
    tag = "vinyls"
)]
pub async fn create_vinyl(
    state: web::Data<AppState>,
    body: web::Json<CreateVinylRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    products::create_kind(
        state,
        body.name,
        &body.price,
        body.stock,
        ProductKind::Vinyl(body.attributes),
    )
    .await
}

/// PUT /vinyls/update/{id}
#[utoipa::path(
    put,
    path = "/vinyls/update/{id}",
    params(("id" = i64, Path, description = "Vinyl id")),
    request_body = UpdateVinylRequest,
    responses(
        (status = 200, description = "Vinyl updated", body = ProductResponse),
        (status = 400, description = "Invalid vinyl"),
        (status = 404, description = "Vinyl not found"),
    ),
    tag = "vinyls"
)]
pub async fn update_vinyl(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateVinylRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let changes = body.attributes;
    products::update_kind(
        state,
        path.into_inner(),
        body.name,
        body.price,
        body.stock,
        KindPatch::Vinyl(
            changes.album,
            VinylPatch {
                size: changes.size,
                rpm: changes.rpm,
                color: changes.color,
            },
        ),
    )
    .await
}

/// DELETE /vinyls/delete/{id}
#[utoipa::path(
    delete,
    path = "/vinyls/delete/{id}",
    params(("id" = i64, Path, description = "Vinyl id")),
    responses(
        (status = 204, description = "Vinyl deleted"),
        (status = 404, description = "Vinyl not found"),
        (status = 409, description = "Vinyl is ordered or wishlisted"),
    ),
    tag = "vinyls"
)]
pub async fn delete_vinyl(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    products::delete_kind(state, Category::Vinyl, path.into_inner()).await
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/vinyls")
            .route("", web::get().to(list_vinyls))
            .route("/count", web::get().to(count_vinyls))
            .route("/new", web::post().to(create_vinyl))
            .route("/update/{id}", web::put().to(update_vinyl))
            .route("/delete/{id}", web::delete().to(delete_vinyl))
            .route("/{id}", web::get().to(get_vinyl)),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};
    use serde_json::{json, Value};

    use super::*;
    use crate::handlers::test_support::{state_with, vinyl, Ports};

    fn vinyl_body(rpm: &str, year: i32) -> Value {
        json!({
            "name": "Artaud",
            "price": "40",
            "stock": 2,
            "attributes": {
                "album": {
                    "artist": "Pescado Rabioso",
                    "year": year,
                    "format": "LP",
                    "genre": "ROCK",
                    "duration": "34:52"
                },
                "size": "S_12",
                "rpm": rpm,
                "color": "black"
            }
        })
    }

    async fn post(ports: Ports, body: Value) -> u16 {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/vinyls/new")
            .set_json(body)
            .to_request();
        test::call_service(&app, req).await.status().as_u16()
    }

    fn accepting() -> Ports {
        let mut ports = Ports::default();
        ports.products.expect_create().returning(|new| {
            Ok(crate::domain::catalog::Product {
                id: 1,
                name: new.name,
                price: new.price,
                stock: new.stock,
                kind: new.kind,
            })
        });
        ports
    }

    #[actix_web::test]
    async fn year_1850_is_rejected_and_2024_accepted() {
        assert_eq!(post(accepting(), vinyl_body("RPM_33", 1850)).await, 400);
        assert_eq!(post(accepting(), vinyl_body("RPM_33", 2024)).await, 201);
    }

    #[actix_web::test]
    async fn combined_rpm_is_rejected() {
        assert_eq!(post(accepting(), vinyl_body("RPM_33_45", 2024)).await, 400);
    }

    #[actix_web::test]
    async fn unknown_enum_value_is_400() {
        assert_eq!(post(accepting(), vinyl_body("RPM_16", 2024)).await, 400);
    }

    #[actix_web::test]
    async fn update_merges_nested_album_fields() {
        let mut ports = Ports::default();
        ports
            .products
            .expect_find_by_id()
            .returning(|id| Ok(Some(vinyl(id))));
        ports
            .products
            .expect_update()
            .returning(|product| Ok(product.clone()));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/vinyls/update/4")
            .set_json(json!({ "attributes": { "album": { "year": 1972 }, "color": "red" } }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["attributes"]["album"]["year"], 1972);
        assert_eq!(body["attributes"]["album"]["artist"], "Pescado Rabioso");
        assert_eq!(body["attributes"]["color"], "red");
        assert_eq!(body["attributes"]["rpm"], "RPM_33");
    }
}
