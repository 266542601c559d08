use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::catalog::{Anc, Category, Headphone, HeadphoneType, ProductKind};
use crate::domain::product_patch::{AudioEquipmentPatch, HeadphonePatch, KindPatch};
use crate::errors::AppError;
use crate::state::AppState;

use super::products::{self, ProductQueryParams, ProductResponse};
use super::CountResponse;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateHeadphoneRequest {
    pub name: String,
    /// Decimal price as a string, e.g. "149.90"
    pub price: String,
    pub stock: i32,
    pub attributes: Headphone,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct HeadphoneChanges {
    #[serde(default)]
    pub equipment: AudioEquipmentPatch,
    pub headphone_type: Option<HeadphoneType>,
    pub anc: Option<Anc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateHeadphoneRequest {
    pub name: Option<String>,
    pub price: Option<String>,
    pub stock: Option<i32>,
    #[serde(default)]
    pub attributes: HeadphoneChanges,
}

/// GET /headphones
#[utoipa::path(
    get,
    path = "/headphones",
    params(ProductQueryParams),
    responses((status = 200, description = "Matching headphones", body = [ProductResponse])),
    tag = "headphones"
)]
pub async fn list_headphones(
    state: web::Data<AppState>,
    query: web::Query<ProductQueryParams>,
) -> Result<HttpResponse, AppError> {
    products::list_kind(state, Category::Headphone, query.into_inner()).await
}

/// GET /headphones/count
#[utoipa::path(
    get,
    path = "/headphones/count",
    params(ProductQueryParams),
    responses((status = 200, description = "Number of matching headphones", body = CountResponse)),
    tag = "headphones"
)]
pub async fn count_headphones(
    state: web::Data<AppState>,
    query: web::Query<ProductQueryParams>,
) -> Result<HttpResponse, AppError> {
    products::count_kind(state, Category::Headphone, query.into_inner()).await
}

/// GET /headphones/{id}
#[utoipa::path(
    get,
    path = "/headphones/{id}",
    params(("id" = i64, Path, description = "Headphone id")),
    responses(
        (status = 200, description = "Headphone found", body = ProductResponse),
        (status = 404, description = "Headphone not found"),
    ),
    tag = "headphones"
)]
pub async fn get_headphone(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    products::get_kind(state, Category::Headphone, path.into_inner()).await
}

/// POST /headphones/new
#[utoipa::path(
    post,
    path = "/headphones/new",
    request_body = CreateHeadphoneRequest,
    responses(
        (status = 201, description = "Headphone created", body = ProductResponse),
        (status = 400, description = "Invalid headphone"),
    ),
    tag = "headphones"
)]
pub async fn create_headphone(
    state: web::Data<AppState>,
    body: web::Json<CreateHeadphoneRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    products::create_kind(
        state,
        body.name,
        &body.price,
        body.stock,
        ProductKind::Headphone(body.attributes),
    )
    .await
}

/// PUT /headphones/update/{id}
#[utoipa::path(
    put,
    path = "/headphones/update/{id}",
    params(("id" = i64, Path, description = "Headphone id")),
    request_body = UpdateHeadphoneRequest,
    responses(
        (status = 200, description = "Headphone updated", body = ProductResponse),
        (status = 400, description = "Invalid headphone"),
        (status = 404, description = "Headphone not found"),
    ),
    tag = "headphones"
)]
pub async fn update_headphone(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateHeadphoneRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let changes = body.attributes;
    products::update_kind(
        state,
        path.into_inner(),
        body.name,
        body.price,
        body.stock,
        KindPatch::Headphone(
            changes.equipment,
            HeadphonePatch {
                headphone_type: changes.headphone_type,
                anc: changes.anc,
            },
        ),
    )
    .await
}

/// DELETE /headphones/delete/{id}
#[utoipa::path(
    delete,
    path = "/headphones/delete/{id}",
    params(("id" = i64, Path, description = "Headphone id")),
    responses(
        (status = 204, description = "Headphone deleted"),
        (status = 404, description = "Headphone not found"),
        (status = 409, description = "Headphone is ordered or wishlisted"),
    ),
    tag = "headphones"
)]
pub async fn delete_headphone(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    products::delete_kind(state, Category::Headphone, path.into_inner()).await
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/headphones")
            .route("", web::get().to(list_headphones))
            .route("/count", web::get().to(count_headphones))
            .route("/new", web::post().to(create_headphone))
            .route("/update/{id}", web::put().to(update_headphone))
            .route("/delete/{id}", web::delete().to(delete_headphone))
            .route("/{id}", web::get().to(get_headphone)),
    );
}
