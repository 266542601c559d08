use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::catalog::{Category, PowerType, ProductKind, Resistance, Speaker};
use crate::domain::product_patch::{AudioEquipmentPatch, KindPatch, SpeakerPatch};
use crate::errors::AppError;
use crate::state::AppState;

use super::products::{self, ProductQueryParams, ProductResponse};
use super::CountResponse;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSpeakerRequest {
    pub name: String,
    /// Decimal price as a string, e.g. "299.00"
    pub price: String,
    pub stock: i32,
    pub attributes: Speaker,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SpeakerChanges {
    #[serde(default)]
    pub equipment: AudioEquipmentPatch,
    pub radio: Option<bool>,
    pub power: Option<i32>,
    pub impedance: Option<i32>,
    pub min_frequency: Option<i32>,
    pub max_frequency: Option<i32>,
    pub weight: Option<i32>,
    pub power_type: Option<PowerType>,
    pub resistance: Option<Resistance>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSpeakerRequest {
    pub name: Option<String>,
    pub price: Option<String>,
    pub stock: Option<i32>,
    #[serde(default)]
    pub attributes: SpeakerChanges,
}

/// GET /speakers
#[utoipa::path(
    get,
    path = "/speakers",
    params(ProductQueryParams),
    responses((status = 200, description = "Matching speakers", body = [ProductResponse])),
    tag = "speakers"
)]
pub async fn list_speakers(
    state: web::Data<AppState>,
    query: web::Query<ProductQueryParams>,
) -> Result<HttpResponse, AppError> {
    products::list_kind(state, Category::Speaker, query.into_inner()).await
}

/// GET /speakers/count
#[utoipa::path(
    get,
    path = "/speakers/count",
    params(ProductQueryParams),
    responses((status = 200, description = "Number of matching speakers", body = CountResponse)),
    tag = "speakers"
)]
pub async fn count_speakers(
    state: web::Data<AppState>,
    query: web::Query<ProductQueryParams>,
) -> Result<HttpResponse, AppError> {
    products::count_kind(state, Category::Speaker, query.into_inner()).await
}

/// GET /speakers/{id}
#[utoipa::path(
    get,
    path = "/speakers/{id}",
    params(("id" = i64, Path, description = "Speaker id")),
    responses(
        (status = 200, description = "Speaker found", body = ProductResponse),
        (status = 404, description = "Speaker not found"),
    ),
    tag = "speakers"
)]
pub async fn get_speaker(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    products::get_kind(state, Category::Speaker, path.into_inner()).await
}

/// POST /speakers/new
#[utoipa::path(
    post,
    path = "/speakers/new",
    request_body = CreateSpeakerRequest,
    responses(
        (status = 201, description = "Speaker created", body = ProductResponse),
        (status = 400, description = "Invalid speaker"),
    ),
    tag = "speakers"
)]
pub async fn create_speaker(
    state: web::Data<AppState>,
    body: web::Json<CreateSpeakerRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    products::create_kind(
        state,
        body.name,
        &body.price,
        body.stock,
        ProductKind::Speaker(body.attributes),
    )
    .await
}

/// PUT /speakers/update/{id}
#[utoipa::path(
    put,
    path = "/speakers/update/{id}",
    params(("id" = i64, Path, description = "Speaker id")),
    request_body = UpdateSpeakerRequest,
    responses(
        (status = 200, description = "Speaker updated", body = ProductResponse),
        (status = 400, description = "Invalid speaker"),
        (status = 404, description = "Speaker not found"),
    ),
    tag = "speakers"
)]
pub async fn update_speaker(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateSpeakerRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let changes = body.attributes;
    products::update_kind(
        state,
        path.into_inner(),
        body.name,
        body.price,
        body.stock,
        KindPatch::Speaker(
            changes.equipment,
            SpeakerPatch {
                radio: changes.radio,
                power: changes.power,
                impedance: changes.impedance,
                min_frequency: changes.min_frequency,
                max_frequency: changes.max_frequency,
                weight: changes.weight,
                power_type: changes.power_type,
                resistance: changes.resistance,
            },
        ),
    )
    .await
}

/// DELETE /speakers/delete/{id}
#[utoipa::path(
    delete,
    path = "/speakers/delete/{id}",
    params(("id" = i64, Path, description = "Speaker id")),
    responses(
        (status = 204, description = "Speaker deleted"),
        (status = 404, description = "Speaker not found"),
        (status = 409, description = "Speaker is ordered or wishlisted"),
    ),
    tag = "speakers"
)]
pub async fn delete_speaker(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    products::delete_kind(state, Category::Speaker, path.into_inner()).await
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/speakers")
            .route("", web::get().to(list_speakers))
            .route("/count", web::get().to(count_speakers))
            .route("/new", web::post().to(create_speaker))
            .route("/update/{id}", web::put().to(update_speaker))
            .route("/delete/{id}", web::delete().to(delete_speaker))
            .route("/{id}", web::get().to(get_speaker)),
    );
}
