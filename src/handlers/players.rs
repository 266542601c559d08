use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::catalog::{Category, Player, ProductKind};
use crate::domain::product_patch::{KindPatch, PlayerPatch};
use crate::errors::AppError;
use crate::state::AppState;

use super::products::{self, ProductQueryParams, ProductResponse};
use super::CountResponse;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePlayerRequest {
    pub name: String,
    /// Decimal price as a string, e.g. "89.99"
    pub price: String,
    pub stock: i32,
    pub attributes: Player,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePlayerRequest {
    pub name: Option<String>,
    pub price: Option<String>,
    pub stock: Option<i32>,
    #[serde(default)]
    pub attributes: PlayerPatch,
}

/// GET /players
#[utoipa::path(
    get,
    path = "/players",
    params(ProductQueryParams),
    responses((status = 200, description = "Matching players", body = [ProductResponse])),
    tag = "players"
)]
pub async fn list_players(
    state: web::Data<AppState>,
    query: web::Query<ProductQueryParams>,
) -> Result<HttpResponse, AppError> {
    products::list_kind(state, Category::Player, query.into_inner()).await
}

/// GET /players/count
#[utoipa::path(
    get,
    path = "/players/count",
    params(ProductQueryParams),
    responses((status = 200, description = "Number of matching players", body = CountResponse)),
    tag = "players"
)]
pub async fn count_players(
    state: web::Data<AppState>,
    query: web::Query<ProductQueryParams>,
) -> Result<HttpResponse, AppError> {
    products::count_kind(state, Category::Player, query.into_inner()).await
}

/// GET /players/{id}
#[utoipa::path(
    get,
    path = "/players/{id}",
    params(("id" = i64, Path, description = "Player id")),
    responses(
        (status = 200, description = "Player found", body = ProductResponse),
        (status = 404, description = "Player not found"),
    ),
    tag = "players"
)]
pub async fn get_player(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    products::get_kind(state, Category::Player, path.into_inner()).await
}

/// POST /players/new
#[utoipa::path(
    post,
    path = "/players/new",
    request_body = CreatePlayerRequest,
    responses(
        (status = 201, description = "Player created", body = ProductResponse),
        (status = 400, description = "Invalid player"),
    ),
    tag = "players"
)]
pub async fn create_player(
    state: web::Data<AppState>,
    body: web::Json<CreatePlayerRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    products::create_kind(
        state,
        body.name,
        &body.price,
        body.stock,
        ProductKind::Player(body.attributes),
    )
    .await
}

/// PUT /players/update/{id}
#[utoipa::path(
    put,
    path = "/players/update/{id}",
    params(("id" = i64, Path, description = "Player id")),
    request_body = UpdatePlayerRequest,
    responses(
        (status = 200, description = "Player updated", body = ProductResponse),
        (status = 400, description = "Invalid player"),
        (status = 404, description = "Player not found"),
    ),
    tag = "players"
)]
pub async fn update_player(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdatePlayerRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    products::update_kind(
        state,
        path.into_inner(),
        body.name,
        body.price,
        body.stock,
        KindPatch::Player(body.attributes),
    )
    .await
}

/// DELETE /players/delete/{id}
#[utoipa::path(
    delete,
    path = "/players/delete/{id}",
    params(("id" = i64, Path, description = "Player id")),
    responses(
        (status = 204, description = "Player deleted"),
        (status = 404, description = "Player not found"),
        (status = 409, description = "Player is ordered or wishlisted"),
    ),
    tag = "players"
)]
pub async fn delete_player(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    products::delete_kind(state, Category::Player, path.into_inner()).await
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/players")
            .route("", web::get().to(list_players))
            .route("/count", web::get().to(count_players))
            .route("/new", web::post().to(create_player))
            .route("/update/{id}", web::put().to(update_player))
            .route("/delete/{id}", web::delete().to(delete_player))
            .route("/{id}", web::get().to(get_player)),
    );
}
