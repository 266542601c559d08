use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::domain::catalog::{Album, Category, Genre, ProductKind};
use crate::domain::product_patch::{AlbumPatch, KindPatch};
use crate::domain::product_query::ProductQuery;
use crate::errors::AppError;
use crate::state::AppState;

use super::products::{self, ProductQueryParams, ProductResponse};
use super::CountResponse;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAlbumRequest {
    pub name: String,
    /// Decimal price as a string, e.g. "19.99"
    pub price: String,
    pub stock: i32,
    pub attributes: Album,
}

/// Only the given fields change.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAlbumRequest {
    pub name: Option<String>,
    pub price: Option<String>,
    pub stock: Option<i32>,
    #[serde(default)]
    pub attributes: AlbumPatch,
}

/// Also accepted as `startYear` / `endYear`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct YearRangeParams {
    #[serde(alias = "startYear")]
    pub start_year: i32,
    #[serde(alias = "endYear")]
    pub end_year: i32,
}

/// GET /albums
#[utoipa::path(
    get,
    path = "/albums",
    params(ProductQueryParams),
    responses((status = 200, description = "Matching albums", body = [ProductResponse])),
    tag = "albums"
)]
pub async fn list_albums(
    state: web::Data<AppState>,
    query: web::Query<ProductQueryParams>,
) -> Result<HttpResponse, AppError> {
    products::list_kind(state, Category::Album, query.into_inner()).await
}

/// GET /albums/count
#[utoipa::path(
    get,
    path = "/albums/count",
    params(ProductQueryParams),
    responses((status = 200, description = "Number of matching albums", body = CountResponse)),
    tag = "albums"
)]
pub async fn count_albums(
    state: web::Data<AppState>,
    query: web::Query<ProductQueryParams>,
) -> Result<HttpResponse, AppError> {
    products::count_kind(state, Category::Album, query.into_inner()).await
}

/// GET /albums/{id}
#[utoipa::path(
    get,
    path = "/albums/{id}",
    params(("id" = i64, Path, description = "Album id")),
    responses(
        (status = 200, description = "Album found", body = ProductResponse),
        (status = 404, description = "Album not found"),
    ),
    tag = "albums"
)]
pub async fn get_album(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    products::get_kind(state, Category::Album, path.into_inner()).await
}

/// GET /albums/artist/{artist}
///
/// Albums whose artist contains `artist`, ignoring case.
#[utoipa::path(
    get,
    path = "/albums/artist/{artist}",
    params(("artist" = String, Path, description = "Artist name or part of it")),
    responses((status = 200, description = "Albums by the artist", body = [ProductResponse])),
    tag = "albums"
)]
pub async fn albums_by_artist(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let query = ProductQuery {
        artist: Some(path.into_inner()),
        ..ProductQuery::for_category(Category::Album)
    };
    products::search(state, query).await
}

/// GET /albums/genre/{genre}
#[utoipa::path(
    get,
    path = "/albums/genre/{genre}",
    params(("genre" = Genre, Path, description = "e.g. ROCK")),
    responses(
        (status = 200, description = "Albums of the genre", body = [ProductResponse]),
        (status = 400, description = "Unknown genre"),
    ),
    tag = "albums"
)]
pub async fn albums_by_genre(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let genre: Genre = path.into_inner().to_uppercase().parse()?;
    let query = ProductQuery {
        genre: Some(genre),
        ..ProductQuery::for_category(Category::Album)
    };
    products::search(state, query).await
}

/// GET /albums/year-range?start_year=&end_year=
///
/// Both bounds are inclusive.
#[utoipa::path(
    get,
    path = "/albums/year-range",
    params(YearRangeParams),
    responses(
        (status = 200, description = "Albums released in the range", body = [ProductResponse]),
        (status = 400, description = "Start year after end year"),
    ),
    tag = "albums"
)]
pub async fn albums_by_year_range(
    state: web::Data<AppState>,
    query: web::Query<YearRangeParams>,
) -> Result<HttpResponse, AppError> {
    let range = query.into_inner();
    let query = ProductQuery {
        min_year: Some(range.start_year),
        max_year: Some(range.end_year),
        ..ProductQuery::for_category(Category::Album)
    };
    products::search(state, query).await
}

/// POST /albums/new
#[utoipa::path(
    post,
    path = "/albums/new",
    request_body = CreateAlbumRequest,
    responses(
        (status = 201, description = "Album created", body = ProductResponse),
        (status = 400, description = "Invalid album"),
    ),
    tag = "albums"
)]
pub async fn create_album(
    state: web::Data<AppState>,
    body: web::Json<CreateAlbumRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    products::create_kind(
        state,
        body.name,
        &body.price,
        body.stock,
        ProductKind::Album(body.attributes),
    )
    .await
}

/// PUT /albums/update/{id}
#[utoipa::path(
    put,
    path = "/albums/update/{id}",
    params(("id" = i64, Path, description = "Album id")),
    request_body = UpdateAlbumRequest,
    responses(
        (status = 200, description = "Album updated", body = ProductResponse),
        (status = 400, description = "Invalid album"),
        (status = 404, description = "Album not found"),
    ),
    tag = "albums"
)]
pub async fn update_album(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateAlbumRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    products::update_kind(
        state,
        path.into_inner(),
        body.name,
        body.price,
        body.stock,
        KindPatch::Album(body.attributes),
    )
    .await
}

/// DELETE /albums/delete/{id}
#[utoipa::path(
    delete,
    path = "/albums/delete/{id}",
    params(("id" = i64, Path, description = "Album id")),
    responses(
        (status = 204, description = "Album deleted"),
        (status = 404, description = "Album not found"),
        (status = 409, description = "Album is ordered or wishlisted"),
    ),
    tag = "albums"
)]
pub async fn delete_album(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    products::delete_kind(state, Category::Album, path.into_inner()).await
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/albums")
            .route("", web::get().to(list_albums))
            .route("/count", web::get().to(count_albums))
            .route("/artist/{artist}", web::get().to(albums_by_artist))
            .route("/genre/{genre}", web::get().to(albums_by_genre))
            .route("/year-range", web::get().to(albums_by_year_range))
            .route("/new", web::post().to(create_album))
            .route("/update/{id}", web::put().to(update_album))
            .route("/delete/{id}", web::delete().to(delete_album))
            .route("/{id}", web::get().to(get_album)),
    );
}
