pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;
pub mod state;

use actix_web::{error, middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::Config;
pub use db::{create_pool, DbPool};
pub use state::AppState;

use errors::AppError;
use handlers::{
    albums, headphones, orders, players, portables, products, speakers, turntables, users,
    vinyls, wishlists,
};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), BoxError> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    if !applied.is_empty() {
        log::info!("Applied {} migration(s)", applied.len());
    }
    Ok(())
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Record Store API", description = "Catalog, users, orders and wishlists"),
    paths(
        products::list_products,
        products::count_products,
        products::get_product,
        products::list_by_category,
        products::delete_product,
        albums::list_albums,
        albums::count_albums,
        albums::get_album,
        albums::albums_by_artist,
        albums::albums_by_genre,
        albums::albums_by_year_range,
        albums::create_album,
        albums::update_album,
        albums::delete_album,
        vinyls::list_vinyls,
        vinyls::count_vinyls,
        vinyls::get_vinyl,
        vinyls::create_vinyl,
        vinyls::update_vinyl,
        vinyls::delete_vinyl,
        headphones::list_headphones,
        headphones::count_headphones,
        headphones::get_headphone,
        headphones::create_headphone,
        headphones::update_headphone,
        headphones::delete_headphone,
        speakers::list_speakers,
        speakers::count_speakers,
        speakers::get_speaker,
        speakers::create_speaker,
        speakers::update_speaker,
        speakers::delete_speaker,
        players::list_players,
        players::count_players,
        players::get_player,
        players::create_player,
        players::update_player,
        players::delete_player,
        turntables::list_turntables,
        turntables::count_turntables,
        turntables::get_turntable,
        turntables::create_turntable,
        turntables::update_turntable,
        turntables::delete_turntable,
        portables::list_portables,
        portables::count_portables,
        portables::get_portable,
        portables::create_portable,
        portables::update_portable,
        portables::delete_portable,
        users::list_users,
        users::get_user,
        users::get_user_by_email,
        users::create_user,
        users::verify_password,
        users::update_user,
        users::delete_user,
        orders::list_orders,
        orders::get_order,
        orders::get_orders_by_user,
        orders::get_latest_order,
        orders::create_order,
        orders::save_order,
        orders::add_products,
        orders::recalculate,
        orders::update_status,
        orders::delete_order,
        wishlists::list_wishlists,
        wishlists::get_wishlist,
        wishlists::add_product,
        wishlists::remove_product,
        wishlists::clear_wishlist,
    ),
    components(schemas(
        handlers::CountResponse,
        products::ProductResponse,
        albums::CreateAlbumRequest,
        albums::UpdateAlbumRequest,
        vinyls::CreateVinylRequest,
        vinyls::UpdateVinylRequest,
        headphones::CreateHeadphoneRequest,
        headphones::UpdateHeadphoneRequest,
        speakers::CreateSpeakerRequest,
        speakers::UpdateSpeakerRequest,
        players::CreatePlayerRequest,
        players::UpdatePlayerRequest,
        turntables::CreateTurntableRequest,
        turntables::UpdateTurntableRequest,
        portables::CreatePortableRequest,
        portables::UpdatePortableRequest,
        users::UserResponse,
        users::CreateUserRequest,
        users::UpdateUserRequest,
        users::VerifyPasswordRequest,
        orders::OrderResponse,
        orders::CreateOrderRequest,
        orders::SaveOrderRequest,
        orders::AddProductsRequest,
        orders::StatusRequest,
        wishlists::WishlistResponse,
    )),
    tags(
        (name = "products", description = "Catalog-wide queries"),
        (name = "albums"),
        (name = "vinyls"),
        (name = "headphones"),
        (name = "speakers"),
        (name = "players"),
        (name = "turntables"),
        (name = "portables"),
        (name = "users"),
        (name = "orders"),
        (name = "wishlists"),
    )
)]
pub struct ApiDoc;

/// Registers every resource plus extractor error handlers that answer
/// malformed JSON, query strings and paths with a 400 error body.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::BadRequest(err.to_string()))
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::BadRequest(err.to_string()))
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::BadRequest(err.to_string()))
    }))
    .configure(products::configure)
    .configure(albums::configure)
    .configure(vinyls::configure)
    .configure(headphones::configure)
    .configure(speakers::configure)
    .configure(players::configure)
    .configure(turntables::configure)
    .configure(portables::configure)
    .configure(users::configure)
    .configure(orders::configure)
    .configure(wishlists::configure);
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let openapi = ApiDoc::openapi();
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            .configure(configure)
    })
    .bind((host.to_string(), port))?
    .run())
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};
    use serde_json::Value;

    use super::*;
    use crate::handlers::test_support::{state_with, Ports};

    #[::core::prelude::v1::test]
    fn openapi_lists_every_resource() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/products/category/{category}",
            "/albums/year-range",
            "/turntables/update/{id}",
            "/users/verify",
            "/orders/{orderId}/recalculate",
            "/wishlists/{userId}/product/{productId}",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
    }

    #[actix_web::test]
    async fn malformed_json_is_400_with_error_body() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(Ports::default())))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/orders/new")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"user_id\": ")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn non_numeric_id_is_400() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(Ports::default())))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/users/abc").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
    }
}
