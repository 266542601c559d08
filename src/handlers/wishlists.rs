use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::catalog::Category;
use crate::domain::wishlist::{Wishlist, WishlistItem};
use crate::errors::AppError;
use crate::state::AppState;

use super::blocking;

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistItemResponse {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub category: Category,
    pub price: String,
}

impl From<WishlistItem> for WishlistItemResponse {
    fn from(item: WishlistItem) -> Self {
        WishlistItemResponse {
            id: item.id,
            product_id: item.product_id,
            product_name: item.product_name,
            category: item.category,
            price: item.price.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistResponse {
    /// Absent until the user wishlists their first product.
    pub id: Option<i64>,
    pub user_id: i64,
    pub items: Vec<WishlistItemResponse>,
}

impl From<Wishlist> for WishlistResponse {
    fn from(wishlist: Wishlist) -> Self {
        WishlistResponse {
            id: wishlist.id,
            user_id: wishlist.user_id,
            items: wishlist
                .items
                .into_iter()
                .map(WishlistItemResponse::from)
                .collect(),
        }
    }
}

/// GET /wishlists
#[utoipa::path(
    get,
    path = "/wishlists",
    responses((status = 200, description = "All wishlists", body = [WishlistResponse])),
    tag = "wishlists"
)]
pub async fn list_wishlists(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let wishlists = blocking(move || state.wishlists.list_wishlists()).await?;
    let body: Vec<WishlistResponse> = wishlists.into_iter().map(WishlistResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /wishlists/{userId}
#[utoipa::path(
    get,
    path = "/wishlists/{userId}",
    params(("userId" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "The user's wishlist, possibly empty", body = WishlistResponse),
        (status = 404, description = "User not found"),
    ),
    tag = "wishlists"
)]
pub async fn get_wishlist(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let wishlist = blocking(move || state.wishlists.get_wishlist(user_id)).await?;
    Ok(HttpResponse::Ok().json(WishlistResponse::from(wishlist)))
}

/// POST /wishlists/{userId}/product/{productId}
#[utoipa::path(
    post,
    path = "/wishlists/{userId}/product/{productId}",
    params(
        ("userId" = i64, Path, description = "User id"),
        ("productId" = i64, Path, description = "Product id"),
    ),
    responses(
        (status = 201, description = "Product added", body = WishlistResponse),
        (status = 404, description = "User or product not found"),
        (status = 409, description = "Product already in the wishlist"),
    ),
    tag = "wishlists"
)]
pub async fn add_product(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
    let (user_id, product_id) = path.into_inner();
    let wishlist = blocking(move || state.wishlists.add_product(user_id, product_id)).await?;
    Ok(HttpResponse::Created().json(WishlistResponse::from(wishlist)))
}

/// DELETE /wishlists/{userId}/product/{productId}
#[utoipa::path(
    delete,
    path = "/wishlists/{userId}/product/{productId}",
    params(
        ("userId" = i64, Path, description = "User id"),
        ("productId" = i64, Path, description = "Product id"),
    ),
    responses(
        (status = 204, description = "Product removed"),
        (status = 404, description = "User not found or product not in the wishlist"),
    ),
    tag = "wishlists"
)]
pub async fn remove_product(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
    let (user_id, product_id) = path.into_inner();
    blocking(move || state.wishlists.remove_product(user_id, product_id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /wishlists/{userId}
#[utoipa::path(
    delete,
    path = "/wishlists/{userId}",
    params(("userId" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "Wishlist cleared"),
        (status = 404, description = "User not found"),
    ),
    tag = "wishlists"
)]
pub async fn clear_wishlist(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    blocking(move || state.wishlists.clear_wishlist(user_id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/wishlists")
            .route("", web::get().to(list_wishlists))
            .route(
                "/{user_id}/product/{product_id}",
                web::post().to(add_product),
            )
            .route(
                "/{user_id}/product/{product_id}",
                web::delete().to(remove_product),
            )
            .route("/{user_id}", web::get().to(get_wishlist))
            .route("/{user_id}", web::delete().to(clear_wishlist)),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};
    use mockall::predicate::eq;
    use serde_json::Value;

    use super::*;
    use crate::handlers::test_support::{headphone, juan, state_with, Ports};

    fn listed(user_id: i64, product_id: i64) -> Wishlist {
        Wishlist {
            id: Some(1),
            user_id,
            items: vec![WishlistItem {
                id: 1,
                product_id,
                product_name: "HD 25".to_string(),
                category: Category::Headphone,
                price: "120.00".parse().unwrap(),
            }],
        }
    }

    #[actix_web::test]
    async fn add_product_is_201() {
        let mut ports = Ports::default();
        ports.users.expect_find_by_id().returning(|_| Ok(Some(juan())));
        ports
            .products
            .expect_find_by_id()
            .returning(|id| Ok(Some(headphone(id))));
        ports.wishlists.expect_find_by_user().returning(|_| Ok(None));
        ports
            .wishlists
            .expect_add_product()
            .with(eq(1), eq(3))
            .returning(|user_id, product_id| Ok(listed(user_id, product_id)));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/wishlists/1/product/3")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 201);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["items"][0]["category"], "HEADPHONE");
        assert_eq!(body["items"][0]["price"], "120.00");
    }

    #[actix_web::test]
    async fn adding_twice_is_409() {
        let mut ports = Ports::default();
        ports.users.expect_find_by_id().returning(|_| Ok(Some(juan())));
        ports
            .products
            .expect_find_by_id()
            .returning(|id| Ok(Some(headphone(id))));
        ports
            .wishlists
            .expect_find_by_user()
            .returning(|user_id| Ok(Some(listed(user_id, 3))));
        ports.wishlists.expect_add_product().never();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/wishlists/1/product/3")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 409);
    }

    #[actix_web::test]
    async fn user_without_wishlist_gets_an_empty_one() {
        let mut ports = Ports::default();
        ports.users.expect_find_by_id().returning(|_| Ok(Some(juan())));
        ports.wishlists.expect_find_by_user().returning(|_| Ok(None));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/wishlists/1").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["user_id"], 1);
        assert!(body["id"].is_null());
        assert_eq!(body["items"].as_array().map(Vec::len), Some(0));
    }

    #[actix_web::test]
    async fn removing_a_missing_product_is_404() {
        let mut ports = Ports::default();
        ports.users.expect_find_by_id().returning(|_| Ok(Some(juan())));
        ports
            .wishlists
            .expect_remove_product()
            .returning(|_, _| Ok(false));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri("/wishlists/1/product/3")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 404);
    }
}
