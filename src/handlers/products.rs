use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::catalog::{
    AlbumDuration, AlbumFormat, Anc, Category, Genre, HeadphoneType, Mechanism, NewProduct,
    PortableType, Product, ProductKind, Rpm, Traction, VinylSize,
};
use crate::domain::errors::DomainError;
use crate::domain::product_patch::{KindPatch, ProductPatch};
use crate::domain::product_query::ProductQuery;
use crate::errors::AppError;
use crate::state::AppState;

use super::{blocking, parse_decimal, CountResponse};

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub stock: i32,
    pub category: Category,
    /// Kind-specific attributes; their shape depends on `category`.
    pub attributes: ProductKind,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            id: product.id,
            category: product.category(),
            name: product.name,
            price: product.price.to_string(),
            stock: product.stock,
            attributes: product.kind,
        }
    }
}

fn product_list(products: Vec<Product>) -> Vec<ProductResponse> {
    products.into_iter().map(ProductResponse::from).collect()
}

// ── Filters ──────────────────────────────────────────────────────────────────

/// Catalog filters. Every given parameter narrows the result.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQueryParams {
    /// Case-insensitive substring of the product name.
    pub name: Option<String>,
    /// Decimal, e.g. "10.00"
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub in_stock: Option<bool>,
    pub artist: Option<String>,
    pub genre: Option<Genre>,
    pub format: Option<AlbumFormat>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    /// `mm:ss`
    pub min_duration: Option<String>,
    pub max_duration: Option<String>,
    pub size: Option<VinylSize>,
    pub rpm: Option<Rpm>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub headphone_type: Option<HeadphoneType>,
    pub anc: Option<Anc>,
    pub wireless: Option<bool>,
    pub bluetooth: Option<bool>,
    pub min_power: Option<i32>,
    pub max_power: Option<i32>,
    pub traction: Option<Traction>,
    pub mechanism: Option<Mechanism>,
    pub portable_type: Option<PortableType>,
}

impl ProductQueryParams {
    pub fn into_query(self) -> Result<ProductQuery, DomainError> {
        Ok(ProductQuery {
            category: None,
            name: self.name,
            min_price: self
                .min_price
                .map(|p| parse_decimal("min_price", &p))
                .transpose()?,
            max_price: self
                .max_price
                .map(|p| parse_decimal("max_price", &p))
                .transpose()?,
            in_stock: self.in_stock,
            artist: self.artist,
            genre: self.genre,
            format: self.format,
            min_year: self.min_year,
            max_year: self.max_year,
            min_duration: self
                .min_duration
                .map(|d| d.parse::<AlbumDuration>())
                .transpose()?,
            max_duration: self
                .max_duration
                .map(|d| d.parse::<AlbumDuration>())
                .transpose()?,
            size: self.size,
            rpm: self.rpm,
            color: self.color,
            brand: self.brand,
            headphone_type: self.headphone_type,
            anc: self.anc,
            wireless: self.wireless,
            bluetooth: self.bluetooth,
            min_power: self.min_power,
            max_power: self.max_power,
            traction: self.traction,
            mechanism: self.mechanism,
            portable_type: self.portable_type,
        })
    }
}

// ── Shared per-kind plumbing ─────────────────────────────────────────────────

pub(crate) async fn search(
    state: web::Data<AppState>,
    query: ProductQuery,
) -> Result<HttpResponse, AppError> {
    let products = blocking(move || state.products.find_products(&query)).await?;
    Ok(HttpResponse::Ok().json(product_list(products)))
}

pub(crate) async fn list_kind(
    state: web::Data<AppState>,
    category: Category,
    params: ProductQueryParams,
) -> Result<HttpResponse, AppError> {
    let query = params.into_query()?.within(category);
    search(state, query).await
}

pub(crate) async fn count_kind(
    state: web::Data<AppState>,
    category: Category,
    params: ProductQueryParams,
) -> Result<HttpResponse, AppError> {
    let query = params.into_query()?.within(category);
    let count = blocking(move || state.products.count_products(&query)).await?;
    Ok(HttpResponse::Ok().json(CountResponse { count }))
}

pub(crate) async fn get_kind(
    state: web::Data<AppState>,
    category: Category,
    id: i64,
) -> Result<HttpResponse, AppError> {
    let product = blocking(move || state.products.get_product_of(category, id)).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

pub(crate) async fn create_kind(
    state: web::Data<AppState>,
    name: String,
    price: &str,
    stock: i32,
    kind: ProductKind,
) -> Result<HttpResponse, AppError> {
    let product = NewProduct {
        name,
        price: parse_decimal("price", price)?,
        stock,
        kind,
    };
    let created = blocking(move || state.products.create_product(product)).await?;
    Ok(HttpResponse::Created().json(ProductResponse::from(created)))
}

pub(crate) async fn update_kind(
    state: web::Data<AppState>,
    id: i64,
    name: Option<String>,
    price: Option<String>,
    stock: Option<i32>,
    kind: KindPatch,
) -> Result<HttpResponse, AppError> {
    let patch = ProductPatch {
        name,
        price: price.map(|p| parse_decimal("price", &p)).transpose()?,
        stock,
        kind,
    };
    let updated = blocking(move || state.products.update_product(id, patch)).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(updated)))
}

pub(crate) async fn delete_kind(
    state: web::Data<AppState>,
    category: Category,
    id: i64,
) -> Result<HttpResponse, AppError> {
    blocking(move || state.products.delete_product_of(category, id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /products
///
/// Lists products of every kind matching the filters.
#[utoipa::path(
    get,
    path = "/products",
    params(ProductQueryParams),
    responses(
        (status = 200, description = "Matching products", body = [ProductResponse]),
        (status = 400, description = "Malformed filter"),
    ),
    tag = "products"
)]
pub async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<ProductQueryParams>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner().into_query()?;
    search(state, query).await
}

/// GET /products/count
#[utoipa::path(
    get,
    path = "/products/count",
    params(ProductQueryParams),
    responses(
        (status = 200, description = "Number of matching products", body = CountResponse),
    ),
    tag = "products"
)]
pub async fn count_products(
    state: web::Data<AppState>,
    query: web::Query<ProductQueryParams>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner().into_query()?;
    let count = blocking(move || state.products.count_products(&query)).await?;
    Ok(HttpResponse::Ok().json(CountResponse { count }))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let product = blocking(move || state.products.get_product(id)).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// GET /products/category/{category}
#[utoipa::path(
    get,
    path = "/products/category/{category}",
    params(("category" = Category, Path, description = "e.g. VINYL")),
    responses(
        (status = 200, description = "Products of the category", body = [ProductResponse]),
        (status = 400, description = "Unknown category"),
    ),
    tag = "products"
)]
pub async fn list_by_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let category: Category = path.into_inner().to_uppercase().parse()?;
    search(state, ProductQuery::for_category(category)).await
}

/// DELETE /products/delete/{id}
///
/// Refused with 409 while any order or wishlist references the product.
#[utoipa::path(
    delete,
    path = "/products/delete/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product is ordered or wishlisted"),
    ),
    tag = "products"
)]
pub async fn delete_product(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    blocking(move || state.products.delete_product(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(list_products))
            .route("/count", web::get().to(count_products))
            .route("/category/{category}", web::get().to(list_by_category))
            .route("/delete/{id}", web::delete().to(delete_product))
            .route("/{id}", web::get().to(get_product)),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};
    use mockall::predicate::eq;
    use serde_json::Value;

    use super::*;
    use crate::handlers::test_support::{headphone, state_with, vinyl, Ports};

    #[actix_web::test]
    async fn get_product_serializes_price_as_string() {
        let mut ports = Ports::default();
        ports
            .products
            .expect_find_by_id()
            .with(eq(7))
            .returning(|id| Ok(Some(vinyl(id))));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/products/7").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["id"], 7);
        assert_eq!(body["price"], "40.00");
        assert_eq!(body["category"], "VINYL");
        assert_eq!(body["attributes"]["rpm"], "RPM_33");
        assert_eq!(body["attributes"]["album"]["duration"], "40:00");
    }

    #[actix_web::test]
    async fn unknown_product_is_404_with_error_body() {
        let mut ports = Ports::default();
        ports.products.expect_find_by_id().returning(|_| Ok(None));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/products/99").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 404);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Product with id 99 not found");
    }

    #[actix_web::test]
    async fn filters_reach_the_repository() {
        let mut ports = Ports::default();
        ports
            .products
            .expect_find()
            .withf(|q| {
                q.genre == Some(Genre::Rock)
                    && q.min_price == Some("10.5".parse().unwrap())
                    && q.in_stock == Some(true)
            })
            .returning(|_| Ok(vec![vinyl(1)]));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/products?genre=ROCK&min_price=10.5&in_stock=true")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn malformed_price_filter_is_400() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(Ports::default())))
                .configure(configure),
        )
        .await;

        for uri in ["/products?min_price=cheap", "/products?max_price=1e1000000000"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 400, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn deleting_wishlisted_product_is_409() {
        let mut ports = Ports::default();
        ports
            .products
            .expect_find_by_id()
            .returning(|id| Ok(Some(headphone(id))));
        ports.products.expect_is_ordered().returning(|_| Ok(false));
        ports.products.expect_is_wishlisted().returning(|_| Ok(true));
        ports.products.expect_delete().never();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri("/products/delete/3")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 409);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("wishlist"));
    }

    #[actix_web::test]
    async fn category_path_is_case_insensitive() {
        let mut ports = Ports::default();
        ports
            .products
            .expect_find()
            .withf(|q| q.category == Some(Category::Headphone))
            .returning(|_| Ok(vec![]));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/products/category/headphone")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
    }
}
