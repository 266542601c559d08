use std::str::FromStr;

use actix_web::web;
use bigdecimal::BigDecimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::errors::DomainError;
use crate::errors::AppError;

pub mod albums;
pub mod headphones;
pub mod orders;
pub mod players;
pub mod portables;
pub mod products;
pub mod speakers;
pub mod turntables;
pub mod users;
pub mod vinyls;
pub mod wishlists;

#[cfg(test)]
pub(crate) mod test_support;

/// Runs a service call on actix's blocking thread pool.
pub(crate) async fn blocking<F, T>(call: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    Ok(web::block(call)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??)
}

/// Parses a decimal sent as a string, e.g. "9.99".
pub(crate) fn parse_decimal(field: &str, value: &str) -> Result<BigDecimal, DomainError> {
    BigDecimal::from_str(value.trim()).map_err(|_| {
        DomainError::validation(format!("{} '{}' is not a decimal number", field, value))
    })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CountResponse {
    pub count: i64,
}
