//! HTTP handlers, one module per service.

pub mod catalog;
pub mod delivery;
pub mod health;
pub mod metrics;
pub mod order;
pub mod payment;
pub mod warehouse;

use std::fmt::Display;
use std::str::FromStr;

use crate::error::ApiError;

/// Parses an id taken from the request path.
fn parse_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}
