//! Authentication
//!
//! Token validation only: users register and log in against the external
//! account service, which shares the signing secret.

pub mod extractor;
pub mod jwt;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};

use crate::utils::AppError;

/// The authenticated caller, extracted from a validated token
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::InvalidToken)?;
        Ok(Self {
            id,
            username: claims.username,
        })
    }
}
