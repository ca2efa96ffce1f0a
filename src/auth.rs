//! Bearer-token verification and capability checks.
//!
//! Token issuance lives with the external identity provider; this service
//! only verifies signatures and reads the role claim. Authorization is an
//! explicit allow/deny decision made synchronously inside the mutating
//! service call, never inferred from post-hoc re-reads.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ApiError, ServiceError};

/// Role carried in the token's claims.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

/// Discrete actions a caller may be permitted to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    ManageCatalog,
    ManagePurchaseOrders,
    RecordAdjustments,
    ReceiveInventory,
    ViewReports,
}

impl Role {
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::ManageCatalog | Capability::ManagePurchaseOrders => {
                matches!(self, Role::Admin)
            }
            Capability::RecordAdjustments
            | Capability::ReceiveInventory
            | Capability::ViewReports => true,
        }
    }
}

/// JWT claims accepted from the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// The verified caller identity, passed into services at every mutation
/// point.
#[derive(Clone, Copy, Debug)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthContext {
    /// Synchronous capability check; denial is a deterministic error from
    /// the same call path that performs the mutation.
    pub fn require(&self, capability: Capability) -> Result<(), ServiceError> {
        if self.role.allows(capability) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(format!(
                "role {:?} may not perform {:?}",
                self.role, capability
            )))
        }
    }
}

/// Verify a bearer token and extract the caller context.
pub fn verify_token(token: &str, secret: &str) -> Result<AuthContext, ServiceError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| ServiceError::Unauthorized(format!("invalid token: {}", e)))?;

    Ok(AuthContext {
        user_id: data.claims.sub,
        role: data.claims.role,
    })
}

/// Axum extractor producing the verified caller from the Authorization
/// header.
#[derive(Clone, Copy, Debug)]
pub struct AuthenticatedUser(pub AuthContext);

#[async_trait]
impl FromRequestParts<crate::AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &crate::AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".to_string()))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("expected Bearer token".to_string()))?;

        let ctx = verify_token(token, &state.config.jwt_secret)?;
        Ok(AuthenticatedUser(ctx))
    }
}
