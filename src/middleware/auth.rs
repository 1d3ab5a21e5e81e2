// src/middleware/auth.rs
use std::{future::{ready, Ready}};
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform}, error::{ErrorForbidden, ErrorUnauthorized}, http::header, web, Error, HttpMessage
};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, DecodingKey, Validation, Algorithm};
use serde::{Deserialize, Serialize};
use secrecy::ExposeSecret;

use uuid::Uuid;

use crate::config::jwt::JwtSettings;
use crate::models::user::{UserRole, UserStatus};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,  // Subject (user id)
    pub username: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub organization_id: Uuid,  // Tenant the user belongs to
    pub exp: usize,   // Expiration time (as UTC timestamp)
}

impl Claims {
    /// Parse the user ID from the claims subject field.
    /// Returns None if the UUID is invalid.
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// JWT validation shared by every guarded scope.
/// Extracts and validates a JWT token from the request, returning the decoded claims.
pub fn validate_jwt_from_request(req: &ServiceRequest) -> Result<Claims, Error> {
    // Get JWT settings from app state
    let jwt_settings = req.app_data::<web::Data<JwtSettings>>()
        .ok_or_else(|| ErrorUnauthorized("JWT settings not found"))?;

    // Extract Authorization header
    let auth_header = req.headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ErrorUnauthorized("No authorization header"))?
        .to_str()
        .map_err(|_| ErrorUnauthorized("Invalid authorization header"))?;

    // Check Bearer token format
    if !auth_header.starts_with("Bearer ") {
        return Err(ErrorUnauthorized("Invalid authorization header format"));
    }

    let token = auth_header["Bearer ".len()..].trim();
    if token.is_empty() {
        return Err(ErrorUnauthorized("Empty token"));
    }
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_settings.secret.expose_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    ).map_err(|e| {
        tracing::error!("Failed to decode token: {:?}", e);
        ErrorUnauthorized("Invalid token")
    })?;

    Ok(token_data.claims)
}

/// What a scope guarded by [`AuthMiddleware`] requires of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Member,
    Admin,
}

/// Validates the bearer token, the account status and the caller's
/// organization, then enforces the scope's [`Access`] level.
#[derive(Debug, Clone, Copy)]
pub struct AuthMiddleware {
    access: Access,
}

impl AuthMiddleware {
    pub fn member() -> Self {
        Self { access: Access::Member }
    }

    pub fn admin() -> Self {
        Self { access: Access::Admin }
    }
}

// Middleware factory
impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service, access: self.access }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    access: Access,
}

/// Check decoded claims against the required access level.
pub fn authorize(claims: &Claims, access: Access) -> Result<(), Error> {
    if claims.status != UserStatus::Active {
        tracing::warn!("Inactive user attempted access: {}", claims.username);
        return Err(ErrorUnauthorized("Account is not active"));
    }
    if claims.organization_id.is_nil() {
        tracing::warn!("User {} has no organization", claims.username);
        return Err(ErrorForbidden("No organization"));
    }
    if access == Access::Admin && !claims.is_admin() {
        tracing::warn!("Non-admin user attempted admin access: {} (role: {})", claims.username, claims.role);
        return Err(ErrorForbidden("Insufficient privileges"));
    }
    Ok(())
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let claims = match validate_jwt_from_request(&req) {
            Ok(claims) => claims,
            Err(e) => return Box::pin(async move { Err(e) }),
        };

        if let Err(e) = authorize(&claims, self.access) {
            return Box::pin(async move { Err(e) });
        }

        // Handlers read the claims through web::ReqData<Claims>
        req.extensions_mut().insert(claims);

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            Ok(res)
        })
    }
}
