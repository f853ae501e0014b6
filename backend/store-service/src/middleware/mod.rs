/// HTTP middleware for store-service
///
/// `AuthenticationMiddleware` decodes an optional bearer token into a
/// [`Principal`]; the permission helpers in [`permissions`] decide what that
/// principal may do.
pub mod permissions;

pub use permissions::*;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{http::header, Error, FromRequest, HttpMessage, HttpRequest, ResponseError};
use crypto_core::jwt;
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::error::AppError;

/// Authenticated caller, stored in request extensions after auth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub username: String,
    pub is_staff: bool,
}

impl Principal {
    /// `Ok(None)` when the request carries no `Authorization` header
    fn from_request_headers(req: &ServiceRequest) -> Result<Option<Self>, AppError> {
        let Some(value) = req.headers().get(header::AUTHORIZATION) else {
            return Ok(None);
        };
        let token = value
            .to_str()
            .ok()
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Authentication("Invalid Authorization header".to_string()))?;

        Self::from_token(token).map(Some)
    }

    fn from_token(token: &str) -> Result<Self, AppError> {
        let data = jwt::validate_token(token).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            AppError::Authentication("Invalid or expired token".to_string())
        })?;
        let user_id = data
            .claims
            .user_id()
            .map_err(|_| AppError::Authentication("Invalid token subject".to_string()))?;

        Ok(Principal {
            user_id,
            username: data.claims.username,
            is_staff: data.claims.is_staff,
        })
    }
}

/// Resolves the `Authorization` header, if any, into a [`Principal`].
///
/// Requests without the header pass through anonymously. A header that is
/// present but not a valid `Bearer` token is rejected with 401.
pub struct AuthenticationMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthenticationMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticationMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthenticationMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            match Principal::from_request_headers(&req) {
                Ok(Some(principal)) => {
                    req.extensions_mut().insert(principal);
                }
                Ok(None) => {}
                Err(err) => {
                    let response = err.error_response().map_into_right_body();
                    return Ok(req.into_response(response));
                }
            }

            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

impl FromRequest for Principal {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(req.extensions().get::<Principal>().cloned().ok_or_else(|| {
            AppError::Authentication("Authentication credentials were not provided".to_string())
        }))
    }
}
