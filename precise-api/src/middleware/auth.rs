use crate::error::AppError;
use crate::utils::auth::verify_jwt;
use crate::AppState;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::Error as ActixError,
    http::header,
    web, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

/// Cookie the single sign-on service stores the access token in.
pub const ACCESS_TOKEN_COOKIE: &str = "seleneAccess";

/// The account behind a validated access token.
#[derive(Debug, Clone)]
pub struct AuthAccount {
    pub account_id: String,
}

// Extractor for AuthAccount from request extensions
impl actix_web::FromRequest for AuthAccount {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthAccount>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()));

        ready(result)
    }
}

// Auth middleware factory
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::Internal("App state not found".to_string()))?;

            // Authorization header first, then the SSO cookie
            let token = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(|token| token.to_string())
                .or_else(|| {
                    req.cookie(ACCESS_TOKEN_COOKIE)
                        .map(|c| c.value().to_string())
                })
                .ok_or_else(|| AppError::Unauthorized("Missing access token".to_string()))?;

            let claims = verify_jwt(&token, &state.config.jwt_access_secret).map_err(|e| {
                tracing::debug!("Access token verification failed: {:?}", e);
                AppError::Unauthorized("Invalid or expired access token".to_string())
            })?;

            req.extensions_mut().insert(AuthAccount {
                account_id: claims.account_id,
            });

            let res = service.call(req).await?;
            Ok(res)
        })
    }
}
