use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::{ErrorForbidden, ErrorUnauthorized};
use actix_web::{http::header, Error, HttpMessage};
use futures::future::LocalBoxFuture;

use crate::api::OPENAPI_PATH;
use crate::auth::config::FirebaseAuthConfig;
use crate::auth::firebase::{authorize_admin, verify_firebase_token, FirebaseAuthError};
use crate::auth::jwks::JwksCache;
use crate::auth::Principal;
use crate::utils::errors::{ErrorContext, ErrorLog, HandleOptions, Severity};

const PUBLIC_PATHS: &[&str] = &["/", "/health", OPENAPI_PATH];

#[derive(Clone)]
pub struct AuthLayer {
    cfg: FirebaseAuthConfig,
    jwks: JwksCache,
    errors: ErrorLog,
}

impl AuthLayer {
    /// Rejected tokens are recorded in `errors` next to service failures.
    pub fn new(cfg: FirebaseAuthConfig, jwks: JwksCache, errors: ErrorLog) -> Self {
        Self { cfg, jwks, errors }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddleware {
            service: Rc::new(service),
            inner: self.clone(),
        }))
    }
}

pub struct AuthMiddleware<S> {
    service: Rc<S>,
    inner: AuthLayer,
}

impl<S, B> Service<ServiceRequest> for AuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if PUBLIC_PATHS.contains(&req.path()) {
            let fut = self.service.call(req);
            #[allow(clippy::redundant_async_block)]
            return Box::pin(async move { fut.await });
        }

        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let Some(token) = token else {
            return Box::pin(async { Err(ErrorUnauthorized("missing or invalid auth header")) });
        };

        let inner = self.inner.clone();
        let srv = self.service.clone();
        Box::pin(async move {
            if inner.cfg.dev_bypass_token.as_deref() == Some(token.as_str()) {
                req.extensions_mut().insert(Principal::dev());
                return srv.call(req).await;
            }

            let outcome = match verify_firebase_token(&token, &inner.cfg, &inner.jwks).await {
                Ok(user) => authorize_admin(user, &inner.cfg),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(principal) => {
                    debug!("authenticated admin '{}' for {}", principal.uid, req.path());
                    req.extensions_mut().insert(principal);
                    srv.call(req).await
                }
                Err(e) => {
                    let ctx = ErrorContext::new("auth", "authenticate").with("path", req.path());
                    inner
                        .errors
                        .handle(&e, &ctx, HandleOptions::default().severity(Severity::Warning));
                    match e {
                        FirebaseAuthError::Forbidden(_) => {
                            Err(ErrorForbidden("admin access required"))
                        }
                        _ => Err(ErrorUnauthorized("unauthorized")),
                    }
                }
            }
        })
    }
}
