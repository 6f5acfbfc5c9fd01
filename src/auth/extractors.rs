use crate::auth::principal::Principal;
use actix_web::dev::Payload;
use actix_web::{error::ErrorUnauthorized, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};

/// Extracts the administrator the auth middleware attached to the request.
pub struct AdminPrincipal(pub Principal);

impl AdminPrincipal {
    pub fn uid(&self) -> &str {
        &self.0.uid
    }
}

impl FromRequest for AdminPrincipal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<Principal>() {
            Some(p) => ready(Ok(AdminPrincipal(p.clone()))),
            None => ready(Err(ErrorUnauthorized("missing principal"))),
        }
    }
}
