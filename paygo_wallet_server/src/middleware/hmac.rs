//! HMAC middleware for Actix Web.
//!
//! Paystack signs every webhook delivery with HMAC-SHA-512 over the raw request body, using the account's
//! secret key, and sends the hex digest in the `X-Paystack-Signature` header. This middleware recomputes the
//! signature over the exact received bytes and rejects mismatches with `401 Unauthorized` before any handler
//! state is touched. The consumed body is re-injected so the handler still sees the payload.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_http::h1;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorBadRequest, ErrorUnauthorized},
    web,
    Error,
};
use futures::future::LocalBoxFuture;
use log::{trace, warn};
use pwg_common::Secret;

use crate::helpers::calculate_signature;

pub struct HmacMiddlewareFactory {
    signature_header: String,
    key: Secret<String>,
    // If false, the middleware will not check the HMAC signature and always allow the call.
    enabled: bool,
}

impl HmacMiddlewareFactory {
    pub fn new(signature_header: &str, key: Secret<String>, enabled: bool) -> Self {
        HmacMiddlewareFactory { signature_header: signature_header.into(), key, enabled }
    }
}

impl<S, B> Transform<S, ServiceRequest> for HmacMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = HmacMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(HmacMiddlewareService {
            signature_header: self.signature_header.clone(),
            key: self.key.clone(),
            enabled: self.enabled,
            service: Rc::new(service),
        }))
    }
}

pub struct HmacMiddlewareService<S> {
    signature_header: String,
    key: Secret<String>,
    enabled: bool,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for HmacMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let secret = self.key.reveal().clone();
        let signature_header = self.signature_header.clone();
        let enabled = self.enabled;
        Box::pin(async move {
            trace!("🔐️ Checking webhook signature for request");
            if !enabled {
                trace!("🔐️ Signature checks are disabled. Allowing request.");
                return service.call(req).await;
            }
            let body = req.extract::<web::Bytes>().await.map_err(|e| {
                warn!("🔐️ Failed to extract request body: {e:?}");
                ErrorBadRequest("Failed to extract request body.")
            })?;
            let expected = calculate_signature(&secret, body.as_ref());
            let provided = req.headers().get(&signature_header).ok_or_else(|| {
                warn!("🔐️ No webhook signature found in request. Denying access.");
                ErrorUnauthorized("No webhook signature found.")
            })?;
            if provided == expected.as_str() {
                trace!("🔐️ Webhook signature check ✅️");
                req.set_payload(bytes_to_payload(body));
                service.call(req).await
            } else {
                warn!("🔐️ Invalid webhook signature. Denying access.");
                Err(ErrorUnauthorized("Invalid webhook signature."))
            }
        })
    }
}

fn bytes_to_payload(buf: web::Bytes) -> Payload {
    let (_, mut pl) = h1::Payload::create(true);
    pl.unread_data(buf);
    Payload::from(pl)
}
