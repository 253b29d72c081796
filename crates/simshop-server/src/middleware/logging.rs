//! Logging middleware
//!
//! One structured line per request, tagged with a request id that is also
//! returned in the `x-request-id` response header.

use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{info, warn};
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Id assigned to each request, available from the request extensions.
#[derive(Debug, Clone, Copy)]
pub struct RequestId(pub Uuid);

/// Per-request access log.
pub struct LoggingMiddleware;

impl<S, B> Transform<S, ServiceRequest> for LoggingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = LoggingMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggingMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct LoggingMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for LoggingMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let line = RequestLine {
            id: Uuid::new_v4(),
            method: req.method().to_string(),
            path: req.path().to_string(),
            start: Instant::now(),
        };
        req.extensions_mut().insert(RequestId(line.id));

        Box::pin(async move {
            let mut result = service.call(req).await;
            match &mut result {
                Ok(res) => {
                    if let Ok(value) = HeaderValue::from_str(&line.id.to_string()) {
                        res.headers_mut()
                            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                    }
                    line.completed(res.status().as_u16());
                }
                Err(e) => line.failed(e),
            }
            result
        })
    }
}

/// What gets logged about one request.
struct RequestLine {
    id: Uuid,
    method: String,
    path: String,
    start: Instant,
}

impl RequestLine {
    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn completed(&self, status: u16) {
        let duration_ms = self.elapsed_ms();
        if status >= 400 {
            warn!(
                request_id = %self.id,
                method = %self.method,
                path = %self.path,
                status,
                duration_ms,
                "request rejected"
            );
        } else {
            info!(
                request_id = %self.id,
                method = %self.method,
                path = %self.path,
                status,
                duration_ms,
                "request served"
            );
        }
    }

    fn failed(&self, error: &Error) {
        warn!(
            request_id = %self.id,
            method = %self.method,
            path = %self.path,
            error = %error,
            duration_ms = self.elapsed_ms(),
            "request failed"
        );
    }
}
