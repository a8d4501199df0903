//! Per-request logging middleware.
//!
//! Emits one debug event when a request arrives and one event when it
//! completes, at a level chosen from the response status.

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Request logger middleware factory.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

/// Request logger middleware service.
pub struct RequestLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
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
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let client = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();
        let reporter = req
            .headers()
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        debug!(
            target: "reporter::http",
            method = %method,
            path = %path,
            client = %client,
            user_agent = %reporter,
            "Request received"
        );

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let status = res.status();
            let status_code = status.as_u16();
            let duration_ms = start.elapsed().as_millis() as u64;

            if status.is_server_error() {
                error!(
                    target: "reporter::http",
                    method = %method,
                    path = %path,
                    status = status_code,
                    duration_ms = duration_ms,
                    "Request failed"
                );
            } else if status.is_client_error() {
                warn!(
                    target: "reporter::http",
                    method = %method,
                    path = %path,
                    status = status_code,
                    duration_ms = duration_ms,
                    "Request rejected"
                );
            } else {
                info!(
                    target: "reporter::http",
                    method = %method,
                    path = %path,
                    status = status_code,
                    duration_ms = duration_ms,
                    "Request completed"
                );
            }

            Ok(res)
        })
    }
}
