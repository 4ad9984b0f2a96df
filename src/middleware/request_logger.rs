//! Access log for the dashboard API.
//!
//! One line per request once the response is ready, at a level that follows
//! the status class. Session tokens are never logged, only where one came from.

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::AUTHORIZATION;
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::SESSION_COOKIE;

/// Where the request's session credential was presented, if anywhere.
pub fn session_source(req: &ServiceRequest) -> &'static str {
    if req.cookie(SESSION_COOKIE).is_some() {
        "cookie"
    } else if req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer "))
    {
        "bearer"
    } else {
        "anonymous"
    }
}

/// Access log middleware factory.
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
        let started = Instant::now();
        let method = req.method().clone();
        let route = req.path().to_string();
        let session = session_source(&req);
        let client = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("-")
            .to_string();

        debug!(target: "ehs::access", %method, %route, session, %client, "request received");

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let status = res.status();
            let latency_ms = started.elapsed().as_millis() as u64;

            if status.is_server_error() {
                error!(target: "ehs::access", %method, %route, status = status.as_u16(), latency_ms, session, %client, "request failed");
            } else if status.is_client_error() {
                warn!(target: "ehs::access", %method, %route, status = status.as_u16(), latency_ms, session, %client, "request rejected");
            } else {
                info!(target: "ehs::access", %method, %route, status = status.as_u16(), latency_ms, session, "request served");
            }

            Ok(res)
        })
    }
}
