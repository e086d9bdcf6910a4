use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use log::{info, warn};
use std::rc::Rc;
use std::time::Instant;

use crate::models::User;

/// Per-request access log.
///
/// Wraps the whole app, so after the inner call it can see the `User` the
/// auth gate left in the request extensions and name who made the call.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(RequestLoggerService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestLoggerService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();

        let service = self.service.clone();

        Box::pin(async move {
            let res = match service.call(req).await {
                Ok(res) => res,
                Err(e) => {
                    // rejected by a route middleware before reaching a handler
                    info!(
                        "{} {} -> {} ({}ms) user=-",
                        method,
                        path,
                        e.as_response_error().status_code().as_u16(),
                        start_time.elapsed().as_millis()
                    );
                    return Err(e);
                }
            };

            let elapsed = start_time.elapsed();
            let status = res.status();
            let username = res
                .request()
                .extensions()
                .get::<User>()
                .map(|user| user.username.clone())
                .unwrap_or_else(|| "-".to_string());

            if status.is_server_error() {
                warn!(
                    "{} {} -> {} ({}ms) user={}",
                    method,
                    path,
                    status.as_u16(),
                    elapsed.as_millis(),
                    username
                );
            } else {
                info!(
                    "{} {} -> {} ({}ms) user={}",
                    method,
                    path,
                    status.as_u16(),
                    elapsed.as_millis(),
                    username
                );
            }

            Ok(res)
        })
    }
}
