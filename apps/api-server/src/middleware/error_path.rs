//! Error path middleware - stamps the request path into error bodies.

use actix_web::{
    Error, HttpResponse, ResponseError,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;

use super::error::AppError;

/// Re-renders `AppError` responses with `path` filled in. Other responses
/// pass through untouched.
pub struct ErrorPath;

impl<S, B> Transform<S, ServiceRequest> for ErrorPath
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = ErrorPathService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorPathService { service }))
    }
}

pub struct ErrorPathService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for ErrorPathService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let path = req.path().to_string();
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;

            let rendered = res
                .response()
                .error()
                .and_then(|err| err.as_error::<AppError>())
                .map(|err| (err.status_code(), err.body()));

            Ok(match rendered {
                Some((status, body)) => {
                    let response = HttpResponse::build(status).json(body.with_path(path));
                    res.into_response(response).map_into_right_body()
                }
                None => res.map_into_left_body(),
            })
        })
    }
}
