use axum::{
    body::{Body, BoxBody},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::future::BoxFuture;
use serde_json::json;
use tower::{Layer, Service};

/// Replaces the bodies of internal error responses with a generic message in
/// production, so storage details never leak to clients.
#[derive(Clone)]
pub struct ObfuscateErrorLayer {
    enabled: bool,
}

impl ObfuscateErrorLayer {
    pub fn new(enabled: bool) -> ObfuscateErrorLayer {
        ObfuscateErrorLayer { enabled }
    }
}

impl<S: Service<Request<Body>>> Layer<S> for ObfuscateErrorLayer {
    type Service = ObfuscateError<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ObfuscateError {
            inner,
            enabled: self.enabled,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObfuscateError<S> {
    inner: S,
    enabled: bool,
}

impl<S> Service<Request<Body>> for ObfuscateError<S>
where
    S: Service<Request<Body>> + Send + 'static,
    S::Future: Send + 'static,
    S::Response: IntoResponse + Send + 'static,
{
    type Response = Response<BoxBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let enabled = self.enabled;
        let fut = self.inner.call(req);
        Box::pin(async move {
            let res = fut.await?.into_response();
            if !enabled || res.status() != StatusCode::INTERNAL_SERVER_ERROR {
                return Ok(res);
            }

            let body = json!({
                "error": {
                    "kind": "internal_server_error",
                    "message": "Internal error",
                }
            });

            Ok((res.status(), Json(body)).into_response())
        })
    }
}
