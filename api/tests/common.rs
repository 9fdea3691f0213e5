use std::sync::Arc;

use axum::{body::Body, Router};
use http::{header, Method, Request, StatusCode};
use once_cell::sync::Lazy;
use serde_json::Value;
use tower::ServiceExt;

use track_store_api::service::ProjectService;
use track_store_api::shared_state::InnerState;
use track_store_db::test::MemoryProjectStore;

/// The composed router backed by an in-memory store, so tests exercise the
/// whole HTTP surface without a database.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryProjectStore>,
}

pub fn test_app() -> TestApp {
    Lazy::force(&track_store_test::TRACING);

    let store = Arc::new(MemoryProjectStore::new());
    let state = Arc::new(InnerState {
        production: false,
        service: ProjectService::new(store.clone()),
    });

    TestApp {
        router: track_store_api::build_app(state),
        store,
    }
}

impl TestApp {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&value).expect("serializing request body"))
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("building request"))
            .await
            .expect("sending request");

        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body())
            .await
            .expect("reading response body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("parsing response body")
        };

        (status, value)
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, path, None).await
    }

    /// Create a project and return its response body, asserting success.
    pub async fn create_project(&self, body: Value) -> Value {
        let (status, project) = self.post("/api/projects", body).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {project}");
        project
    }
}
