// File: ./src/client/middleware.rs
//! Tower middleware stamping every outgoing AI request as a JSON call from this app.
use http::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use http::{HeaderValue, Request};
use std::task::{Context, Poll};
use tower_layer::Layer;
use tower_service::Service;

#[derive(Clone, Debug)]
pub struct JsonHeadersLayer {
    pub user_agent: String,
}

impl JsonHeadersLayer {
    pub fn new(user_agent: String) -> Self {
        Self { user_agent }
    }
}

impl<S> Layer<S> for JsonHeadersLayer {
    type Service = JsonHeadersService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        JsonHeadersService {
            inner,
            user_agent: self.user_agent.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct JsonHeadersService<S> {
    inner: S,
    user_agent: String,
}

impl<S, ReqBody> Service<Request<ReqBody>> for JsonHeadersService<S>
where
    S: Service<Request<ReqBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let headers = req.headers_mut();
        if let Ok(val) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, val);
        }
        // Callers may override these; only fill the gaps.
        headers
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));
        headers
            .entry(ACCEPT)
            .or_insert(HeaderValue::from_static("application/json"));
        self.inner.call(req)
    }
}
