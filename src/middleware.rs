use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use std::time::{Duration, Instant};

use http::{Method, Request, Response};
use log::{log, warn, Level};
use pin_project::pin_project;
use tower::{Layer, Service};

const ACCESS_LOG_TARGET: &str = "flags_server::access";

/// Logs one line per request: method, path, status and latency.
#[derive(Debug, Clone)]
pub struct AccessLogLayer {
    level: Level,
}

impl AccessLogLayer {
    pub fn new() -> Self {
        Self { level: Level::Info }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

impl Default for AccessLogLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for AccessLogLayer {
    type Service = AccessLog<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AccessLog {
            inner,
            level: self.level,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccessLog<S> {
    inner: S,
    level: Level,
}

#[pin_project]
pub struct AccessLogFuture<F> {
    #[pin]
    inner: F,
    method: Method,
    path: String,
    started: Instant,
    level: Level,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for AccessLog<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = AccessLogFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        AccessLogFuture {
            inner: self.inner.call(req),
            method,
            path,
            started: Instant::now(),
            level: self.level,
        }
    }
}

impl<F, ResBody, E> Future for AccessLogFuture<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
{
    type Output = Result<Response<ResBody>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let result = ready!(this.inner.poll(cx));
        let elapsed = this.started.elapsed();

        match &result {
            Ok(response) => log!(
                target: ACCESS_LOG_TARGET,
                *this.level,
                "{} {} -> {} ({})",
                this.method,
                this.path,
                response.status().as_u16(),
                format_latency(elapsed)
            ),
            Err(_) => warn!(
                target: ACCESS_LOG_TARGET,
                "{} {} -> service error ({})",
                this.method,
                this.path,
                format_latency(elapsed)
            ),
        }

        Poll::Ready(result)
    }
}

fn format_latency(elapsed: Duration) -> String {
    format!("{:.3}ms", elapsed.as_secs_f64() * 1000.0)
}
