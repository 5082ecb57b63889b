//! Adapting error-returning functions into request handlers.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use tower_service::Service;

use crate::formatter::{Formatter, TextFormatter};
use crate::http_error::HttpError;

/// Wraps an async function `Fn(Request) -> Result<Response, E>` so that a
/// returned error is rendered by a [`Formatter`] instead of by the function
/// itself.
///
/// On `Ok` the user's response passes through untouched and the formatter is
/// never invoked. On `Err` the error is normalized with
/// [`HttpError::from_err`], the formatter produces status and body, and any
/// header attached to the error that the formatter did not itself set is
/// added to the response (the formatter wins on collision).
///
/// Cancellation needs no special plumbing: dropping the request future
/// cancels the handler, and a function that observes a deadline simply
/// returns an ordinary error such as [`HttpError::from_status`] with 408.
///
/// ```rust
/// use bytes::Bytes;
/// use http::{Request, Response};
/// use http_body_util::Full;
/// use httperr::{formatter::JsonFormatter, ErrorHandler, HttpError};
///
/// async fn lookup(_req: Request<Bytes>) -> Result<Response<Full<Bytes>>, HttpError> {
///     Err(HttpError::not_found("no such user"))
/// }
///
/// let handler = ErrorHandler::with_formatter(lookup, JsonFormatter::new());
/// ```
#[derive(Clone)]
pub struct ErrorHandler<F, Fmt = TextFormatter> {
    func: F,
    formatter: Fmt,
}

impl<F> ErrorHandler<F, TextFormatter> {
    /// Wraps `func` with the plain-text formatter.
    pub fn new(func: F) -> Self {
        Self {
            func,
            formatter: TextFormatter,
        }
    }
}

impl<F, Fmt> ErrorHandler<F, Fmt> {
    /// Wraps `func` with a custom formatter.
    pub fn with_formatter(func: F, formatter: Fmt) -> Self {
        Self { func, formatter }
    }
}

impl<F, Fmt> ErrorHandler<F, Fmt>
where
    Fmt: Formatter,
{
    /// Invokes the wrapped function, rendering any returned error.
    pub async fn handle<B, Fut, E>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        F: Fn(Request<B>) -> Fut,
        Fut: Future<Output = Result<Response<Full<Bytes>>, E>>,
        E: Into<anyhow::Error>,
    {
        let (parts, body) = req.into_parts();
        let head = parts.clone();
        match (self.func)(Request::from_parts(parts, body)).await {
            Ok(resp) => resp,
            Err(err) => {
                let http_err = HttpError::from_err(err);
                let mut resp = self.formatter.format(&head, &http_err);
                for (name, value) in http_err.headers() {
                    if !resp.headers().contains_key(name) {
                        resp.headers_mut().insert(name, value.clone());
                    }
                }
                resp
            }
        }
    }
}

impl<F, Fut, E, B, Fmt> Service<Request<B>> for ErrorHandler<F, Fmt>
where
    F: Fn(Request<B>) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    E: Into<anyhow::Error>,
    Fmt: Formatter + Clone + 'static,
    B: Send + 'static,
{
    type Response = Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let handler = self.clone();
        Box::pin(async move { Ok(handler.handle(req).await) })
    }
}

/// Registers an [`ErrorHandler`] on an axum [`Router`](axum::Router) under
/// `path`, for every method.
///
/// The router is passed explicitly; there is no process-wide default to
/// register against.
#[cfg(feature = "axum")]
#[cfg_attr(docsrs, doc(cfg(feature = "axum")))]
pub fn route<S, F, Fut, E, Fmt>(
    router: axum::Router<S>,
    path: &str,
    handler: ErrorHandler<F, Fmt>,
) -> axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
    F: Fn(Request<axum::body::Body>) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    E: Into<anyhow::Error> + 'static,
    Fmt: Formatter + Clone + 'static,
{
    router.route_service(path, handler)
}
