//! `httperr` lets HTTP handlers report failure by returning a value instead
//! of writing status and body themselves.
//!
//! A [`HttpError`] bundles a status code, a message, optional response
//! headers and an optional cause. An [`ErrorHandler`] wraps an
//! error-returning async function into a request handler, and a
//! [`Formatter`](formatter::Formatter) decides how the error reaches the
//! wire: plain text, JSON, HTML, XML or content-negotiated.
//!
//! # Example
//!
//! ```rust
//! use bytes::Bytes;
//! use http::{Request, Response};
//! use http_body_util::Full;
//! use httperr::{formatter::JsonFormatter, ErrorHandler, HttpError};
//!
//! async fn get_user(req: Request<Bytes>) -> Result<Response<Full<Bytes>>, HttpError> {
//!     let id: u64 = req
//!         .uri()
//!         .query()
//!         .and_then(|q| q.strip_prefix("id="))
//!         .and_then(|id| id.parse().ok())
//!         .ok_or_else(|| HttpError::bad_request("missing or malformed id"))?;
//!
//!     if id != 1 {
//!         return Err(HttpError::not_found("no such user"));
//!     }
//!     Ok(Response::new(Full::new(Bytes::from_static(b"alice"))))
//! }
//!
//! // errors from `get_user` come back as JSON bodies
//! let handler = ErrorHandler::with_formatter(get_user, JsonFormatter::new());
//! ```
//!
//! The handler implements [`tower_service::Service`], so it plugs into hyper
//! or, with the `axum` feature, an `axum::Router` via [`route`].

#![cfg_attr(docsrs, feature(doc_cfg))]

mod extension;
mod handler;
mod http_error;

pub use extension::*;
pub use handler::*;
pub use http_error::*;

#[doc(hidden)]
pub mod macros;

pub mod formatter;

pub use http;
