//! Rendering a [`HttpError`] onto the wire.
//!
//! A [`Formatter`] turns an error value into a complete response: status,
//! headers and body. The built-ins cover plain text, JSON, HTML and XML,
//! plus a [`Negotiator`] that picks one of them from the request's `Accept`
//! header.

use std::borrow::Cow;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{self, HeaderValue};
use http::request::Parts;
use http::Response;
use http_body_util::Full;
use mime::Mime;
use serde::Serialize;

use crate::http_error::HttpError;

/// Renders a [`HttpError`] as a complete HTTP response.
///
/// Implementations receive the request head so they can inspect request
/// headers (the [`Negotiator`] reads `Accept`); most ignore it.
pub trait Formatter: Send + Sync {
    fn format(&self, req: &Parts, err: &HttpError) -> Response<Full<Bytes>>;
}

impl<T> Formatter for Arc<T>
where
    T: Formatter + ?Sized,
{
    fn format(&self, req: &Parts, err: &HttpError) -> Response<Full<Bytes>> {
        (**self).format(req, err)
    }
}

fn error_response(
    err: &HttpError,
    content_type: &'static str,
    body: impl Into<Bytes>,
) -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(body.into()));
    *resp.status_mut() = err.status_code();
    resp.headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    resp
}

/// `text/plain` rendering: the body is the error message, verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format(&self, _req: &Parts, err: &HttpError) -> Response<Full<Bytes>> {
        error_response(err, "text/plain", err.message().to_owned())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
}

impl<'a> ErrorBody<'a> {
    fn new(err: &'a HttpError) -> Self {
        Self {
            error: err.message(),
            status: err.status_code().as_u16(),
            code: err.status_code().canonical_reason(),
        }
    }
}

/// `application/json` rendering: `{"error": ..., "status": ..., "code": ...}`
/// where `code` is the canonical reason phrase of the status.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Compact output.
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Indented output.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, _req: &Parts, err: &HttpError) -> Response<Full<Bytes>> {
        let body = ErrorBody::new(err);
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(&body)
        } else {
            serde_json::to_vec(&body)
        };
        match encoded {
            Ok(buf) => error_response(err, "application/json", buf),
            Err(e) => error_response(err, "text/plain", e.to_string()),
        }
    }
}

/// `text/html` rendering: a fixed error page embedding the status code, the
/// message and the reason phrase.
///
/// The message is HTML-escaped by default. [`HtmlFormatter::raw`] opts out
/// for callers that guarantee their messages are trusted markup.
#[derive(Debug, Clone, Copy)]
pub struct HtmlFormatter {
    escape: bool,
}

impl HtmlFormatter {
    pub fn new() -> Self {
        Self { escape: true }
    }

    /// Embeds messages without escaping. Unsafe for messages derived from
    /// request input.
    pub fn raw() -> Self {
        Self { escape: false }
    }
}

impl Default for HtmlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for HtmlFormatter {
    fn format(&self, _req: &Parts, err: &HttpError) -> Response<Full<Bytes>> {
        let status = err.status_code();
        let message = if self.escape {
            escape_markup(err.message())
        } else {
            Cow::Borrowed(err.message())
        };
        let body = format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <title>Error {code}</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; }}
        .error-container {{ max-width: 600px; margin: 0 auto; }}
        .error-code {{ font-size: 48px; color: #e74c3c; margin-bottom: 20px; }}
        .error-message {{ font-size: 18px; color: #333; margin-bottom: 20px; }}
        .error-details {{ font-size: 14px; color: #666; }}
    </style>
</head>
<body>
    <div class="error-container">
        <div class="error-code">{code}</div>
        <div class="error-message">{message}</div>
        <div class="error-details">{reason}</div>
    </div>
</body>
</html>"#,
            code = status.as_u16(),
            message = message,
            reason = status.canonical_reason().unwrap_or(""),
        );
        error_response(err, "text/html; charset=utf-8", body)
    }
}

/// `application/xml` rendering: the same fields as [`JsonFormatter`] under an
/// `<error>` root element. Text content is always XML-escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlFormatter;

impl Formatter for XmlFormatter {
    fn format(&self, _req: &Parts, err: &HttpError) -> Response<Full<Bytes>> {
        let status = err.status_code();
        let code = match status.canonical_reason() {
            Some(reason) => format!("<code>{}</code>", escape_markup(reason)),
            None => String::new(),
        };
        let body = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<error><error>{message}</error><status>{status}</status>{code}</error>"#,
            message = escape_markup(err.message()),
            status = status.as_u16(),
            code = code,
        );
        error_response(err, "application/xml", body)
    }
}

fn escape_markup(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Adapts a plain function into a [`Formatter`].
///
/// ```rust
/// use httperr::formatter::FormatterFn;
///
/// let teapot = FormatterFn::new(|_req: &http::request::Parts, err: &httperr::HttpError| {
///     let mut resp = http::Response::new(http_body_util::Full::new(
///         bytes::Bytes::from(format!("oops: {}", err.message())),
///     ));
///     *resp.status_mut() = err.status_code();
///     resp
/// });
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FormatterFn<F>(F);

impl<F> FormatterFn<F>
where
    F: Fn(&Parts, &HttpError) -> Response<Full<Bytes>> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Formatter for FormatterFn<F>
where
    F: Fn(&Parts, &HttpError) -> Response<Full<Bytes>> + Send + Sync,
{
    fn format(&self, req: &Parts, err: &HttpError) -> Response<Full<Bytes>> {
        (self.0)(req, err)
    }
}

/// Dispatches to a registered [`Formatter`] based on the request's `Accept`
/// header.
///
/// Registrations are scanned in insertion order; the first whose
/// `type/subtype` appears in the `Accept` value wins. The match is a plain
/// token search, not full RFC 9110 negotiation: quality values are ignored
/// and `*/*` only selects the default. When nothing matches, or the header
/// is absent, the default formatter (initially [`TextFormatter`]) runs.
///
/// Build the negotiator once at startup, before installing it into a
/// handler; it is not meant to be mutated while requests are in flight.
///
/// ```rust
/// use httperr::formatter::{HtmlFormatter, JsonFormatter, Negotiator, XmlFormatter};
///
/// let negotiator = Negotiator::new()
///     .register(mime::APPLICATION_JSON, JsonFormatter::new())
///     .register(mime::TEXT_HTML, HtmlFormatter::new())
///     .register("application/xml".parse().unwrap(), XmlFormatter)
///     .with_default(JsonFormatter::new());
/// ```
#[derive(Clone)]
pub struct Negotiator {
    formatters: Vec<(Mime, Arc<dyn Formatter>)>,
    default: Arc<dyn Formatter>,
}

impl Negotiator {
    pub fn new() -> Self {
        Self {
            formatters: Vec::new(),
            default: Arc::new(TextFormatter),
        }
    }

    /// Registers `formatter` for the given MIME type.
    #[must_use]
    pub fn register<F>(mut self, mime: Mime, formatter: F) -> Self
    where
        F: Formatter + 'static,
    {
        self.formatters.push((mime, Arc::new(formatter)));
        self
    }

    /// Replaces the fallback formatter.
    #[must_use]
    pub fn with_default<F>(mut self, formatter: F) -> Self
    where
        F: Formatter + 'static,
    {
        self.default = Arc::new(formatter);
        self
    }
}

impl Default for Negotiator {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for Negotiator {
    fn format(&self, req: &Parts, err: &HttpError) -> Response<Full<Bytes>> {
        if let Some(accept) = req
            .headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
        {
            for (mime, formatter) in &self.formatters {
                if accept.contains(mime.essence_str()) {
                    return formatter.format(req, err);
                }
            }
        }
        self.default.format(req, err)
    }
}
