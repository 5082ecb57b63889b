use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};

/// A result whose error variant is [`HttpError`].
pub type Result<T> = core::result::Result<T, HttpError>;

/// An error that can be rendered as a HTTP response: a status code, a
/// human-readable message, optional response headers and an optional
/// underlying cause.
///
/// The value is immutable once built. [`HttpError::with_headers`] does not
/// mutate the receiver; it returns a new value with the merged header map.
///
/// ```rust
/// use http::StatusCode;
/// use httperr::HttpError;
///
/// let err = HttpError::not_found("no such user");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// assert_eq!(err.to_string(), "no such user");
/// ```
#[derive(Debug, Clone)]
pub struct HttpError {
    pub(crate) status_code: StatusCode,
    pub(crate) message: Cow<'static, str>,
    pub(crate) headers: HeaderMap,
    pub(crate) source: Option<Arc<anyhow::Error>>,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {source}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl StdError for HttpError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(AsRef::<dyn StdError + 'static>::as_ref)
    }
}

impl PartialEq for HttpError {
    fn eq(&self, other: &Self) -> bool {
        self.status_code == other.status_code
            && self.message == other.message
            && self.headers == other.headers
    }
}

impl HttpError {
    /// Creates a [`HttpError`] with status code and message, no headers and
    /// no cause.
    pub fn new(status_code: StatusCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status_code,
            message: message.into(),
            headers: HeaderMap::new(),
            source: None,
        }
    }

    /// Creates a [`HttpError`] from a status code alone. The message is the
    /// canonical reason phrase of the status, if it has one.
    pub fn from_status(status_code: StatusCode) -> Self {
        Self::new(status_code, default_message(status_code))
    }

    /// Creates a [`HttpError`] that records `cause` as the underlying error.
    ///
    /// The cause enriches the [`Display`](fmt::Display) rendering
    /// (`"{message}: {cause}"`) and is reachable through
    /// [`Error::source`](StdError::source); it is never part of the message a
    /// formatter puts on the wire.
    pub fn wrap<E>(
        status_code: StatusCode,
        message: impl Into<Cow<'static, str>>,
        cause: E,
    ) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self {
            source: Some(Arc::new(cause.into())),
            ..Self::new(status_code, message)
        }
    }

    /// Returns a new [`HttpError`] with `headers` merged on top of the
    /// receiver's headers. Incoming entries win on name collision; the
    /// receiver is left untouched. Status, message and cause carry over.
    ///
    /// ```rust
    /// use http::header::{HeaderValue, RETRY_AFTER};
    /// use httperr::HttpError;
    ///
    /// let err = HttpError::service_unavailable("")
    ///     .with_headers([(RETRY_AFTER, HeaderValue::from_static("30"))]);
    /// assert_eq!(err.headers()[RETRY_AFTER], "30");
    /// ```
    #[must_use]
    pub fn with_headers<I>(&self, headers: I) -> Self
    where
        I: IntoIterator<Item = (HeaderName, HeaderValue)>,
    {
        let mut merged = self.clone();
        for (name, value) in headers {
            merged.headers.insert(name, value);
        }
        merged
    }

    /// Coerces a generic error into a [`HttpError`].
    ///
    /// If the underlying error is a [`HttpError`] it is recovered as-is,
    /// status, message, headers and cause intact. Anything else becomes a
    /// generic 500: the original error's message is deliberately discarded so
    /// internal detail never reaches a client. Callers who want the detail
    /// logged must capture the error before converting.
    pub fn from_err<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        match err.into().downcast::<HttpError>() {
            Ok(http_err) => http_err,
            Err(_) => Self::internal_server_error("An unexpected error occurred"),
        }
    }

    /// Returns the status code.
    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the response headers attached to this error.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the underlying cause if any.
    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.source.as_deref()
    }
}

/// Constructors for the common status families. The 404/405/5xx variants
/// substitute the canonical reason phrase when the message is empty.
impl HttpError {
    /// Creates a 400 Bad Request error.
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 401 Unauthorized error.
    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Creates a 403 Forbidden error.
    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// Creates a 404 Not Found error.
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::or_default_message(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 405 Method Not Allowed error.
    pub fn method_not_allowed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::or_default_message(StatusCode::METHOD_NOT_ALLOWED, message)
    }

    /// Creates a 409 Conflict error.
    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Creates a 422 Unprocessable Entity error.
    pub fn unprocessable_entity(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// Creates a 500 Internal Server Error.
    pub fn internal_server_error(message: impl Into<Cow<'static, str>>) -> Self {
        Self::or_default_message(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Creates a 501 Not Implemented error.
    pub fn not_implemented(message: impl Into<Cow<'static, str>>) -> Self {
        Self::or_default_message(StatusCode::NOT_IMPLEMENTED, message)
    }

    /// Creates a 502 Bad Gateway error.
    pub fn bad_gateway(message: impl Into<Cow<'static, str>>) -> Self {
        Self::or_default_message(StatusCode::BAD_GATEWAY, message)
    }

    /// Creates a 503 Service Unavailable error.
    pub fn service_unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::or_default_message(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// Creates a 504 Gateway Timeout error.
    pub fn gateway_timeout(message: impl Into<Cow<'static, str>>) -> Self {
        Self::or_default_message(StatusCode::GATEWAY_TIMEOUT, message)
    }

    fn or_default_message(status_code: StatusCode, message: impl Into<Cow<'static, str>>) -> Self {
        let message = message.into();
        if message.is_empty() {
            Self::from_status(status_code)
        } else {
            Self::new(status_code, message)
        }
    }
}

pub(crate) fn default_message(status_code: StatusCode) -> &'static str {
    status_code.canonical_reason().unwrap_or("")
}

#[cfg(feature = "axum")]
#[cfg_attr(docsrs, doc(cfg(feature = "axum")))]
impl axum::response::IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        let mut resp = (self.status_code, self.message.into_owned()).into_response();
        for (name, value) in &self.headers {
            resp.headers_mut()
                .entry(name)
                .or_insert_with(|| value.clone());
        }
        resp
    }
}
