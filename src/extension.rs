use http::StatusCode;
use std::{borrow::Cow, result::Result as StdResult};

use crate::http_error::{default_message, HttpError};

/// Extension trait to map the error variant of a [`Result`] to a [`HttpError`].
pub trait ResultExt {
    type Item;

    /// Maps a `Result<T, E>` to `Result<T, HttpError>` by wrapping the error
    /// contained in [`Err`] as the cause of a [`HttpError`] with the given
    /// status code. The message is the canonical reason phrase.
    ///
    /// # Example
    ///
    /// ```
    /// use http::StatusCode;
    /// use httperr::{HttpError, ResultExt};
    ///
    /// let s: Result<i32, HttpError> = "nan"
    ///     .parse::<i32>()
    ///     .map_status(StatusCode::BAD_REQUEST);
    /// assert_eq!(s.unwrap_err().status_code(), StatusCode::BAD_REQUEST);
    /// ```
    fn map_status(self, status_code: StatusCode) -> StdResult<Self::Item, HttpError>;

    /// Maps a `Result<T, E>` to `Result<T, HttpError>` by wrapping the error
    /// contained in [`Err`] as the cause of a [`HttpError`] with the given
    /// status code and message.
    ///
    /// # Example
    ///
    /// ```
    /// use http::StatusCode;
    /// use httperr::{HttpError, ResultExt};
    ///
    /// let s: Result<i32, HttpError> = "nan"
    ///     .parse::<i32>()
    ///     .map_http_error(StatusCode::BAD_REQUEST, "invalid number");
    /// assert_eq!(s.unwrap_err().message(), "invalid number");
    /// ```
    fn map_http_error<S>(
        self,
        status_code: StatusCode,
        message: S,
    ) -> StdResult<Self::Item, HttpError>
    where
        S: Into<Cow<'static, str>>;
}

impl<T, E> ResultExt for StdResult<T, E>
where
    E: Into<anyhow::Error>,
{
    type Item = T;

    fn map_status(self, status_code: StatusCode) -> StdResult<T, HttpError> {
        self.map_err(|e| HttpError::wrap(status_code, default_message(status_code), e))
    }

    fn map_http_error<S>(
        self,
        status_code: StatusCode,
        message: S,
    ) -> StdResult<Self::Item, HttpError>
    where
        S: Into<Cow<'static, str>>,
    {
        self.map_err(|e| HttpError::wrap(status_code, message, e))
    }
}

/// Extension trait to transform an [`Option`] to a [`HttpError`].
pub trait OptionExt {
    type Item;

    /// Transforms the `Option<T>` into a `Result<T, HttpError>`, mapping
    /// `Some(v)` to `Ok(v)` and `None` to a [`HttpError`] with the given
    /// status code.
    ///
    /// # Examples
    ///
    /// ```
    /// use http::StatusCode;
    /// use httperr::{HttpError, OptionExt};
    ///
    /// let x: Result<(), HttpError> = None.ok_or_status(StatusCode::NOT_FOUND);
    /// assert_eq!(x.unwrap_err().status_code(), StatusCode::NOT_FOUND);
    /// ```
    fn ok_or_status(self, status_code: StatusCode) -> StdResult<Self::Item, HttpError>;

    /// Like [`OptionExt::ok_or_status`], with an explicit message.
    fn ok_or_http_error<S>(
        self,
        status_code: StatusCode,
        message: S,
    ) -> StdResult<Self::Item, HttpError>
    where
        S: Into<Cow<'static, str>>;
}

impl<T> OptionExt for Option<T> {
    type Item = T;

    fn ok_or_status(self, status_code: StatusCode) -> StdResult<T, HttpError> {
        self.ok_or_else(|| HttpError::from_status(status_code))
    }

    fn ok_or_http_error<S>(
        self,
        status_code: StatusCode,
        message: S,
    ) -> StdResult<T, HttpError>
    where
        S: Into<Cow<'static, str>>,
    {
        self.ok_or_else(|| HttpError::new(status_code, message))
    }
}
