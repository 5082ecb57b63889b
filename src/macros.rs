/// Construct an ad-hoc [`HttpError`](crate::HttpError) from a status code,
/// an optional source error and a formatted message.
///
/// ```rust
/// use httperr::http_error;
///
/// let id = 42;
/// let err = http_error!(NOT_FOUND, "no user with id {id}");
/// assert_eq!(err.status_code().as_u16(), 404);
/// assert_eq!(err.message(), "no user with id 42");
/// ```
#[macro_export]
macro_rules! http_error {
    ($status_code:ident) => {
        $crate::HttpError::from_status($crate::http::StatusCode::$status_code)
    };
    ($status_code:ident, source = $src:expr) => {
        $crate::HttpError::wrap(
            $crate::http::StatusCode::$status_code,
            $crate::http::StatusCode::$status_code
                .canonical_reason()
                .unwrap_or(""),
            $src,
        )
    };
    ($status_code:ident, source = $src:expr, $($arg:tt)+) => {
        $crate::HttpError::wrap(
            $crate::http::StatusCode::$status_code,
            std::format!($($arg)+),
            $src,
        )
    };
    ($status_code:ident, $($arg:tt)+) => {
        $crate::HttpError::new(
            $crate::http::StatusCode::$status_code,
            std::format!($($arg)+),
        )
    };
}

/// Shorthand macro to return early with an [`HttpError`](crate::HttpError).
///
/// ```rust
/// use httperr::{http_error_ret, HttpError};
///
/// fn lookup(id: u64) -> Result<(), HttpError> {
///     if id == 0 {
///         http_error_ret!(BAD_REQUEST, "invalid id {id}");
///     }
///     Ok(())
/// }
/// assert!(lookup(0).is_err());
/// ```
#[macro_export]
macro_rules! http_error_ret {
    ($($tt:tt)*) => {
        return Err($crate::http_error!($($tt)*).into())
    };
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use http::StatusCode;

    use crate::HttpError;

    #[test]
    fn http_error_status_only() {
        let e = http_error!(BAD_REQUEST);
        assert_eq!(e.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(e.message, "Bad Request");
    }

    #[test]
    fn http_error_formatted_message() {
        let i = 1;
        let e = http_error!(BAD_REQUEST, "error {i}");
        assert_eq!(e.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(e.message, "error 1");

        let e = http_error!(BAD_REQUEST, "error {}", 2);
        assert_eq!(e.message, "error 2");
    }

    #[test]
    fn http_error_status_and_source() {
        let source = anyhow!("an error");
        let e = http_error!(BAD_REQUEST, source = source);
        assert_eq!(e.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(e.message, "Bad Request");
        assert!(e.source.is_some());
    }

    #[test]
    fn http_error_status_source_and_format() {
        let source = anyhow!("an error");
        let e = http_error!(BAD_REQUEST, source = source, "error {}", 1);
        assert_eq!(e.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(e.message, "error 1");
        assert_eq!(e.to_string(), "error 1: an error");
    }

    #[test]
    fn http_error_ret_into_anyhow() {
        fn fails() -> anyhow::Result<()> {
            http_error_ret!(NOT_FOUND, "missing");
        }
        let e = HttpError::from_err(fails().unwrap_err());
        assert_eq!(e.status_code, StatusCode::NOT_FOUND);
        assert_eq!(e.message, "missing");
    }

    #[test]
    fn http_error_ret_into_http_error() {
        fn fails() -> Result<(), HttpError> {
            http_error_ret!(CONFLICT);
        }
        assert_eq!(fails().unwrap_err().status_code, StatusCode::CONFLICT);
    }
}
