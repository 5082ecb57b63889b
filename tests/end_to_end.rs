use std::sync::Arc;

use bytes::Bytes;
use http::header::{self, HeaderValue, RETRY_AFTER};
use http::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};

use httperr::formatter::{
    Formatter, HtmlFormatter, JsonFormatter, Negotiator, TextFormatter, XmlFormatter,
};
use httperr::{ErrorHandler, HttpError};

fn request(accept: Option<&'static str>) -> Request<Bytes> {
    let mut builder = Request::builder().uri("/users/999");
    if let Some(accept) = accept {
        builder = builder.header(header::ACCEPT, accept);
    }
    builder.body(Bytes::new()).unwrap()
}

async fn body_string(resp: Response<Full<Bytes>>) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn success_bypasses_the_formatter() {
    let handler = ErrorHandler::new(|_req: Request<Bytes>| async {
        let mut resp = Response::new(Full::new(Bytes::from_static(b"created")));
        *resp.status_mut() = StatusCode::CREATED;
        Ok::<_, HttpError>(resp)
    });

    let resp = handler.handle(request(None)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    // no Content-Type: nothing ran after the user function
    assert!(!resp.headers().contains_key(header::CONTENT_TYPE));
    assert_eq!(body_string(resp).await, "created");
}

#[tokio::test]
async fn not_found_through_default_text_path() {
    let handler = ErrorHandler::new(|_req: Request<Bytes>| async {
        Err::<Response<Full<Bytes>>, _>(HttpError::not_found("resource not found"))
    });

    let resp = handler.handle(request(None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(resp).await, "resource not found");
}

#[tokio::test]
async fn not_found_through_json_formatter() {
    let handler = ErrorHandler::with_formatter(
        |_req: Request<Bytes>| async {
            Err::<Response<Full<Bytes>>, _>(HttpError::not_found("resource not found"))
        },
        JsonFormatter::new(),
    );

    let resp = handler.handle(request(None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "error": "resource not found",
            "status": 404,
            "code": "Not Found",
        })
    );
}

#[tokio::test]
async fn negotiated_handler_honours_accept() {
    let negotiator = Negotiator::new()
        .register(mime::APPLICATION_JSON, JsonFormatter::new())
        .register(mime::TEXT_HTML, HtmlFormatter::new())
        .register("application/xml".parse().unwrap(), XmlFormatter)
        .with_default(JsonFormatter::new());

    let handler = ErrorHandler::with_formatter(
        |_req: Request<Bytes>| async {
            Err::<Response<Full<Bytes>>, _>(HttpError::not_found("gone"))
        },
        negotiator,
    );

    let resp = handler.handle(request(Some("application/xml"))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/xml");
    assert!(body_string(resp).await.contains("<status>404</status>"));

    // nothing registered matches: the configured default answers
    let resp = handler.handle(request(Some("image/avif"))).await;
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
}

#[tokio::test]
async fn error_headers_survive_every_builtin_formatter() {
    let formatters: Vec<Arc<dyn Formatter>> = vec![
        Arc::new(TextFormatter),
        Arc::new(JsonFormatter::new()),
        Arc::new(HtmlFormatter::new()),
        Arc::new(XmlFormatter),
        Arc::new(Negotiator::new()),
    ];

    for formatter in formatters {
        let handler = ErrorHandler::with_formatter(
            |_req: Request<Bytes>| async {
                Err::<Response<Full<Bytes>>, _>(
                    HttpError::service_unavailable("")
                        .with_headers([(RETRY_AFTER, HeaderValue::from_static("30"))]),
                )
            },
            formatter,
        );

        let resp = handler.handle(request(None)).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(resp.headers()[RETRY_AFTER], "30");
    }
}

#[tokio::test]
async fn cancellation_is_an_ordinary_error() {
    let handler = ErrorHandler::new(|_req: Request<Bytes>| async {
        // a handler that noticed its deadline passing
        Err::<Response<Full<Bytes>>, _>(HttpError::from_status(StatusCode::REQUEST_TIMEOUT))
    });

    let resp = handler.handle(request(None)).await;
    assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body_string(resp).await, "Request Timeout");
}

#[cfg(feature = "axum")]
mod axum_integration {
    use super::*;
    use axum::body::Body;
    use axum::response::IntoResponse;
    use axum::Router;
    use tower::ServiceExt;

    #[tokio::test]
    async fn handler_mounts_on_an_axum_router() {
        let handler = ErrorHandler::with_formatter(
            |_req: Request<Body>| async {
                Err::<Response<Full<Bytes>>, _>(HttpError::not_found("resource not found"))
            },
            JsonFormatter::new(),
        );
        let router: Router = httperr::route(Router::new(), "/users", handler);

        let resp = router
            .oneshot(
                Request::builder()
                    .uri("/users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "resource not found");
    }

    #[tokio::test]
    async fn http_error_into_axum_response() {
        let resp = HttpError::service_unavailable("")
            .with_headers([(RETRY_AFTER, HeaderValue::from_static("30"))])
            .into_response();

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(resp.headers()[RETRY_AFTER], "30");
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"Service Unavailable");
    }
}
