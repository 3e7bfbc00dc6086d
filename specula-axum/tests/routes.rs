use std::sync::Arc;

use axum::body::Body;
use axum::Router;
use http::Request;
use http_body_util::BodyExt;
use serde_json::Value;
use specula_axum::docs_routes;
use specula_core::{ApiRoot, DocCache, DocsConfig, UiSetting};
use specula_macros::Reflect;
use tower::ServiceExt;

#[derive(Default, Reflect)]
struct Pet {
    #[reflect(json = "id", swagger = "required")]
    id: i64,
    #[reflect(json = "name")]
    name: String,
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn petstore() -> Arc<DocCache> {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.get("/pets/:id")
        .add_param_path(&0_i64, "id", "Pet id")
        .add_response(200, "the pet", Some(&Pet::default()), None);
    Arc::new(root.into_cache())
}

fn broken() -> Arc<DocCache> {
    let mut root = ApiRoot::new("Broken", "1.0.0");
    root.get("/secret").set_security(&["missing"]);
    Arc::new(root.into_cache())
}

fn inline_config() -> DocsConfig {
    DocsConfig::new("Petstore", "1.0.0")
}

fn detached_config() -> DocsConfig {
    DocsConfig::new("Petstore", "1.0.0").with_ui(UiSetting {
        detach_spec: true,
        hide_top: false,
        cdn: "https://cdn.example.com/swagger/".to_string(),
    })
}

async fn get_response(router: Router, path: &str) -> (http::StatusCode, String, http::HeaderMap) {
    let req = Request::builder().uri(path).body(Body::empty()).unwrap();

    let response = router.oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_str = String::from_utf8(body.to_vec()).unwrap();
    (status, body_str, headers)
}

// ── JSON document ───────────────────────────────────────────────────────────

#[tokio::test]
async fn spec_endpoint_serves_document() {
    let router = docs_routes::<()>(petstore(), &inline_config());

    let (status, body, headers) = get_response(router, "/doc/swagger.json").await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(
        headers.get("content-type").unwrap().to_str().unwrap(),
        "application/json"
    );

    let spec: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(spec["openapi"], "3.0.1");
    assert_eq!(spec["info"]["title"], "Petstore");
    assert!(spec["paths"]["/pets/{id}"]["get"].is_object());
    assert_eq!(
        spec["paths"]["/pets/{id}"]["get"]["responses"]["200"]["content"]["application/json"]
            ["schema"]["$ref"],
        "#/components/schemas/Pet"
    );
}

#[tokio::test]
async fn spec_endpoint_is_stable_across_requests() {
    let cache = petstore();
    let first = get_response(docs_routes::<()>(cache.clone(), &inline_config()), "/doc/swagger.json").await;
    let second = get_response(docs_routes::<()>(cache, &inline_config()), "/doc/swagger.json").await;
    assert_eq!(first.1, second.1);
}

#[tokio::test]
async fn custom_docs_path() {
    let config = inline_config().with_docs_path("/api/docs/");
    let router = docs_routes::<()>(petstore(), &config);

    let (status, _, _) = get_response(router.clone(), "/api/docs/swagger.json").await;
    assert_eq!(status, http::StatusCode::OK);

    let (status, _, _) = get_response(router, "/api/docs").await;
    assert_eq!(status, http::StatusCode::OK);
}

// ── UI ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ui_inlines_document_by_default() {
    let router = docs_routes::<()>(petstore(), &inline_config());

    let (status, body, headers) = get_response(router, "/doc").await;
    assert_eq!(status, http::StatusCode::OK);
    assert!(headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert!(body.contains("<title>Petstore</title>"));
    assert!(body.contains("\"openapi\":\"3.0.1\""));
    assert!(body.contains(".topbar { display: none; }"));
    assert!(body.contains(specula_core::DEFAULT_CDN));
}

#[tokio::test]
async fn ui_links_document_when_detached() {
    let router = docs_routes::<()>(petstore(), &detached_config());

    let (status, body, _) = get_response(router, "/doc").await;
    assert_eq!(status, http::StatusCode::OK);
    assert!(body.contains("const spec = null;"));
    assert!(body.contains("config.url = \"/doc/swagger.json\""));
    assert!(body.contains(".topbar { display: block; }"));
    assert!(body.contains("https://cdn.example.com/swagger/swagger-ui.css"));
}

#[tokio::test]
async fn oauth2_redirect_page() {
    let router = docs_routes::<()>(petstore(), &inline_config());

    let (status, body, _) = get_response(router, "/doc/oauth2-redirect.html").await;
    assert_eq!(status, http::StatusCode::OK);
    assert!(body.contains("swaggerUIRedirectOauth2"));
}

// ── Build failures ──────────────────────────────────────────────────────────

#[tokio::test]
async fn build_failure_is_plain_text_500() {
    let router = docs_routes::<()>(broken(), &inline_config());

    let (status, body, headers) = get_response(router.clone(), "/doc/swagger.json").await;
    assert_eq!(status, http::StatusCode::INTERNAL_SERVER_ERROR);
    assert!(headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert!(body.contains("missing"));

    let (status, ui_body, _) = get_response(router, "/doc").await;
    assert_eq!(status, http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(ui_body, body);
}

#[tokio::test]
async fn detached_ui_renders_even_when_build_fails() {
    let router = docs_routes::<()>(broken(), &detached_config());

    let (status, _, _) = get_response(router, "/doc").await;
    assert_eq!(status, http::StatusCode::OK);
}
