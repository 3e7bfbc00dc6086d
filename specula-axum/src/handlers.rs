use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use specula_core::{DocCache, DocsConfig};
use tracing::error;

const SWAGGER_HTML: &str = include_str!("../assets/swagger.html");
const OAUTH2_REDIRECT_HTML: &str = include_str!("../assets/oauth2-redirect.html");

/// Name of the JSON document endpoint under the docs path.
pub const SPEC_NAME: &str = "swagger.json";

struct DocsState {
    cache: Arc<DocCache>,
    docs_path: String,
    spec_url: String,
    detach_spec: bool,
    hide_top: bool,
    cdn: String,
}

/// Build an `axum::Router` serving the documentation:
///
/// - `{docs_path}`: Swagger UI page
/// - `{docs_path}/swagger.json`: the JSON document
/// - `{docs_path}/oauth2-redirect.html`: OAuth2 redirect page used by the UI
///
/// The document is built on the first request that needs it. A build failure
/// is answered with `500` and the error message as plain text.
pub fn docs_routes<S: Clone + Send + Sync + 'static>(
    cache: Arc<DocCache>,
    config: &DocsConfig,
) -> Router<S> {
    let docs_path = config.normalized_docs_path();
    let spec_url = join(&docs_path, SPEC_NAME);
    let redirect_url = join(&docs_path, "oauth2-redirect.html");

    let state = Arc::new(DocsState {
        cache,
        docs_path: docs_path.clone(),
        spec_url: spec_url.clone(),
        detach_spec: config.ui.detach_spec,
        hide_top: config.ui.hide_top,
        cdn: config.ui.cdn().trim_end_matches('/').to_string(),
    });

    let state_for_spec = state.clone();
    let state_for_ui = state;

    Router::<S>::new()
        .route(
            &spec_url,
            get(move || {
                let state = state_for_spec.clone();
                async move { spec_response(&state.cache) }
            }),
        )
        .route(
            &docs_path,
            get(move || {
                let state = state_for_ui.clone();
                async move { ui_response(&state) }
            }),
        )
        .route(
            &redirect_url,
            get(|| async { Html(OAUTH2_REDIRECT_HTML).into_response() }),
        )
}

fn spec_response(cache: &DocCache) -> Response {
    match cache.to_json() {
        Ok(json) => ([("content-type", "application/json")], json).into_response(),
        Err(msg) => failure(msg),
    }
}

fn ui_response(state: &DocsState) -> Response {
    let (spec, hide_top) = if state.detach_spec {
        ("null".to_string(), state.hide_top)
    } else {
        match state.cache.to_json() {
            Ok(json) => (json.replace("</", "<\\/"), true),
            Err(msg) => return failure(msg),
        }
    };

    let page = SWAGGER_HTML
        .replace("{{title}}", &escape_html(state.cache.title()))
        .replace("{{cdn}}", &state.cdn)
        .replace("{{topbar_display}}", if hide_top { "none" } else { "block" })
        .replace("{{docs_path}}", state.docs_path.trim_end_matches('/'))
        .replace("{{spec_url}}", &state.spec_url)
        .replace("{{spec}}", &spec);
    Html(page).into_response()
}

fn failure(msg: String) -> Response {
    error!(error = %msg, "serving OpenAPI document failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [("content-type", "text/plain; charset=utf-8")],
        msg,
    )
        .into_response()
}

fn join(base: &str, name: &str) -> String {
    format!("{}/{name}", base.trim_end_matches('/'))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
