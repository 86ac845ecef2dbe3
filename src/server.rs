//! HTTP surface: the index page, the language switch endpoint and a few
//! JSON helpers.

use crate::config::Config;
use crate::i18n::{Locale, MetricsReport, Translator};
use crate::pages;
use crate::session::{CookieSettings, SessionStore};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use url::Url;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<Translator>,
    pub sessions: SessionStore,
    pub cookies: Arc<CookieSettings>,
    pub home_path: Arc<str>,
    pub public_host: Option<Arc<str>>,
}

impl AppState {
    pub fn new(config: &Config, translator: Translator, sessions: SessionStore) -> Self {
        Self {
            translator: Arc::new(translator),
            sessions,
            cookies: Arc::new(CookieSettings::from_config(config)),
            home_path: Arc::from(config.home_path.as_str()),
            public_host: config.public_host.as_deref().map(Arc::from),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/set_language/:language", get(set_language))
        .route("/languages", get(languages))
        .route("/i18n/metrics", get(metrics))
        .route("/health", get(health))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct LocaleQuery {
    lang: Option<String>,
}

/// Locale for this request.
///
/// A `?lang=` override wins, then the session's stored locale, then the
/// browser's `Accept-Language`, then the registry default.
async fn request_locale(state: &AppState, headers: &HeaderMap, lang: Option<&str>) -> Locale {
    let registry = state.translator.registry();

    let stored = match state.cookies.session_id(headers) {
        Some(id) => state.sessions.locale(id).await,
        None => None,
    };
    let preferred = stored.or_else(|| {
        headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| registry.best_match(value))
    });

    state.translator.resolve_locale(lang, preferred)
}

async fn index(
    State(state): State<AppState>,
    Query(query): Query<LocaleQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let locale = request_locale(&state, &headers, query.lang.as_deref()).await;
    let locales = state.translator.registry().list_enabled();
    let html = pages::render_index(&state.translator.localizer(locale), &locales);

    (
        [(header::VARY, HeaderValue::from_static("Cookie, Accept-Language"))],
        Html(html),
    )
}

/// Store the chosen locale in the session and send the user back.
///
/// Codes outside the registry leave the session untouched; the redirect
/// happens either way.
async fn set_language(
    State(state): State<AppState>,
    Path(language): Path<String>,
    headers: HeaderMap,
) -> Response {
    let target = redirect_target(&headers, &state.home_path, state.public_host.as_deref());
    let metrics = state.translator.metrics();

    let Some(locale) = state.translator.registry().resolve(&language) else {
        debug!("Ignoring switch to unsupported locale '{}'", language);
        metrics.record_switch_ignored();
        return Redirect::to(&target).into_response();
    };

    let existing = state.cookies.session_id(&headers);
    let id = state.sessions.set_locale(existing, locale).await;
    metrics.record_switch_accepted();
    info!("Session switched to locale '{}'", locale);

    let mut response = Redirect::to(&target).into_response();
    if let Ok(cookie) = HeaderValue::from_str(&state.cookies.set_cookie(id)) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}

#[derive(Debug, Serialize)]
struct LanguageInfo {
    code: &'static str,
    name: &'static str,
    native_name: &'static str,
    flag: &'static str,
    active: bool,
}

#[derive(Debug, Serialize)]
struct LanguagesResponse {
    active: &'static str,
    default: &'static str,
    languages: Vec<LanguageInfo>,
}

async fn languages(
    State(state): State<AppState>,
    Query(query): Query<LocaleQuery>,
    headers: HeaderMap,
) -> Json<LanguagesResponse> {
    let active = request_locale(&state, &headers, query.lang.as_deref()).await;
    let registry = state.translator.registry();

    let languages = registry
        .list_enabled()
        .into_iter()
        .map(|locale| LanguageInfo {
            code: locale.code(),
            name: locale.name(),
            native_name: locale.native_name(),
            flag: locale.flag(),
            active: locale == active,
        })
        .collect();

    Json(LanguagesResponse {
        active: active.code(),
        default: registry.default_locale().code(),
        languages,
    })
}

async fn metrics(State(state): State<AppState>) -> Json<MetricsReport> {
    Json(state.translator.metrics().report())
}

async fn health() -> &'static str {
    "OK"
}

/// Where to send the user after a language switch: the `Referer` if it
/// points back at this host, otherwise `home_path`.
///
/// "This host" is `public_host` when configured, so the check still holds
/// behind a proxy that rewrites `Host`. Without it the `Host` header is used.
pub fn redirect_target(
    headers: &HeaderMap,
    home_path: &str,
    public_host: Option<&str>,
) -> String {
    let host = public_host.or_else(|| {
        headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
    });

    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| same_origin_path(referer, host))
        .unwrap_or_else(|| home_path.to_string())
}

fn same_origin_path(referer: &str, host: Option<&str>) -> Option<String> {
    let referer = referer.trim();
    if referer.starts_with('/') {
        return Some(referer.to_string()).filter(|path| is_local_path(path));
    }

    let url = Url::parse(referer).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    let referer_host = match url.port() {
        Some(port) => format!("{}:{}", url.host_str()?, port),
        None => url.host_str()?.to_string(),
    };
    if !referer_host.eq_ignore_ascii_case(host?) {
        return None;
    }

    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }
    Some(target).filter(|path| is_local_path(path))
}

/// A path on this host: rooted, and not something a browser would read as
/// a scheme-relative URL.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}
