//! Per-user session state.
//!
//! Sessions are identified by a random UUID carried in an `HttpOnly` cookie
//! and stored in memory. The only field is the locale preference; a stored
//! locale is a [`Locale`], so it is always a registered code.

use crate::config::Config;
use crate::i18n::Locale;
use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

/// Opaque session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value.trim()).ok().map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

/// Data kept for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    /// Active locale; `None` until the user first switches language
    pub locale: Option<Locale>,
}

#[derive(Debug, Clone)]
struct SessionEntry {
    data: SessionData,
    expires_at: DateTime<Utc>,
}

/// In-memory session store shared by all handlers.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SessionEntry>>>,
    lifetime: Duration,
}

impl SessionStore {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            lifetime,
        }
    }

    /// Session data, or `None` if the session is unknown or expired.
    pub async fn load(&self, id: SessionId) -> Option<SessionData> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .filter(|entry| entry.expires_at > Utc::now())
            .map(|entry| entry.data.clone())
    }

    /// The session's stored locale, if any.
    pub async fn locale(&self, id: SessionId) -> Option<Locale> {
        self.load(id).await.and_then(|data| data.locale)
    }

    /// Store `locale` for the session, creating one if `id` is absent,
    /// unknown or expired. Returns the id now holding the locale and
    /// refreshes its expiry.
    pub async fn set_locale(&self, id: Option<SessionId>, locale: Locale) -> SessionId {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        let live_id = id.filter(|id| {
            sessions
                .get(id)
                .map(|entry| entry.expires_at > now)
                .unwrap_or(false)
        });
        let id = live_id.unwrap_or_else(SessionId::generate);

        let entry = sessions.entry(id).or_insert_with(|| SessionEntry {
            data: SessionData::default(),
            expires_at: now,
        });
        entry.data.locale = Some(locale);
        entry.expires_at = now
            .checked_add_signed(self.lifetime)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        id
    }

    /// Drop expired sessions, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.expires_at > now);
        before - sessions.len()
    }

    /// Number of stored sessions, expired ones included until purged.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Periodically drop expired sessions for the life of the process.
pub fn spawn_purge_task(store: SessionStore, period: std::time::Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let removed = store.purge_expired().await;
            if removed > 0 {
                debug!("Purged {} expired sessions", removed);
            }
        }
    })
}

/// Session cookie attributes.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub max_age_seconds: i64,
    pub secure: bool,
}

impl CookieSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            name: config.session_cookie_name.clone(),
            max_age_seconds: config.session_lifetime_hours.saturating_mul(3600),
            secure: config.session_cookie_secure,
        }
    }

    /// Read this cookie's session id from the request's `Cookie` headers.
    pub fn session_id(&self, headers: &HeaderMap) -> Option<SessionId> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .filter(|(name, _)| *name == self.name)
            .find_map(|(_, value)| SessionId::parse(value))
    }

    /// `Set-Cookie` value carrying `id`.
    pub fn set_cookie(&self, id: SessionId) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            self.name, id, self.max_age_seconds
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LocaleRegistry;
    use axum::http::HeaderValue;

    fn settings() -> CookieSettings {
        CookieSettings {
            name: "portal_session".to_string(),
            max_age_seconds: 28_800,
            secure: false,
        }
    }

    // ==================== Store Tests ====================

    #[tokio::test]
    async fn test_set_locale_creates_session() {
        let store = SessionStore::new(Duration::hours(8));
        let hindi = LocaleRegistry::builtin().resolve("hi").unwrap();

        let id = store.set_locale(None, hindi).await;
        assert_eq!(store.locale(id).await, Some(hindi));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_set_locale_reuses_live_session() {
        let store = SessionStore::new(Duration::hours(8));
        let registry = LocaleRegistry::builtin();
        let hindi = registry.resolve("hi").unwrap();
        let english = registry.resolve("en").unwrap();

        let id = store.set_locale(None, hindi).await;
        let again = store.set_locale(Some(id), english).await;
        assert_eq!(id, again);
        assert_eq!(store.locale(id).await, Some(english));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_id_gets_fresh_session() {
        let store = SessionStore::new(Duration::hours(8));
        let hindi = LocaleRegistry::builtin().resolve("hi").unwrap();
        let forged = SessionId::generate();

        let id = store.set_locale(Some(forged), hindi).await;
        assert_ne!(id, forged);
        assert_eq!(store.locale(forged).await, None);
    }

    #[tokio::test]
    async fn test_expired_session_is_absent_and_purged() {
        let store = SessionStore::new(Duration::zero());
        let hindi = LocaleRegistry::builtin().resolve("hi").unwrap();

        let id = store.set_locale(None, hindi).await;
        assert_eq!(store.load(id).await, None);
        assert_eq!(store.purge_expired().await, 1);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_purge_task_removes_expired_sessions() {
        let store = SessionStore::new(Duration::zero());
        let hindi = LocaleRegistry::builtin().resolve("hi").unwrap();
        store.set_locale(None, hindi).await;

        let handle = spawn_purge_task(store.clone(), std::time::Duration::from_millis(10));
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        handle.abort();

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_huge_lifetime_saturates_instead_of_panicking() {
        let store = SessionStore::new(Duration::hours(100_000_000_000));
        let hindi = LocaleRegistry::builtin().resolve("hi").unwrap();

        let id = store.set_locale(None, hindi).await;
        assert_eq!(store.locale(id).await, Some(hindi));
    }

    #[tokio::test]
    async fn test_load_unknown_session() {
        let store = SessionStore::new(Duration::hours(8));
        assert_eq!(store.load(SessionId::generate()).await, None);
    }

    // ==================== Cookie Tests ====================

    #[test]
    fn test_session_id_roundtrip_through_cookie_header() {
        let id = SessionId::generate();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; portal_session={}", id)).unwrap(),
        );
        assert_eq!(settings().session_id(&headers), Some(id));
    }

    #[test]
    fn test_session_id_ignores_other_cookies_and_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("portal_session_x=abc; portal_session=not-a-uuid"),
        );
        assert_eq!(settings().session_id(&headers), None);
        assert_eq!(settings().session_id(&HeaderMap::new()), None);
    }

    #[test]
    fn test_session_id_skips_garbage_duplicate() {
        let id = SessionId::generate();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("portal_session=stale; portal_session={}", id)).unwrap(),
        );
        assert_eq!(settings().session_id(&headers), Some(id));
    }

    #[test]
    fn test_max_age_saturates() {
        let config = Config {
            session_lifetime_hours: i64::MAX,
            ..Config::default()
        };
        assert_eq!(CookieSettings::from_config(&config).max_age_seconds, i64::MAX);
    }

    #[test]
    fn test_set_cookie_attributes() {
        let id = SessionId::generate();
        let cookie = settings().set_cookie(id);
        assert!(cookie.starts_with(&format!("portal_session={}", id)));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=28800"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_set_cookie_secure() {
        let mut settings = settings();
        settings.secure = true;
        assert!(settings.set_cookie(SessionId::generate()).ends_with("; Secure"));
    }
}
