use crate::i18n::LocaleRegistry;
use anyhow::{bail, Context, Result};
use chrono::Duration;
use std::path::PathBuf;

/// Longest accepted session lifetime: one year.
pub const MAX_SESSION_LIFETIME_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,
    pub port: u16,

    // Locales
    pub translations_dir: PathBuf,
    pub default_locale: String,
    pub supported_locales: Option<Vec<String>>,

    // Session
    pub session_cookie_name: String,
    pub session_lifetime_hours: i64,
    pub session_cookie_secure: bool,

    // Where the language switch redirects when the referrer is unusable
    pub home_path: String,
    // Host[:port] browsers use to reach the portal when a proxy rewrites Host
    pub public_host: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            translations_dir: PathBuf::from("translations"),
            default_locale: "en".to_string(),
            supported_locales: None,
            session_cookie_name: "portal_session".to_string(),
            session_lifetime_hours: 8,
            session_cookie_secure: false,
            home_path: "/".to_string(),
            public_host: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            // Server
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: match std::env::var("PORT") {
                Ok(value) => value
                    .parse()
                    .with_context(|| format!("PORT is not a valid port: '{}'", value))?,
                Err(_) => defaults.port,
            },

            // Locales
            translations_dir: std::env::var("TRANSLATIONS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.translations_dir),
            default_locale: std::env::var("DEFAULT_LOCALE").unwrap_or(defaults.default_locale),
            supported_locales: std::env::var("SUPPORTED_LOCALES")
                .ok()
                .map(|value| parse_list(&value))
                .filter(|codes| !codes.is_empty()),

            // Session
            session_cookie_name: std::env::var("SESSION_COOKIE_NAME")
                .unwrap_or(defaults.session_cookie_name),
            session_lifetime_hours: match std::env::var("SESSION_LIFETIME_HOURS") {
                Ok(value) => parse_lifetime_hours(&value)?,
                Err(_) => defaults.session_lifetime_hours,
            },
            session_cookie_secure: std::env::var("SESSION_COOKIE_SECURE")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.session_cookie_secure),

            home_path: std::env::var("HOME_PATH")
                .ok()
                .filter(|path| path.starts_with('/') && !path.starts_with("//"))
                .unwrap_or(defaults.home_path),
            public_host: std::env::var("PUBLIC_HOST")
                .ok()
                .map(|host| host.trim().to_string())
                .filter(|host| !host.is_empty()),
        })
    }

    /// Session lifetime as a duration.
    pub fn session_lifetime(&self) -> Result<Duration> {
        Duration::try_hours(self.session_lifetime_hours).with_context(|| {
            format!(
                "SESSION_LIFETIME_HOURS is out of range: {}",
                self.session_lifetime_hours
            )
        })
    }

    /// Build the locale registry this configuration describes.
    pub fn locale_registry(&self) -> Result<LocaleRegistry> {
        let mut registry = LocaleRegistry::builtin()
            .with_default(&self.default_locale)
            .context("DEFAULT_LOCALE must name a builtin locale")?;

        if let Some(codes) = &self.supported_locales {
            registry = registry
                .with_enabled(codes)
                .context("SUPPORTED_LOCALES must list builtin locales including the default")?;
        }

        Ok(registry)
    }
}

fn parse_lifetime_hours(value: &str) -> Result<i64> {
    let hours: i64 = value
        .trim()
        .parse()
        .with_context(|| format!("SESSION_LIFETIME_HOURS is not a number: '{}'", value))?;
    if !(1..=MAX_SESSION_LIFETIME_HOURS).contains(&hours) {
        bail!(
            "SESSION_LIFETIME_HOURS must be between 1 and {}, got {}",
            MAX_SESSION_LIFETIME_HOURS,
            hours
        );
    }
    Ok(hours)
}

/// Split a comma-separated list, dropping blanks.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("en, hi ,"), vec!["en", "hi"]);
        assert!(parse_list(" , ").is_empty());
    }

    #[test]
    fn test_parse_lifetime_hours() {
        assert_eq!(parse_lifetime_hours("8").unwrap(), 8);
        assert_eq!(parse_lifetime_hours(" 24 ").unwrap(), 24);
        assert_eq!(
            parse_lifetime_hours(&MAX_SESSION_LIFETIME_HOURS.to_string()).unwrap(),
            MAX_SESSION_LIFETIME_HOURS
        );
    }

    #[test]
    fn test_parse_lifetime_hours_rejects_out_of_range() {
        assert!(parse_lifetime_hours("0").is_err());
        assert!(parse_lifetime_hours("-3").is_err());
        assert!(parse_lifetime_hours("100000000000").is_err());
        assert!(parse_lifetime_hours("eight").is_err());
    }

    #[test]
    fn test_session_lifetime() {
        assert_eq!(Config::default().session_lifetime().unwrap(), Duration::hours(8));

        let config = Config {
            session_lifetime_hours: i64::MAX,
            ..Config::default()
        };
        assert!(config.session_lifetime().is_err());
    }

    #[test]
    fn test_default_registry() {
        let registry = Config::default().locale_registry().unwrap();
        assert_eq!(registry.default_locale().code(), "en");
        assert_eq!(registry.list_enabled().len(), 2);
    }

    #[test]
    fn test_registry_with_hindi_default() {
        let config = Config {
            default_locale: "hi".to_string(),
            ..Config::default()
        };
        assert_eq!(config.locale_registry().unwrap().default_locale().code(), "hi");
    }

    #[test]
    fn test_registry_rejects_unknown_default() {
        let config = Config {
            default_locale: "fr".to_string(),
            ..Config::default()
        };
        let err = config.locale_registry().unwrap_err();
        assert!(err.to_string().contains("DEFAULT_LOCALE"));
    }

    #[test]
    fn test_registry_restricted_locales() {
        let config = Config {
            supported_locales: Some(vec!["en".to_string()]),
            ..Config::default()
        };
        let registry = config.locale_registry().unwrap();
        assert!(!registry.is_enabled("hi"));
    }

    #[test]
    fn test_registry_rejects_dropping_default() {
        let config = Config {
            supported_locales: Some(vec!["hi".to_string()]),
            ..Config::default()
        };
        assert!(config.locale_registry().is_err());
    }
}
