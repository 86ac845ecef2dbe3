//! Locale registry: the set of languages the portal can be switched to.
//!
//! The registry is constructed once at startup (from the builtin table and the
//! environment configuration) and then shared read-only. It is the only place
//! a [`Locale`] can be obtained from, so every `Locale` in the process refers
//! to a registered, enabled language.

use crate::i18n::negotiation::parse_accept_language;
use crate::i18n::Locale;
use thiserror::Error;

/// Display metadata for a supported locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleConfig {
    /// Language code as used in URLs and catalog directories (e.g., "en", "hi")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "Hindi")
    pub name: &'static str,

    /// Name of the language in its own script (e.g., "English", "हिन्दी")
    pub native_name: &'static str,

    /// Flag glyph shown next to the name in the switcher
    pub flag: &'static str,

    /// Whether the locale can be selected
    pub enabled: bool,
}

/// Errors raised while building a registry from configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown locale code: '{0}'")]
    UnknownLocale(String),

    #[error("Locale '{0}' is not enabled")]
    Disabled(String),

    #[error("Duplicate locale code: '{0}'")]
    Duplicate(String),
}

/// Immutable registry of supported locales with a designated default.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
    default_code: &'static str,
}

impl LocaleRegistry {
    /// Build a registry from an explicit locale table.
    ///
    /// Fails if a code appears twice or if `default_code` does not name an
    /// enabled locale.
    pub fn new(locales: Vec<LocaleConfig>, default_code: &str) -> Result<Self, RegistryError> {
        for (index, locale) in locales.iter().enumerate() {
            if locales[..index].iter().any(|other| other.code == locale.code) {
                return Err(RegistryError::Duplicate(locale.code.to_string()));
            }
        }

        let default = locales
            .iter()
            .find(|locale| locale.code == default_code)
            .ok_or_else(|| RegistryError::UnknownLocale(default_code.to_string()))?;
        if !default.enabled {
            return Err(RegistryError::Disabled(default_code.to_string()));
        }
        let default_code = default.code;

        Ok(Self {
            locales,
            default_code,
        })
    }

    /// The portal's builtin locales: English (default) and Hindi.
    pub fn builtin() -> Self {
        Self {
            locales: builtin_locales(),
            default_code: "en",
        }
    }

    /// Restrict the enabled set to `codes`.
    ///
    /// Every code must be known, and the current default must remain enabled.
    pub fn with_enabled<S: AsRef<str>>(mut self, codes: &[S]) -> Result<Self, RegistryError> {
        for code in codes {
            if self.get_by_code(code.as_ref()).is_none() {
                return Err(RegistryError::UnknownLocale(code.as_ref().to_string()));
            }
        }

        for locale in &mut self.locales {
            locale.enabled = codes.iter().any(|code| code.as_ref() == locale.code);
        }

        if !self.is_enabled(self.default_code) {
            return Err(RegistryError::Disabled(self.default_code.to_string()));
        }
        Ok(self)
    }

    /// Replace the default locale.
    pub fn with_default(self, code: &str) -> Result<Self, RegistryError> {
        Self::new(self.locales, code)
    }

    /// Get a locale configuration by its code, enabled or not.
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// All enabled locales, in registry order.
    pub fn list_enabled(&self) -> Vec<Locale> {
        self.locales
            .iter()
            .filter(|locale| locale.enabled)
            .map(|config| Locale::from_config(*config))
            .collect()
    }

    /// All locale configurations, including disabled ones.
    pub fn list_all(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().collect()
    }

    /// Check if a code names an enabled locale.
    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|locale| locale.enabled)
            .unwrap_or(false)
    }

    /// The fallback locale used when nothing else selects one.
    pub fn default_locale(&self) -> Locale {
        // `new`/`with_enabled` guarantee the default exists and is enabled
        self.resolve(self.default_code).unwrap_or_else(|| {
            Locale::from_config(LocaleConfig {
                code: self.default_code,
                name: self.default_code,
                native_name: self.default_code,
                flag: "",
                enabled: true,
            })
        })
    }

    /// Turn a code into a [`Locale`] if it is registered and enabled.
    pub fn resolve(&self, code: &str) -> Option<Locale> {
        self.get_by_code(code)
            .filter(|config| config.enabled)
            .map(|config| Locale::from_config(*config))
    }

    /// Pick the best enabled locale for an `Accept-Language` header value.
    ///
    /// Ranges are tried in descending quality; a range matches on its primary
    /// subtag ("hi-IN" selects "hi"). `*` selects the default locale, or the
    /// first enabled locale the header did not refuse with `q=0`.
    pub fn best_match(&self, accept_language: &str) -> Option<Locale> {
        let ranges = parse_accept_language(accept_language);
        let refused: Vec<&str> = ranges
            .iter()
            .filter(|range| range.is_refused())
            .map(|range| range.tag.as_str())
            .collect();

        ranges
            .iter()
            .filter(|range| !range.is_refused())
            .find_map(|range| {
                if range.tag == "*" {
                    return std::iter::once(self.default_locale())
                        .chain(self.list_enabled())
                        .find(|locale| !refused.contains(&locale.code()));
                }
                let primary = range.tag.split('-').next().unwrap_or(&range.tag);
                self.resolve(primary)
            })
    }
}

/// Builtin locale table.
fn builtin_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "en",
            name: "English",
            native_name: "English",
            flag: "🇬🇧",
            enabled: true,
        },
        LocaleConfig {
            code: "hi",
            name: "Hindi",
            native_name: "हिन्दी",
            flag: "🇮🇳",
            enabled: true,
        },
    ]
}
