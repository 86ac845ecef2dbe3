//! Locale type: a language code that has been validated against the registry.

use crate::i18n::LocaleConfig;
use std::fmt;

/// A validated locale.
///
/// Only the registry hands these out, so a `Locale` always names a
/// registered, enabled language. It carries its display metadata so that
/// rendering code does not need the registry at hand.
#[derive(Debug, Clone, Copy)]
pub struct Locale {
    config: LocaleConfig,
}

impl Locale {
    pub(crate) fn from_config(config: LocaleConfig) -> Self {
        Self { config }
    }

    /// Language code (e.g., "en", "hi").
    pub fn code(&self) -> &'static str {
        self.config.code
    }

    /// English name of the language.
    pub fn name(&self) -> &'static str {
        self.config.name
    }

    /// Name of the language in its own script.
    pub fn native_name(&self) -> &'static str {
        self.config.native_name
    }

    /// Flag glyph for the switcher.
    pub fn flag(&self) -> &'static str {
        self.config.flag
    }
}

impl PartialEq for Locale {
    fn eq(&self, other: &Self) -> bool {
        self.config.code == other.config.code
    }
}

impl Eq for Locale {}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config.code)
    }
}
