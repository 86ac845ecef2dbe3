//! The translation function.
//!
//! [`Translator`] bundles the locale registry with the loaded catalogs. It is
//! built once at startup and shared behind an `Arc`. Lookups never fail: a
//! missing catalog, missing entry or empty translation returns the source
//! text unchanged so a page always renders.

use crate::i18n::{Catalog, CatalogSet, Locale, LocaleRegistry, TranslationMetrics};

pub struct Translator {
    registry: LocaleRegistry,
    catalogs: CatalogSet,
    metrics: TranslationMetrics,
}

impl Translator {
    pub fn new(registry: LocaleRegistry, catalogs: CatalogSet) -> Self {
        Self {
            registry,
            catalogs,
            metrics: TranslationMetrics::new(),
        }
    }

    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &TranslationMetrics {
        &self.metrics
    }

    /// Resolve the active locale.
    ///
    /// Order: `explicit` (if it names an enabled locale), then the session's
    /// stored locale, then the registry default.
    pub fn resolve_locale(&self, explicit: Option<&str>, session: Option<Locale>) -> Locale {
        explicit
            .and_then(|code| self.registry.resolve(code))
            .or(session)
            .unwrap_or_else(|| self.registry.default_locale())
    }

    /// Translate `text`, resolving the locale from an optional explicit
    /// override and the session's preference.
    pub fn translate<'a>(
        &'a self,
        text: &'a str,
        explicit: Option<&str>,
        session: Option<Locale>,
    ) -> &'a str {
        self.gettext(self.resolve_locale(explicit, session), text)
    }

    /// Singular lookup in a known locale.
    pub fn gettext<'a>(&'a self, locale: Locale, text: &'a str) -> &'a str {
        let found = self.catalog(locale).and_then(|catalog| catalog.get(text));
        self.record(found, text)
    }

    /// Plural lookup; without a translation English rules pick the source form.
    pub fn ngettext<'a>(
        &'a self,
        locale: Locale,
        singular: &'a str,
        plural: &'a str,
        n: u64,
    ) -> &'a str {
        let found = self
            .catalog(locale)
            .and_then(|catalog| catalog.get_plural(singular, plural, n));
        let source = if n == 1 { singular } else { plural };
        self.record(found, source)
    }

    /// Context-qualified lookup for source strings that need disambiguation.
    pub fn pgettext<'a>(&'a self, locale: Locale, context: &'a str, text: &'a str) -> &'a str {
        let found = self
            .catalog(locale)
            .and_then(|catalog| catalog.get_with_context(context, text));
        self.record(found, text)
    }

    /// A translation handle bound to one locale, for the rendering layer.
    pub fn localizer(&self, locale: Locale) -> Localizer<'_> {
        Localizer {
            translator: self,
            locale,
        }
    }

    fn catalog(&self, locale: Locale) -> Option<&Catalog> {
        self.catalogs.get(locale)
    }

    fn record<'a>(&self, found: Option<&'a str>, source: &'a str) -> &'a str {
        match found {
            Some(translated) => {
                self.metrics.record_hit();
                translated
            }
            None => {
                self.metrics.record_fallback();
                source
            }
        }
    }
}

/// Request-scoped translation context: the translator plus the active locale.
///
/// Templates take a `Localizer` instead of reading the session themselves.
#[derive(Clone, Copy)]
pub struct Localizer<'a> {
    translator: &'a Translator,
    locale: Locale,
}

impl<'a> Localizer<'a> {
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Translate a string.
    pub fn t(&self, text: &'a str) -> &'a str {
        self.translator.gettext(self.locale, text)
    }

    /// Translate a string with plural forms.
    pub fn tn(&self, singular: &'a str, plural: &'a str, n: u64) -> &'a str {
        self.translator.ngettext(self.locale, singular, plural, n)
    }

    /// Translate a string in a context.
    pub fn tp(&self, context: &'a str, text: &'a str) -> &'a str {
        self.translator.pgettext(self.locale, context, text)
    }
}
