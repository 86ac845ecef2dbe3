//! Internationalization (i18n) for the Teachers Portal.
//!
//! All locale handling, catalog loading and translation lookup lives here.
//!
//! # Architecture
//!
//! - `registry`: the supported locales and their display metadata
//! - `locale`: validated `Locale` values handed out by the registry
//! - `negotiation`: `Accept-Language` parsing
//! - `po` / `mo`: gettext source parsing and compiled catalog writing
//! - `catalog`: per-locale lookup tables loaded at startup (via `gettext`)
//! - `translator`: the translation function and the request-scoped `Localizer`
//! - `validator`: placeholder/markup checks run when compiling catalogs
//! - `metrics`: hit/fallback and locale switch counters
//!
//! # Example
//!
//! ```rust,ignore
//! use teachers_portal_i18n::i18n::{CatalogSet, LocaleRegistry, Translator};
//!
//! let registry = LocaleRegistry::builtin();
//! let catalogs = CatalogSet::load(&registry, Path::new("translations"))?;
//! let translator = Translator::new(registry, catalogs);
//!
//! let hindi = translator.registry().resolve("hi");
//! let text = translator.translate("Language", None, hindi);
//! ```

pub mod catalog;
mod error;
mod locale;
mod metrics;
pub mod mo;
mod negotiation;
pub mod po;
mod registry;
mod translator;
mod validator;

pub use catalog::{Catalog, CatalogSet, CompileSummary};
pub use error::CatalogError;
pub use locale::Locale;
pub use metrics::{MetricsReport, TranslationMetrics};
pub use negotiation::{parse_accept_language, LanguageRange};
pub use registry::{LocaleConfig, LocaleRegistry, RegistryError};
pub use translator::{Localizer, Translator};
pub use validator::{CatalogValidator, ValidationReport};
