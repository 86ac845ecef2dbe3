//! Catalog compiler - turns every locale's `messages.po` into `messages.mo`
//!
//! Usage:
//!   cargo run --bin compile-catalogs                 # Uses TRANSLATIONS_DIR or ./translations
//!   cargo run --bin compile-catalogs -- path/to/dir  # Explicit catalog root
//!
//! Each catalog is validated before it is written: a translation that drops
//! or invents a placeholder fails the run. Markup differences and entries
//! missing relative to the default locale are reported as warnings.
//!
//! Optional:
//! - DEFAULT_LOCALE (defaults to en)
//! - SUPPORTED_LOCALES (defaults to all builtin locales)

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use teachers_portal_i18n::config::Config;
use teachers_portal_i18n::i18n::catalog::{compile_file, mo_path, po_path};
use teachers_portal_i18n::i18n::po::{self, PoEntry};
use teachers_portal_i18n::i18n::{CatalogValidator, Locale};
use tracing::{error, info, warn};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("compile_catalogs=info".parse()?)
                .add_directive("teachers_portal_i18n=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.translations_dir.clone());
    let registry = config.locale_registry()?;

    info!("Compiling catalogs under {}", root.display());

    let default_locale = registry.default_locale();
    let reference = read_entries(&root, default_locale)?;

    let mut failed = Vec::new();
    for locale in registry.list_enabled() {
        let po_file = po_path(&root, locale.code());
        if !po_file.exists() {
            warn!("[{}] No catalog at {}, skipping", locale, po_file.display());
            continue;
        }

        let entries = read_entries(&root, locale)?;
        let mut report = CatalogValidator::validate_entries(&entries);
        if locale != default_locale {
            let coverage = CatalogValidator::coverage(&reference, &entries);
            report.warnings.extend(coverage.warnings);
        }

        for warning in &report.warnings {
            warn!("[{}] {}", locale, warning);
        }
        if report.has_errors() {
            for error in &report.errors {
                error!("[{}] {}", locale, error);
            }
            failed.push(locale.code());
            continue;
        }

        let mo_file = mo_path(&root, locale.code());
        let summary = compile_file(&po_file, &mo_file)
            .with_context(|| format!("Failed to compile {}", po_file.display()))?;
        info!(
            "[{}] Wrote {} ({} compiled, {} fuzzy, {} untranslated)",
            locale,
            mo_file.display(),
            summary.compiled,
            summary.fuzzy,
            summary.untranslated
        );
    }

    if !failed.is_empty() {
        bail!("Validation failed for: {}", failed.join(", "));
    }

    info!("All catalogs compiled");
    Ok(())
}

/// Parsed entries of a locale's PO file; empty when the file does not exist.
fn read_entries(root: &Path, locale: Locale) -> Result<Vec<PoEntry>> {
    let path = po_path(root, locale.code());
    if !path.exists() {
        return Ok(Vec::new());
    }
    let source =
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    po::parse(&source).with_context(|| format!("Failed to parse {}", path.display()))
}
