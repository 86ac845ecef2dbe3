//! Compiled message catalogs.
//!
//! A [`Catalog`] is the read-only lookup table for one locale, built from a
//! compiled MO file. A [`CatalogSet`] holds one catalog per registered locale
//! and is constructed once at startup.

use crate::i18n::mo;
use crate::i18n::po;
use crate::i18n::{CatalogError, Locale, LocaleRegistry};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Gettext domain used for catalog file names.
pub const DOMAIN: &str = "messages";

/// Lookup table for one locale.
///
/// Wraps a [`gettext::Catalog`], which applies the file's `Plural-Forms`
/// rule and context keys. The lookups here report a miss as `None` instead
/// of echoing the source text, so callers can count fallbacks.
pub struct Catalog {
    inner: gettext::Catalog,
}

impl Catalog {
    /// A catalog with no entries: every lookup falls back to the source text.
    pub fn empty() -> Self {
        Self {
            inner: gettext::Catalog::empty(),
        }
    }

    /// Decode a compiled MO file.
    pub fn from_mo_bytes(bytes: &[u8]) -> Result<Self, CatalogError> {
        Ok(Self {
            inner: gettext::Catalog::parse(bytes)?,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_entries(entries: Vec<mo::MoEntry>) -> Result<Self, CatalogError> {
        Self::from_mo_bytes(&mo::write(&entries)?)
    }

    /// Read and decode a compiled MO file from disk.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let bytes = std::fs::read(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_mo_bytes(&bytes)
    }

    /// Singular translation of `msgid`, if one exists and is non-empty.
    pub fn get<'a>(&'a self, msgid: &'a str) -> Option<&'a str> {
        translated(self.inner.gettext(msgid), &[msgid])
    }

    /// Translation of `msgid` in a given context.
    pub fn get_with_context<'a>(&'a self, context: &'a str, msgid: &'a str) -> Option<&'a str> {
        translated(self.inner.pgettext(context, msgid), &[msgid])
    }

    /// Plural translation chosen for `n` by the catalog's plural rule.
    pub fn get_plural<'a>(&'a self, singular: &'a str, plural: &'a str, n: u64) -> Option<&'a str> {
        translated(self.inner.ngettext(singular, plural, n), &[singular, plural])
    }
}

/// `gettext` answers a miss with the very source slice it was given; tell
/// that apart from a stored translation that happens to read the same.
fn translated<'a>(result: &'a str, sources: &[&str]) -> Option<&'a str> {
    let echoed = sources.iter().any(|source| std::ptr::eq(result, *source));
    Some(result).filter(|text| !echoed && !text.is_empty())
}

/// Path of a locale's compiled catalog under the translations root.
pub fn mo_path(root: &Path, code: &str) -> PathBuf {
    root.join(code).join("LC_MESSAGES").join(format!("{}.mo", DOMAIN))
}

/// Path of a locale's PO source under the translations root.
pub fn po_path(root: &Path, code: &str) -> PathBuf {
    root.join(code).join("LC_MESSAGES").join(format!("{}.po", DOMAIN))
}

/// Summary of one PO → MO compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileSummary {
    /// Entries written (header excluded)
    pub compiled: usize,
    pub fuzzy: usize,
    pub untranslated: usize,
}

/// Compile a PO file into an MO file next to it.
pub fn compile_file(po_file: &Path, mo_file: &Path) -> Result<CompileSummary, CatalogError> {
    let source = std::fs::read_to_string(po_file).map_err(|source| CatalogError::Io {
        path: po_file.to_path_buf(),
        source,
    })?;
    let entries = po::parse(&source)?;

    let compiled = po::compile(&entries);
    let bytes = mo::write(&compiled)?;
    // Reject a broken Plural-Forms header now rather than at server startup
    Catalog::from_mo_bytes(&bytes)?;

    std::fs::write(mo_file, bytes).map_err(|source| CatalogError::Io {
        path: mo_file.to_path_buf(),
        source,
    })?;

    let messages: Vec<_> = entries.iter().filter(|entry| !entry.is_header()).collect();
    Ok(CompileSummary {
        compiled: compiled.iter().filter(|entry| !entry.original.is_empty()).count(),
        fuzzy: messages.iter().filter(|entry| entry.fuzzy).count(),
        untranslated: messages
            .iter()
            .filter(|entry| !entry.fuzzy && !entry.is_translated())
            .count(),
    })
}

/// One catalog per enabled locale, shared read-only for the process lifetime.
#[derive(Default)]
pub struct CatalogSet {
    catalogs: HashMap<&'static str, Catalog>,
}

impl CatalogSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `<root>/<code>/LC_MESSAGES/messages.mo` for every enabled locale.
    ///
    /// A missing file leaves that locale with an empty catalog so pages still
    /// render (in source text). An unreadable or corrupt file is an error.
    pub fn load(registry: &LocaleRegistry, root: &Path) -> Result<Self, CatalogError> {
        let mut set = Self::new();

        for locale in registry.list_enabled() {
            let path = mo_path(root, locale.code());
            if !path.exists() {
                warn!(
                    "No compiled catalog for '{}' at {}, using source strings",
                    locale.code(),
                    path.display()
                );
                set.insert(locale, Catalog::empty());
                continue;
            }

            let catalog = Catalog::load(&path)?;
            info!("Loaded catalog for '{}' from {}", locale.code(), path.display());
            set.insert(locale, catalog);
        }

        Ok(set)
    }

    pub fn insert(&mut self, locale: Locale, catalog: Catalog) {
        self.catalogs.insert(locale.code(), catalog);
    }

    pub fn get(&self, locale: Locale) -> Option<&Catalog> {
        self.catalogs.get(locale.code())
    }

    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}
