//! Catalog quality validation.
//!
//! Checks that translations keep the interpolation placeholders and markup of
//! their source strings, and reports coverage gaps between locales. Used by
//! the catalog compiler before writing MO files.

use crate::i18n::po::PoEntry;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that would break rendering (e.g., a lost placeholder)
    pub errors: Vec<String>,

    /// Non-critical issues (e.g., markup differences, missing entries)
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }

    fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for catalog translations.
pub struct CatalogValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

impl CatalogValidator {
    /// Validate one translated string against its source.
    ///
    /// - Placeholders (`%(name)s`, `%d`, `{name}`) must match exactly: a lost
    ///   or invented placeholder is an error.
    /// - HTML tag names should match: differences are warnings.
    pub fn validate_entry(msgid: &str, msgstr: &str) -> ValidationReport {
        let mut report = ValidationReport::new();
        if msgstr.is_empty() {
            return report;
        }

        let orig_placeholders = Self::extract_placeholders(msgid);
        let trans_placeholders = Self::extract_placeholders(msgstr);
        if orig_placeholders != trans_placeholders {
            report.errors.push(format!(
                "Placeholder mismatch in '{}': source has {:?}, translation has {:?}",
                msgid, orig_placeholders, trans_placeholders
            ));
        }

        let orig_tags = Self::extract_tags(msgid);
        let trans_tags = Self::extract_tags(msgstr);
        if orig_tags != trans_tags {
            report.warnings.push(format!(
                "Markup mismatch in '{}': source has {:?}, translation has {:?}",
                msgid, orig_tags, trans_tags
            ));
        }

        report
    }

    /// Validate every compiled (non-fuzzy, non-header) entry of a PO file.
    ///
    /// Plural form 0 is compared with `msgid`, the remaining forms with
    /// `msgid_plural`.
    pub fn validate_entries(entries: &[PoEntry]) -> ValidationReport {
        let mut report = ValidationReport::new();

        for entry in entries.iter().filter(|e| !e.is_header() && !e.fuzzy) {
            for (index, form) in entry.msgstr.iter().enumerate() {
                let source = match (&entry.msgid_plural, index) {
                    (Some(plural), 1..) => plural.as_str(),
                    _ => entry.msgid.as_str(),
                };
                report.merge(Self::validate_entry(source, form));
            }
        }

        report
    }

    /// Report msgids present in `reference` but missing or untranslated in `target`.
    pub fn coverage(reference: &[PoEntry], target: &[PoEntry]) -> ValidationReport {
        let mut report = ValidationReport::new();
        let translated: HashSet<(Option<&str>, &str)> = target
            .iter()
            .filter(|e| !e.fuzzy && e.is_translated())
            .map(|e| (e.context.as_deref(), e.msgid.as_str()))
            .collect();

        for entry in reference.iter().filter(|e| !e.is_header()) {
            if !translated.contains(&(entry.context.as_deref(), entry.msgid.as_str())) {
                report
                    .warnings
                    .push(format!("Missing translation for '{}'", entry.msgid));
            }
        }

        report
    }

    /// Extract interpolation placeholders, sorted
    fn extract_placeholders(text: &str) -> Vec<String> {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| {
            Regex::new(r"%\([A-Za-z_][A-Za-z0-9_]*\)[sdifr]|%[sdif]|\{[A-Za-z0-9_]*\}")
                .expect("placeholder regex is valid")
        });

        let mut found: Vec<String> = regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();
        found.sort();
        found
    }

    /// Extract lowercased HTML tag names (opening and closing), sorted
    fn extract_tags(text: &str) -> Vec<String> {
        let regex = TAG_REGEX.get_or_init(|| {
            Regex::new(r"</?([A-Za-z][A-Za-z0-9]*)").expect("tag regex is valid")
        });

        let mut found: Vec<String> = regex
            .find_iter(text)
            .map(|m| m.as_str().to_ascii_lowercase())
            .collect();
        found.sort();
        found
    }
}
