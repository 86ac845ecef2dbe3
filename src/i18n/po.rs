//! Gettext PO source files: the human-editable side of a catalog.
//!
//! Supports `msgctxt`, `msgid`, `msgid_plural`, `msgstr`, `msgstr[N]`,
//! continuation lines, C escapes and the `#, fuzzy` flag. Obsolete entries
//! (`#~`) and all other comments are skipped.

use crate::i18n::mo::MoEntry;
use crate::i18n::CatalogError;

/// Separator between context and msgid in compiled keys.
pub const CONTEXT_SEPARATOR: char = '\u{4}';

/// One entry of a PO file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoEntry {
    pub context: Option<String>,
    pub msgid: String,
    pub msgid_plural: Option<String>,
    /// One element for singular entries, one per plural form otherwise
    pub msgstr: Vec<String>,
    pub fuzzy: bool,
}

impl PoEntry {
    /// The header entry has an empty msgid and no context.
    pub fn is_header(&self) -> bool {
        self.msgid.is_empty() && self.context.is_none()
    }

    /// Whether any translated form is non-empty.
    pub fn is_translated(&self) -> bool {
        self.msgstr.iter().any(|form| !form.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Context,
    Id,
    IdPlural,
    Str(usize),
}

#[derive(Default)]
struct Pending {
    entry: PoEntry,
    has_id: bool,
    has_str: bool,
    field: Option<Field>,
    start_line: usize,
}

impl Pending {
    fn is_empty(&self) -> bool {
        !self.has_id && self.entry.context.is_none()
    }

    fn append(&mut self, field: Field, text: &str) {
        let slot = match field {
            Field::Context => self.entry.context.get_or_insert_with(String::new),
            Field::Id => &mut self.entry.msgid,
            Field::IdPlural => self.entry.msgid_plural.get_or_insert_with(String::new),
            Field::Str(index) => {
                if self.entry.msgstr.len() <= index {
                    self.entry.msgstr.resize(index + 1, String::new());
                }
                &mut self.entry.msgstr[index]
            }
        };
        slot.push_str(text);
    }
}

/// Parse PO source text into entries, header first if present.
pub fn parse(source: &str) -> Result<Vec<PoEntry>, CatalogError> {
    let mut entries = Vec::new();
    let mut pending = Pending::default();
    let mut fuzzy_flag = false;

    for (index, raw_line) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();

        if line.is_empty() {
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            // A comment after msgstr starts the next entry
            if pending.has_str {
                finish(&mut pending, &mut entries)?;
            }
            if let Some(flags) = comment.strip_prefix(',') {
                if flags.split(',').any(|flag| flag.trim() == "fuzzy") {
                    fuzzy_flag = true;
                }
            }
            continue;
        }

        if line.starts_with('"') {
            let field = pending.field.ok_or_else(|| CatalogError::Syntax {
                line: line_no,
                message: "string continuation without a keyword".to_string(),
            })?;
            let text = unquote(line, line_no)?;
            pending.append(field, &text);
            continue;
        }

        let (keyword, rest) = line
            .split_once(|c: char| c.is_whitespace())
            .ok_or_else(|| CatalogError::Syntax {
                line: line_no,
                message: format!("expected a keyword and a string, got '{}'", line),
            })?;
        let field = parse_keyword(keyword, line_no)?;

        if matches!(field, Field::Context | Field::Id) && pending.has_str {
            finish(&mut pending, &mut entries)?;
        }

        match field {
            Field::Context => {
                if pending.has_id {
                    return Err(CatalogError::Syntax {
                        line: line_no,
                        message: "msgctxt must come before msgid".to_string(),
                    });
                }
            }
            Field::Id => {
                if pending.has_id {
                    return Err(CatalogError::Syntax {
                        line: line_no,
                        message: "msgid without msgstr".to_string(),
                    });
                }
                pending.has_id = true;
            }
            Field::IdPlural | Field::Str(_) => {
                if !pending.has_id {
                    return Err(CatalogError::Syntax {
                        line: line_no,
                        message: format!("{} before msgid", keyword),
                    });
                }
                if let Field::Str(_) = field {
                    pending.has_str = true;
                }
            }
        }

        if pending.start_line == 0 {
            pending.start_line = line_no;
            pending.entry.fuzzy = fuzzy_flag;
            fuzzy_flag = false;
        }

        let text = unquote(rest.trim(), line_no)?;
        pending.append(field, &text);
        pending.field = Some(field);
    }

    finish(&mut pending, &mut entries)?;
    Ok(entries)
}

fn parse_keyword(keyword: &str, line: usize) -> Result<Field, CatalogError> {
    match keyword {
        "msgctxt" => Ok(Field::Context),
        "msgid" => Ok(Field::Id),
        "msgid_plural" => Ok(Field::IdPlural),
        "msgstr" => Ok(Field::Str(0)),
        other => other
            .strip_prefix("msgstr[")
            .and_then(|rest| rest.strip_suffix(']'))
            .and_then(|index| index.parse().ok())
            .map(Field::Str)
            .ok_or_else(|| CatalogError::Syntax {
                line,
                message: format!("unknown keyword '{}'", other),
            }),
    }
}

fn finish(pending: &mut Pending, entries: &mut Vec<PoEntry>) -> Result<(), CatalogError> {
    let done = std::mem::take(pending);
    if done.is_empty() {
        return Ok(());
    }
    if !done.has_str {
        return Err(CatalogError::Syntax {
            line: done.start_line,
            message: "entry has no msgstr".to_string(),
        });
    }
    entries.push(done.entry);
    Ok(())
}

/// Strip the surrounding quotes and resolve C escapes.
fn unquote(text: &str, line: usize) -> Result<String, CatalogError> {
    let inner = text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| CatalogError::Syntax {
            line,
            message: format!("expected a quoted string, got '{}'", text),
        })?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                return Err(CatalogError::Syntax {
                    line,
                    message: format!("unknown escape '\\{}'", other),
                })
            }
            None => {
                return Err(CatalogError::Syntax {
                    line,
                    message: "dangling backslash".to_string(),
                })
            }
        }
    }
    Ok(out)
}

/// Look up a `Name: value` field in a header entry's msgstr.
pub fn header_field<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim())
    })
}

/// Convert parsed entries into the raw MO pairs that get written to disk.
///
/// Fuzzy and untranslated entries are dropped so that lookups fall back to
/// the source text; the header is always kept.
pub fn compile(entries: &[PoEntry]) -> Vec<MoEntry> {
    entries
        .iter()
        .filter(|entry| entry.is_header() || (!entry.fuzzy && entry.is_translated()))
        .map(|entry| {
            let mut original = match &entry.context {
                Some(context) => format!("{}{}{}", context, CONTEXT_SEPARATOR, entry.msgid),
                None => entry.msgid.clone(),
            };
            if let Some(plural) = &entry.msgid_plural {
                original.push('\0');
                original.push_str(plural);
            }
            MoEntry {
                original,
                translation: entry.msgstr.join("\0"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"# Hindi translations for the Teachers Portal.
msgid ""
msgstr ""
"Language: hi\n"
"Plural-Forms: nplurals=2; plural=(n > 1);\n"

#: templates/index.html:3
msgid "Language"
msgstr "भाषा"

#, fuzzy
msgid "Logout"
msgstr "लॉग आउट"

msgctxt "navigation"
msgid "Home"
msgstr "मुख्य पृष्ठ"

msgid "%(num)d language available"
msgid_plural "%(num)d languages available"
msgstr[0] "%(num)d भाषा उपलब्ध है"
msgstr[1] "%(num)d भाषाएँ उपलब्ध हैं"

msgid "Untranslated"
msgstr ""

msgid ""
"Multi "
"line"
msgstr "Tab\there \"quoted\""
"#;

    // ==================== Parsing Tests ====================

    #[test]
    fn test_parse_sample_entry_count() {
        let entries = parse(SAMPLE).unwrap();
        assert_eq!(entries.len(), 7);
        assert!(entries[0].is_header());
    }

    #[test]
    fn test_parse_header_plural_forms() {
        let entries = parse(SAMPLE).unwrap();
        let header = &entries[0].msgstr[0];
        assert_eq!(
            header_field(header, "plural-forms"),
            Some("nplurals=2; plural=(n > 1);")
        );
        assert_eq!(header_field(header, "Language"), Some("hi"));
        assert_eq!(header_field(header, "Missing"), None);
    }

    #[test]
    fn test_parse_fuzzy_flag_applies_to_next_entry_only() {
        let entries = parse(SAMPLE).unwrap();
        assert!(!entries[1].fuzzy);
        assert_eq!(entries[2].msgid, "Logout");
        assert!(entries[2].fuzzy);
        assert!(!entries[3].fuzzy);
    }

    #[test]
    fn test_parse_context() {
        let entries = parse(SAMPLE).unwrap();
        assert_eq!(entries[3].context.as_deref(), Some("navigation"));
        assert_eq!(entries[3].msgid, "Home");
    }

    #[test]
    fn test_parse_plural_forms() {
        let entries = parse(SAMPLE).unwrap();
        let plural = &entries[4];
        assert_eq!(
            plural.msgid_plural.as_deref(),
            Some("%(num)d languages available")
        );
        assert_eq!(plural.msgstr.len(), 2);
        assert_eq!(plural.msgstr[1], "%(num)d भाषाएँ उपलब्ध हैं");
    }

    #[test]
    fn test_parse_continuation_and_escapes() {
        let entries = parse(SAMPLE).unwrap();
        let last = entries.last().unwrap();
        assert_eq!(last.msgid, "Multi line");
        assert_eq!(last.msgstr[0], "Tab\there \"quoted\"");
    }

    #[test]
    fn test_parse_skips_obsolete_entries() {
        let source = "#~ msgid \"Old\"\n#~ msgstr \"Purana\"\nmsgid \"New\"\nmsgstr \"Naya\"\n";
        let entries = parse(source).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].msgid, "New");
    }

    // ==================== Error Tests ====================

    #[test]
    fn test_parse_rejects_msgid_without_msgstr() {
        let result = parse("msgid \"a\"\nmsgid \"b\"\nmsgstr \"\"\n");
        assert!(matches!(result, Err(CatalogError::Syntax { line: 2, .. })));
    }

    #[test]
    fn test_parse_rejects_trailing_msgid() {
        let result = parse("msgid \"a\"\n");
        assert!(matches!(result, Err(CatalogError::Syntax { line: 1, .. })));
    }

    #[test]
    fn test_parse_rejects_unknown_keyword() {
        let result = parse("msgfoo \"a\"\n");
        assert!(matches!(result, Err(CatalogError::Syntax { line: 1, .. })));
    }

    #[test]
    fn test_parse_rejects_unquoted_string() {
        let result = parse("msgid a\nmsgstr \"b\"\n");
        assert!(matches!(result, Err(CatalogError::Syntax { line: 1, .. })));
    }

    #[test]
    fn test_parse_rejects_orphan_continuation() {
        let result = parse("\"dangling\"\n");
        assert!(matches!(result, Err(CatalogError::Syntax { line: 1, .. })));
    }

    #[test]
    fn test_parse_rejects_unknown_escape() {
        let result = parse("msgid \"a\\q\"\nmsgstr \"\"\n");
        assert!(matches!(result, Err(CatalogError::Syntax { line: 1, .. })));
    }

    // ==================== Compile Tests ====================

    #[test]
    fn test_compile_drops_fuzzy_and_untranslated() {
        let entries = parse(SAMPLE).unwrap();
        let compiled = compile(&entries);
        let originals: Vec<_> = compiled.iter().map(|e| e.original.as_str()).collect();
        assert!(originals.contains(&""));
        assert!(originals.contains(&"Language"));
        assert!(!originals.contains(&"Logout"));
        assert!(!originals.contains(&"Untranslated"));
    }

    #[test]
    fn test_compile_encodes_context_and_plurals() {
        let entries = parse(SAMPLE).unwrap();
        let compiled = compile(&entries);
        assert!(compiled
            .iter()
            .any(|e| e.original == "navigation\u{4}Home" && e.translation == "मुख्य पृष्ठ"));
        assert!(compiled.iter().any(|e| e.original
            == "%(num)d language available\0%(num)d languages available"
            && e.translation == "%(num)d भाषा उपलब्ध है\0%(num)d भाषाएँ उपलब्ध हैं"));
    }
}
