//! GNU gettext MO file writer, used when compiling PO sources.
//!
//! Reading happens through the `gettext` crate at startup. Layout written
//! here (all integers 32-bit little-endian):
//!
//! | offset | field                                   |
//! |--------|-----------------------------------------|
//! | 0      | magic `0x950412de`                      |
//! | 4      | revision                                |
//! | 8      | number of strings N                     |
//! | 12     | offset of original string table         |
//! | 16     | offset of translation string table      |
//! | 20     | hash table size                         |
//! | 24     | hash table offset                       |
//!
//! Each table holds N `(length, offset)` pairs. Strings are NUL-terminated
//! and the length excludes the terminator. Plural entries join their forms
//! with NUL; context-qualified originals are `context\u{4}msgid`.

use crate::i18n::CatalogError;

pub const MAGIC: u32 = 0x9504_12de;
const HEADER_LEN: usize = 28;

/// A raw original/translation pair as stored in an MO file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoEntry {
    pub original: String,
    pub translation: String,
}

/// Encode entries as a little-endian, revision 0 MO file without a hash table.
///
/// Originals are sorted as gettext requires for its binary-search fallback.
pub fn write(entries: &[MoEntry]) -> Result<Vec<u8>, CatalogError> {
    let mut sorted: Vec<&MoEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.original.as_bytes().cmp(b.original.as_bytes()));

    let count = sorted.len();
    let originals_at = HEADER_LEN;
    let translations_at = originals_at + count * 8;
    let strings_at = translations_at + count * 8;

    let mut original_table = Vec::with_capacity(count * 8);
    let mut translation_table = Vec::with_capacity(count * 8);
    let mut strings = Vec::new();

    for entry in &sorted {
        push_string(&mut original_table, &mut strings, strings_at, &entry.original)?;
    }
    for entry in &sorted {
        push_string(
            &mut translation_table,
            &mut strings,
            strings_at,
            &entry.translation,
        )?;
    }

    let mut out = Vec::with_capacity(strings_at + strings.len());
    for field in [
        MAGIC,
        0,
        to_u32(count)?,
        to_u32(originals_at)?,
        to_u32(translations_at)?,
        0,
        to_u32(strings_at)?,
    ] {
        out.extend_from_slice(&field.to_le_bytes());
    }
    out.extend_from_slice(&original_table);
    out.extend_from_slice(&translation_table);
    out.extend_from_slice(&strings);
    Ok(out)
}

fn push_string(
    table: &mut Vec<u8>,
    strings: &mut Vec<u8>,
    strings_at: usize,
    value: &str,
) -> Result<(), CatalogError> {
    let offset = strings_at + strings.len();
    table.extend_from_slice(&to_u32(value.len())?.to_le_bytes());
    table.extend_from_slice(&to_u32(offset)?.to_le_bytes());
    strings.extend_from_slice(value.as_bytes());
    strings.push(0);
    Ok(())
}

fn to_u32(value: usize) -> Result<u32, CatalogError> {
    u32::try_from(value).map_err(|_| CatalogError::TooLarge)
}
