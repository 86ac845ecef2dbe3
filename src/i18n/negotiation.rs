//! `Accept-Language` header parsing.

/// One language range from an `Accept-Language` header.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageRange {
    /// Lowercased language tag, e.g. "hi-in" or "*"
    pub tag: String,

    /// Quality weight in `0.0..=1.0`
    pub quality: f32,
}

impl LanguageRange {
    /// Whether the client explicitly refused this range (`q=0`).
    pub fn is_refused(&self) -> bool {
        self.quality <= 0.0
    }
}

/// Parse an `Accept-Language` value into ranges ordered by descending quality.
///
/// A missing weight counts as `1.0`. Ranges whose weight is not a finite
/// number are ignored. Refusals (`q=0`) are kept and sort last; ties keep
/// header order.
pub fn parse_accept_language(value: &str) -> Vec<LanguageRange> {
    let mut ranges: Vec<LanguageRange> = value
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let tag = pieces.next()?.trim();
            if tag.is_empty() {
                return None;
            }

            let weight = pieces
                .filter_map(|param| param.trim().strip_prefix("q="))
                .next();
            let quality = match weight {
                Some(raw) => raw
                    .trim()
                    .parse::<f32>()
                    .ok()
                    .filter(|q| q.is_finite())?
                    .clamp(0.0, 1.0),
                None => 1.0,
            };

            Some(LanguageRange {
                tag: tag.to_ascii_lowercase(),
                quality,
            })
        })
        .collect();

    // sort_by is stable, so equal weights keep their header order
    ranges.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    ranges
}
