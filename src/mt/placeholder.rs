//! Placeholder masking and restoration
//!
//! Curly-brace placeholders (`{name}`, `{0}`, `{count}`) must reach the translated
//! text byte-for-byte. Before a string is sent to a provider every placeholder
//! occurrence is replaced by an ordinal marker that a translation engine leaves
//! alone; after translation the markers are located and swapped back.
//!
//! # Example
//!
//! ```ignore
//! Source:      "Hello {name}, you have {count} new {count}"
//! Masked:      "Hello __PH0__, you have __PH1__ new __PH2__"
//! Translated:  "__PH0__, आपके पास __PH1__ नए __PH2__ हैं"
//! Restored:    "{name}, आपके पास {count} नए {count} हैं"
//! ```
//!
//! Each occurrence gets its own marker, even when the same token text repeats.
//! Restoration is strict: every marker must be present in the translation,
//! otherwise the round trip is reported as a [`MtError::MarkerError`].

use super::error::{MtError, MtResult};
use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]+\}").expect("placeholder pattern is valid"));

/// The compiled `{...}` placeholder pattern
pub fn placeholder_regex() -> &'static Regex {
    &PLACEHOLDER
}

/// A placeholder occurrence found in source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Zero-based position of this occurrence among all occurrences
    pub ordinal: usize,
    /// The literal token text, braces included
    pub token: String,
    /// Byte offset where the token starts
    pub start: usize,
    /// Byte offset just past the token
    pub end: usize,
}

/// Collect every placeholder occurrence, left to right
///
/// # Example
/// ```ignore
/// let found = find_placeholders("{a} and {a}");
/// assert_eq!(found.len(), 2);
/// assert_eq!(found[1].start, 8);
/// ```
pub fn find_placeholders(text: &str) -> Vec<Placeholder> {
    PLACEHOLDER
        .find_iter(text)
        .enumerate()
        .map(|(ordinal, m)| Placeholder {
            ordinal,
            token: m.as_str().to_string(),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

/// A marker standing in for one placeholder occurrence while the text is translated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub ordinal: usize,
    /// The original placeholder text to put back
    pub token: String,
    /// The sentinel string sent to the provider
    pub marker: String,
}

/// Source text with its placeholders swapped for markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedText {
    pub text: String,
    pub markers: Vec<Marker>,
}

impl MaskedText {
    pub fn has_markers(&self) -> bool {
        !self.markers.is_empty()
    }
}

/// Pick a marker fence that does not occur anywhere in `text`
///
/// Markers look like `__PH{n}__`. If the source already contains `__PH`, the
/// underscore run is lengthened until the prefix is absent, so a marker can
/// never be confused with text the author wrote.
fn marker_fence(text: &str) -> String {
    let mut fence = "__".to_string();
    while text.contains(&format!("{}PH", fence)) {
        fence.push('_');
    }
    fence
}

/// Replace each placeholder occurrence with its ordinal marker
///
/// # Arguments
/// * `text` - Source text that may contain `{...}` placeholders
///
/// # Returns
/// The masked text and the markers in source order. Text without placeholders
/// is returned as-is with an empty marker list.
pub fn mask_placeholders(text: &str) -> MaskedText {
    let placeholders = find_placeholders(text);
    if placeholders.is_empty() {
        return MaskedText {
            text: text.to_string(),
            markers: Vec::new(),
        };
    }

    let fence = marker_fence(text);
    let mut masked = String::with_capacity(text.len() + placeholders.len() * 8);
    let mut markers = Vec::with_capacity(placeholders.len());
    let mut cursor = 0;

    for placeholder in placeholders {
        let marker = format!("{fence}PH{}{fence}", placeholder.ordinal);
        masked.push_str(&text[cursor..placeholder.start]);
        masked.push_str(&marker);
        cursor = placeholder.end;
        markers.push(Marker {
            ordinal: placeholder.ordinal,
            token: placeholder.token,
            marker,
        });
    }
    masked.push_str(&text[cursor..]);

    MaskedText {
        text: masked,
        markers,
    }
}

/// A marker found in translated text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedMarker {
    pub ordinal: usize,
    pub position: usize,
    pub length: usize,
}

/// Find every occurrence of every marker in `text`
///
/// Returns the occurrences sorted by position. Fails when a marker is missing
/// (dropped or altered by the provider) or when two matches overlap, which only
/// happens when the provider damaged the fences between adjacent markers.
pub fn locate_markers(text: &str, markers: &[Marker]) -> MtResult<Vec<LocatedMarker>> {
    let mut located = Vec::new();
    let mut missing = Vec::new();

    for marker in markers {
        let before = located.len();
        for (position, _) in text.match_indices(&marker.marker) {
            located.push(LocatedMarker {
                ordinal: marker.ordinal,
                position,
                length: marker.marker.len(),
            });
        }
        if located.len() == before {
            missing.push(marker.marker.clone());
        }
    }

    if !missing.is_empty() {
        return Err(MtError::MarkerError(format!(
            "Markers missing from translation: {:?}",
            missing
        )));
    }

    located.sort_by_key(|m| m.position);

    for pair in located.windows(2) {
        if pair[0].position + pair[0].length > pair[1].position {
            return Err(MtError::MarkerError(format!(
                "Overlapping markers at byte {} in translation",
                pair[1].position
            )));
        }
    }

    Ok(located)
}

/// True when the markers no longer appear in source order
///
/// Word-order changes in the target language move placeholders around; that is
/// legitimate and only worth a debug line.
pub fn detect_marker_reordering(located: &[LocatedMarker]) -> bool {
    located.windows(2).any(|pair| pair[0].ordinal > pair[1].ordinal)
}

/// Outcome of putting placeholders back into translated text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreResult {
    pub text: String,
    pub reordering_detected: bool,
}

/// Replace every marker in `translated` with its original placeholder token
///
/// # Arguments
/// * `translated` - Provider output for the masked text
/// * `markers` - The markers produced by [`mask_placeholders`]
///
/// # Returns
/// * `Ok(RestoreResult)` - Text with all markers swapped back
/// * `Err(MtError::MarkerError)` - If any marker is missing or damaged
///
/// # Example
/// ```ignore
/// let masked = mask_placeholders("Hello {name}!");
/// let restored = restore_placeholders("X __PH0__!", &masked.markers)?;
/// assert_eq!(restored.text, "X {name}!");
/// ```
pub fn restore_placeholders(translated: &str, markers: &[Marker]) -> MtResult<RestoreResult> {
    let located = locate_markers(translated, markers)?;
    let reordering_detected = detect_marker_reordering(&located);

    let mut restored = translated.to_string();
    // Back to front so earlier offsets stay valid
    for found in located.iter().rev() {
        let token = &markers
            .iter()
            .find(|m| m.ordinal == found.ordinal)
            .ok_or_else(|| {
                MtError::MarkerError(format!("Unknown marker ordinal {}", found.ordinal))
            })?
            .token;
        restored.replace_range(found.position..found.position + found.length, token);
    }

    Ok(RestoreResult {
        text: restored,
        reordering_detected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_placeholders_in_order() {
        let found = find_placeholders("Hi {first} {last}, {first}!");
        let tokens: Vec<&str> = found.iter().map(|p| p.token.as_str()).collect();
        assert_eq!(tokens, vec!["{first}", "{last}", "{first}"]);
        assert_eq!(found[2].ordinal, 2);
    }

    #[test]
    fn test_empty_braces_are_not_placeholders() {
        assert!(find_placeholders("a {} b").is_empty());
        assert!(find_placeholders("no braces").is_empty());
    }

    #[test]
    fn test_mask_uses_one_marker_per_occurrence() {
        let masked = mask_placeholders("{a} and {a}");
        assert_eq!(masked.text, "__PH0__ and __PH1__");
        assert_eq!(masked.markers.len(), 2);
        assert_eq!(masked.markers[0].token, "{a}");
        assert_eq!(masked.markers[1].token, "{a}");
    }

    #[test]
    fn test_mask_without_placeholders() {
        let masked = mask_placeholders("Plain text");
        assert_eq!(masked.text, "Plain text");
        assert!(!masked.has_markers());
    }

    #[test]
    fn test_mask_avoids_marker_collision() {
        let masked = mask_placeholders("literal __PH0__ then {x}");
        assert_eq!(masked.markers[0].marker, "___PH0___");
        assert_eq!(masked.text, "literal __PH0__ then ___PH0___");

        let restored = restore_placeholders(&masked.text, &masked.markers).unwrap();
        assert_eq!(restored.text, "literal __PH0__ then {x}");
    }

    #[test]
    fn test_mask_handles_multibyte_text() {
        let masked = mask_placeholders("नमस्ते {name}, स्वागत है");
        assert_eq!(masked.text, "नमस्ते __PH0__, स्वागत है");
    }

    #[test]
    fn test_restore_simple() {
        let masked = mask_placeholders("Hello {name}!");
        let restored = restore_placeholders("X __PH0__!", &masked.markers).unwrap();
        assert_eq!(restored.text, "X {name}!");
        assert!(!restored.reordering_detected);
    }

    #[test]
    fn test_restore_reordered_markers() {
        let masked = mask_placeholders("{sender} sent {file}");
        let restored = restore_placeholders("__PH1__ は __PH0__ によって送信された", &masked.markers)
            .unwrap();
        assert_eq!(restored.text, "{file} は {sender} によって送信された");
        assert!(restored.reordering_detected);
    }

    #[test]
    fn test_restore_duplicated_marker() {
        let masked = mask_placeholders("{n} items");
        let restored = restore_placeholders("__PH0__ items (__PH0__)", &masked.markers).unwrap();
        assert_eq!(restored.text, "{n} items ({n})");
    }

    #[test]
    fn test_restore_ten_or_more_markers() {
        let source: String = (0..12).map(|i| format!("{{p{}}} ", i)).collect();
        let masked = mask_placeholders(&source);
        let restored = restore_placeholders(&masked.text, &masked.markers).unwrap();
        assert_eq!(restored.text, source);
    }

    #[test]
    fn test_restore_missing_marker_fails() {
        let masked = mask_placeholders("Hello {name}");
        match restore_placeholders("Bonjour", &masked.markers) {
            Err(MtError::MarkerError(msg)) => assert!(msg.contains("__PH0__")),
            other => panic!("Expected MarkerError, got {:?}", other),
        }
    }

    #[test]
    fn test_restore_mangled_marker_fails() {
        let masked = mask_placeholders("Hello {name}");
        assert!(restore_placeholders("Bonjour __ph0__", &masked.markers).is_err());
        assert!(restore_placeholders("Bonjour __PH 0__", &masked.markers).is_err());
    }

    #[test]
    fn test_restore_overlapping_markers_fails() {
        let masked = mask_placeholders("{a}{b}");
        assert_eq!(masked.text, "__PH0____PH1__");
        assert!(restore_placeholders("__PH0___PH1__", &masked.markers).is_err());
    }

    #[test]
    fn test_detect_reordering() {
        let in_order = vec![
            LocatedMarker { ordinal: 0, position: 0, length: 7 },
            LocatedMarker { ordinal: 1, position: 10, length: 7 },
        ];
        assert!(!detect_marker_reordering(&in_order));

        let swapped = vec![
            LocatedMarker { ordinal: 1, position: 0, length: 7 },
            LocatedMarker { ordinal: 0, position: 10, length: 7 },
        ];
        assert!(detect_marker_reordering(&swapped));
    }
}
