//! Android string resource translation
//!
//! Rewrites a `res/values/strings.xml` document, translating the text of
//! `<string>` elements and of `<item>` elements inside `<string-array>`.
//! Anything marked `translatable="false"` is copied as is, as is everything
//! else in the document: comments, attributes, `<plurals>`, other elements.
//!
//! ```xml
//! <resources>
//!     <string name="app_name" translatable="false">Notes</string>
//!     <string name="greeting">Hello {name}!</string>
//!     <string-array name="levels">
//!         <item>Easy</item>
//!         <item translatable="false">PRO</item>
//!     </string-array>
//! </resources>
//! ```

use crate::batch::{TranslationStats, translate_counted};
use crate::mt::error::{MtError, MtResult};
use crate::mt::preserving::PreservingTranslator;
use crate::table::Cell;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementKind {
    String,
    StringArray,
    Item,
    Other,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    kind: ElementKind,
    translatable: bool,
    /// Set once a child element opens; later text runs are left alone
    seen_child: bool,
}

impl Frame {
    /// Only the leading text of `<string>` and array `<item>` elements is translated
    fn translates_text(&self) -> bool {
        self.translatable
            && !self.seen_child
            && matches!(self.kind, ElementKind::String | ElementKind::Item)
    }
}

fn mark_child(stack: &mut [Frame]) {
    if let Some(parent) = stack.last_mut() {
        parent.seen_child = true;
    }
}

fn marked_untranslatable(element: &BytesStart) -> MtResult<bool> {
    let attribute = element
        .try_get_attribute("translatable")
        .map_err(|e| MtError::ResourceError(format!("Invalid attribute: {}", e)))?;
    match attribute {
        Some(attribute) => {
            let value = attribute
                .unescape_value()
                .map_err(|e| MtError::ResourceError(format!("Invalid attribute value: {}", e)))?;
            Ok(value.trim() == "false")
        }
        None => Ok(false),
    }
}

fn open_frame(element: &BytesStart, parent: Option<&Frame>) -> MtResult<Frame> {
    let kind = match element.name().as_ref() {
        b"string" => ElementKind::String,
        b"string-array" => ElementKind::StringArray,
        b"item" if parent.map(|p| p.kind) == Some(ElementKind::StringArray) => ElementKind::Item,
        _ => ElementKind::Other,
    };

    let translatable = match kind {
        ElementKind::String | ElementKind::StringArray => !marked_untranslatable(element)?,
        ElementKind::Item => {
            parent.map(|p| p.translatable).unwrap_or(false) && !marked_untranslatable(element)?
        }
        ElementKind::Other => false,
    };

    Ok(Frame {
        kind,
        translatable,
        seen_child: false,
    })
}

fn xml_error(e: impl std::fmt::Display) -> MtError {
    MtError::ResourceError(format!("Malformed XML: {}", e))
}

/// Translate a `strings.xml` document into `target_language`
///
/// The leading text of every translatable element goes through the
/// placeholder-preserving translator, so `{name}` style tokens survive. Text
/// after an inline child such as `<b>` or `<xliff:g>` is copied as is. A text
/// node that cannot be translated keeps its original content.
///
/// # Returns
/// * `Ok((xml, stats))` - The rewritten document and per-node counts
/// * `Err(MtError::ResourceError)` - If the document is not well-formed XML
pub async fn translate_strings_xml(
    translator: &PreservingTranslator,
    xml: &str,
    target_language: &str,
) -> MtResult<(String, TranslationStats)> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));
    let mut stack: Vec<Frame> = Vec::new();
    let mut stats = TranslationStats::default();
    let mut first_event = true;

    loop {
        let event = reader.read_event().map_err(xml_error)?;

        if first_event {
            first_event = false;
            if !matches!(event, Event::Decl(_)) {
                writer
                    .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
                    .map_err(xml_error)?;
                writer
                    .write_event(Event::Text(BytesText::from_escaped("\n")))
                    .map_err(xml_error)?;
            }
        }

        match event {
            Event::Eof => break,
            Event::Start(element) => {
                let frame = open_frame(&element, stack.last())?;
                mark_child(&mut stack);
                stack.push(frame);
                writer.write_event(Event::Start(element)).map_err(xml_error)?;
            }
            Event::Empty(element) => {
                mark_child(&mut stack);
                writer.write_event(Event::Empty(element)).map_err(xml_error)?;
            }
            Event::End(element) => {
                stack.pop();
                writer.write_event(Event::End(element)).map_err(xml_error)?;
            }
            Event::Text(text) if stack.last().map(Frame::translates_text).unwrap_or(false) => {
                let decoded = text.unescape().ok().map(|d| d.into_owned());
                let Some(decoded) = decoded else {
                    writer.write_event(Event::Text(text)).map_err(xml_error)?;
                    continue;
                };
                let source = Cell::Text(decoded);
                let translated =
                    translate_counted(translator, &source, target_language, &mut stats).await;
                let escaped = partial_escape(translated.as_field()).into_owned();
                writer
                    .write_event(Event::Text(BytesText::from_escaped(escaped)))
                    .map_err(xml_error)?;
            }
            other => writer.write_event(other).map_err(xml_error)?,
        }
    }

    if !stack.is_empty() {
        return Err(MtError::ResourceError(
            "Malformed XML: unclosed elements at end of document".to_string(),
        ));
    }

    let output = String::from_utf8(writer.into_inner())
        .map_err(|e| MtError::ResourceError(format!("Output is not UTF-8: {}", e)))?;
    Ok((output, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mt::mock::{MockMode, MockTranslator};
    use std::sync::Arc;

    fn suffix_translator() -> (MockTranslator, PreservingTranslator) {
        let mock = MockTranslator::new(MockMode::Suffix);
        let translator = PreservingTranslator::new(Arc::new(mock.clone()));
        (mock, translator)
    }

    const STRINGS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <!-- Greeting shown on launch -->
    <string name="app_name" translatable="false">Notes</string>
    <string name="greeting">Hello {name}!</string>
    <string name="separator">---</string>
    <string-array name="levels">
        <item>Easy</item>
        <item translatable="false">PRO</item>
    </string-array>
    <plurals name="files">
        <item quantity="one">One file</item>
    </plurals>
</resources>
"#;

    #[tokio::test]
    async fn test_translates_strings_and_array_items() {
        let (mock, translator) = suffix_translator();
        let (output, stats) = translate_strings_xml(&translator, STRINGS, "ml").await.unwrap();

        assert!(output.contains(r#"<string name="greeting">Hello {name}!_ml</string>"#));
        assert!(output.contains("<item>Easy_ml</item>"));
        assert_eq!(stats, TranslationStats { attempted: 2, changed: 2 });
        assert_eq!(mock.requests(), vec!["Hello __PH0__!", "Easy"]);
    }

    #[tokio::test]
    async fn test_leaves_untranslatable_content_alone() {
        let (_, translator) = suffix_translator();
        let (output, _) = translate_strings_xml(&translator, STRINGS, "ml").await.unwrap();

        assert!(output.contains(r#"<string name="app_name" translatable="false">Notes</string>"#));
        assert!(output.contains(r#"<item translatable="false">PRO</item>"#));
        assert!(output.contains(r#"<string name="separator">---</string>"#));
        assert!(output.contains(r#"<item quantity="one">One file</item>"#));
        assert!(output.contains("<!-- Greeting shown on launch -->"));
        assert!(output.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
    }

    #[tokio::test]
    async fn test_untranslatable_array_skips_its_items() {
        let (mock, translator) = suffix_translator();
        let xml = r#"<resources><string-array name="codes" translatable="false"><item>Alpha</item></string-array></resources>"#;
        let (output, _) = translate_strings_xml(&translator, xml, "hi").await.unwrap();
        assert!(output.contains("<item>Alpha</item>"));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_only_leading_text_of_mixed_content() {
        let (mock, translator) = suffix_translator();
        let xml = r#"<resources><string name="promo">Hello <b>bold</b> world</string><string name="sep">Hi<br/> there</string></resources>"#;
        let (output, stats) = translate_strings_xml(&translator, xml, "hi").await.unwrap();

        assert!(output.contains(r#"<string name="promo">Hello _hi<b>bold</b> world</string>"#));
        assert!(output.contains(r#"<string name="sep">Hi_hi<br/> there</string>"#));
        assert_eq!(mock.requests(), vec!["Hello ", "Hi"]);
        assert_eq!(stats.attempted, 2);
    }

    #[tokio::test]
    async fn test_adds_declaration_when_missing() {
        let (_, translator) = suffix_translator();
        let xml = r#"<resources><string name="ok">OK</string></resources>"#;
        let (output, _) = translate_strings_xml(&translator, xml, "ta").await.unwrap();
        assert_eq!(
            output,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<resources><string name=\"ok\">OK_ta</string></resources>"
        );
    }

    #[tokio::test]
    async fn test_entities_round_trip() {
        let (mock, translator) = suffix_translator();
        let xml = r#"<resources><string name="terms">Terms &amp; {policy}</string></resources>"#;
        let (output, _) = translate_strings_xml(&translator, xml, "hi").await.unwrap();
        assert_eq!(mock.requests(), vec!["Terms & __PH0__"]);
        assert!(output.contains("Terms &amp; {policy}_hi"));
    }

    #[tokio::test]
    async fn test_backend_failure_keeps_text() {
        let mock = MockTranslator::new(MockMode::Error("rate limited".to_string()));
        let translator = PreservingTranslator::new(Arc::new(mock));
        let (output, stats) = translate_strings_xml(&translator, STRINGS, "ar").await.unwrap();
        assert!(output.contains(r#"<string name="greeting">Hello {name}!</string>"#));
        assert_eq!(stats, TranslationStats { attempted: 2, changed: 0 });
    }

    #[tokio::test]
    async fn test_malformed_document_is_an_error() {
        let (_, translator) = suffix_translator();
        let result =
            translate_strings_xml(&translator, "<resources><string>Oops</resources>", "hi").await;
        assert!(matches!(result, Err(MtError::ResourceError(_))));
    }

    #[tokio::test]
    async fn test_unclosed_document_is_an_error() {
        let (_, translator) = suffix_translator();
        let result = translate_strings_xml(&translator, "<resources><string>Oops", "hi").await;
        assert!(matches!(result, Err(MtError::ResourceError(_))));
    }
}
