//! Qt Linguist TS document reader
//!
//! Streams the XML with `quick-xml` into a raw [`TsDocument`]. Only the
//! document structure is validated here; whether an individual message is
//! usable is decided when the catalog is built.

use quick_xml::Reader;
use quick_xml::events::{
    BytesStart,
    Event,
};

use crate::error::LoadError;
use crate::types::Locus;

/// Root element.
const ROOT_TAG: &[u8] = b"TS";
/// One UI class's messages.
const CONTEXT_TAG: &[u8] = b"context";
/// Context name.
const NAME_TAG: &[u8] = b"name";
/// One translatable string.
const MESSAGE_TAG: &[u8] = b"message";
/// Source file and line a message was extracted from.
const LOCATION_TAG: &[u8] = b"location";
/// Source text.
const SOURCE_TAG: &[u8] = b"source";
/// Disambiguation comment.
const COMMENT_TAG: &[u8] = b"comment";
/// Developer note for translators.
const EXTRA_COMMENT_TAG: &[u8] = b"extracomment";
/// Translator's own note.
const TRANSLATOR_COMMENT_TAG: &[u8] = b"translatorcomment";
/// Translated text, or the container of numerus forms / length variants.
const TRANSLATION_TAG: &[u8] = b"translation";
/// One plural form.
const NUMERUS_FORM_TAG: &[u8] = b"numerusform";
/// Alternative (shorter) rendering; only the first one is loaded.
const LENGTH_VARIANT_TAG: &[u8] = b"lengthvariant";
/// Escaped control character.
const BYTE_TAG: &[u8] = b"byte";

/// Parsed TS document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsDocument {
    pub version: Option<String>,
    /// Target language declared on the root element (e.g. `zh_HK`).
    pub language: Option<String>,
    pub source_language: Option<String>,
    /// Context blocks as they appear; repeated names are kept separate.
    pub contexts: Vec<TsContext>,
    /// `<message>` elements found outside any `<context>`.
    pub orphan_messages: Vec<TsMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsContext {
    pub name: Option<String>,
    pub messages: Vec<TsMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsMessage {
    pub numerus: bool,
    pub source: Option<String>,
    /// Disambiguation comment.
    pub comment: Option<String>,
    pub extra_comment: Option<String>,
    pub translator_comment: Option<String>,
    pub translation: Option<TsTranslation>,
    pub locations: Vec<Locus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsTranslation {
    pub kind: TranslationKind,
    pub text: String,
    pub numerus_forms: Vec<String>,
}

/// Value of the `type` attribute on `<translation>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TranslationKind {
    #[default]
    Finished,
    Unfinished,
    Obsolete,
    Vanished,
}

impl TranslationKind {
    /// Missing or unknown `type` values mean a finished translation.
    fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("unfinished") => Self::Unfinished,
            Some("obsolete") => Self::Obsolete,
            Some("vanished") => Self::Vanished,
            _ => Self::Finished,
        }
    }

    /// Obsolete and vanished translations are kept in the file for
    /// translators only.
    #[must_use]
    pub const fn is_retired(self) -> bool {
        matches!(self, Self::Obsolete | Self::Vanished)
    }
}

/// Where character data currently goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    /// `<context><name>`
    ContextName,
    /// `<source>`
    Source,
    /// `<comment>`
    Comment,
    /// `<extracomment>`
    ExtraComment,
    /// `<translatorcomment>`
    TranslatorComment,
    /// `<translation>` text
    Translation,
    /// The last `<numerusform>`
    NumerusForm,
}

/// Event-driven state while reading a document.
#[derive(Debug, Default)]
struct DocumentBuilder {
    /// Everything read so far.
    document: TsDocument,
    /// `<TS>` has been opened.
    root_open: bool,
    /// `<TS>` has been closed; later content is ignored.
    root_closed: bool,
    /// Context being read.
    context: Option<TsContext>,
    /// Message being read.
    message: Option<TsMessage>,
    /// Where text events go. `None` drops them.
    target: Option<TextTarget>,
    /// Field that receives the first `<lengthvariant>` of the current
    /// `variants="yes"` element. Text directly inside that element is
    /// indentation and is dropped.
    variant_target: Option<TextTarget>,
    /// The first length variant of the current element has been read.
    length_variant_seen: bool,
}

impl DocumentBuilder {
    /// Handle a start (or self-closing) tag.
    fn open(&mut self, element: &BytesStart<'_>, self_closing: bool) -> Result<(), LoadError> {
        let name = element.name();
        let name = name.as_ref();

        if !self.root_open {
            if name != ROOT_TAG {
                return Err(LoadError::Malformed(format!(
                    "expected <TS> root element, found <{}>",
                    String::from_utf8_lossy(name)
                )));
            }
            self.document.version = attribute(element, b"version")?;
            self.document.language = attribute(element, b"language")?;
            self.document.source_language = attribute(element, b"sourcelanguage")?;
            self.root_open = true;
            self.root_closed = self_closing;
            return Ok(());
        }

        match name {
            CONTEXT_TAG => {
                self.finish_message();
                self.finish_context();
                self.context = Some(TsContext::default());
            }
            NAME_TAG if self.message.is_none() => {
                if let Some(context) = self.context.as_mut() {
                    context.name = Some(String::new());
                    self.target = Some(TextTarget::ContextName);
                }
            }
            MESSAGE_TAG => {
                self.finish_message();
                let numerus = attribute(element, b"numerus")?.as_deref() == Some("yes");
                self.message = Some(TsMessage { numerus, ..TsMessage::default() });
            }
            LOCATION_TAG => {
                if let Some(message) = self.message.as_mut() {
                    let filename = attribute(element, b"filename")?;
                    let line = attribute(element, b"line")?;
                    message.locations.push(Locus::from_attributes(filename, line.as_deref()));
                }
            }
            SOURCE_TAG => self.begin_field(TextTarget::Source),
            COMMENT_TAG => self.begin_field(TextTarget::Comment),
            EXTRA_COMMENT_TAG => self.begin_field(TextTarget::ExtraComment),
            TRANSLATOR_COMMENT_TAG => self.begin_field(TextTarget::TranslatorComment),
            TRANSLATION_TAG => {
                if let Some(message) = self.message.as_mut() {
                    let kind = TranslationKind::from_attribute(
                        attribute(element, b"type")?.as_deref(),
                    );
                    message.translation = Some(TsTranslation { kind, ..TsTranslation::default() });
                    self.begin_variants(element, TextTarget::Translation)?;
                }
            }
            NUMERUS_FORM_TAG => {
                if let Some(translation) =
                    self.message.as_mut().and_then(|m| m.translation.as_mut())
                {
                    translation.numerus_forms.push(String::new());
                    self.begin_variants(element, TextTarget::NumerusForm)?;
                }
            }
            LENGTH_VARIANT_TAG => {
                if self.variant_target.is_none() {
                    // `<lengthvariant>` without `variants="yes"`: whatever
                    // was collected so far was only whitespace between tags.
                    self.variant_target = self.target;
                    if let Some(slot) = self.current_slot() {
                        slot.clear();
                    }
                }
                self.target = if self.length_variant_seen { None } else { self.variant_target };
            }
            BYTE_TAG => {
                if let Some(c) = attribute(element, b"value")?.as_deref().and_then(decode_byte) {
                    self.push_text(&c.to_string());
                }
            }
            _ => {}
        }

        if self_closing {
            self.close(name);
        }
        Ok(())
    }

    /// Handle an end tag.
    fn close(&mut self, name: &[u8]) {
        match name {
            ROOT_TAG => {
                self.finish_message();
                self.finish_context();
                self.root_closed = true;
            }
            CONTEXT_TAG => {
                self.finish_message();
                self.finish_context();
            }
            MESSAGE_TAG => self.finish_message(),
            NUMERUS_FORM_TAG => {
                self.variant_target = None;
                self.target = Some(TextTarget::Translation);
            }
            LENGTH_VARIANT_TAG => {
                if self.variant_target.is_some() {
                    self.length_variant_seen = true;
                    self.target = None;
                }
            }
            TRANSLATION_TAG => {
                self.variant_target = None;
                self.target = None;
            }
            NAME_TAG | SOURCE_TAG | COMMENT_TAG | EXTRA_COMMENT_TAG | TRANSLATOR_COMMENT_TAG => {
                self.target = None;
            }
            _ => {}
        }
    }

    /// Start collecting text for `target`. With `variants="yes"` text is
    /// held back until the first `<lengthvariant>`.
    fn begin_variants(
        &mut self,
        element: &BytesStart<'_>,
        target: TextTarget,
    ) -> Result<(), LoadError> {
        self.length_variant_seen = false;
        if attribute(element, b"variants")?.as_deref() == Some("yes") {
            self.variant_target = Some(target);
            self.target = None;
        } else {
            self.variant_target = None;
            self.target = Some(target);
        }
        Ok(())
    }

    /// Start an optional text field of the current message.
    fn begin_field(&mut self, target: TextTarget) {
        let Some(message) = self.message.as_mut() else {
            return;
        };
        let slot = match target {
            TextTarget::Source => &mut message.source,
            TextTarget::Comment => &mut message.comment,
            TextTarget::ExtraComment => &mut message.extra_comment,
            TextTarget::TranslatorComment => &mut message.translator_comment,
            _ => return,
        };
        *slot = Some(String::new());
        self.target = Some(target);
    }

    /// Append character data to the current target.
    fn push_text(&mut self, text: &str) {
        if let Some(slot) = self.current_slot() {
            slot.push_str(text);
        }
    }

    /// The string the current target writes into.
    fn current_slot(&mut self) -> Option<&mut String> {
        match self.target? {
            TextTarget::ContextName => self.context.as_mut().and_then(|c| c.name.as_mut()),
            TextTarget::Source => self.message.as_mut().and_then(|m| m.source.as_mut()),
            TextTarget::Comment => self.message.as_mut().and_then(|m| m.comment.as_mut()),
            TextTarget::ExtraComment => {
                self.message.as_mut().and_then(|m| m.extra_comment.as_mut())
            }
            TextTarget::TranslatorComment => {
                self.message.as_mut().and_then(|m| m.translator_comment.as_mut())
            }
            TextTarget::Translation => {
                self.message.as_mut().and_then(|m| m.translation.as_mut()).map(|t| &mut t.text)
            }
            TextTarget::NumerusForm => self
                .message
                .as_mut()
                .and_then(|m| m.translation.as_mut())
                .and_then(|t| t.numerus_forms.last_mut()),
        }
    }

    /// Attach the current message to its context (or to the orphans).
    fn finish_message(&mut self) {
        self.target = None;
        self.variant_target = None;
        self.length_variant_seen = false;
        let Some(message) = self.message.take() else {
            return;
        };
        match self.context.as_mut() {
            Some(context) => context.messages.push(message),
            None => self.document.orphan_messages.push(message),
        }
    }

    /// Store the current context.
    fn finish_context(&mut self) {
        if let Some(context) = self.context.take() {
            self.document.contexts.push(context);
        }
    }
}

/// Decodes the `value` of a `<byte>` escape (`x1B` hex or `27` decimal).
fn decode_byte(value: &str) -> Option<char> {
    let code = match value.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => value.parse::<u32>().ok()?,
    };
    char::from_u32(code)
}

/// Unescaped value of attribute `key`.
fn attribute(element: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, LoadError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| LoadError::Malformed(format!("invalid attribute: {e}")))?;
        if attr.key.as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|e| LoadError::Malformed(format!("invalid attribute value: {e}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Parse a TS document.
///
/// # Errors
/// - XML syntax errors
/// - a root element other than `<TS>`, or no root element at all
/// - end of input before the root element is closed
pub fn parse_ts_document(text: &str) -> Result<TsDocument, LoadError> {
    let mut reader = Reader::from_str(text);
    let mut builder = DocumentBuilder::default();

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(LoadError::Malformed(format!(
                    "XML error near byte {}: {e}",
                    reader.buffer_position()
                )));
            }
        };

        match event {
            Event::Start(element) => builder.open(&element, false)?,
            Event::Empty(element) => builder.open(&element, true)?,
            Event::End(element) => builder.close(element.name().as_ref()),
            Event::Text(content) => {
                let content = content
                    .unescape()
                    .map_err(|e| LoadError::Malformed(format!("invalid text content: {e}")))?;
                builder.push_text(&content);
            }
            Event::CData(data) => builder.push_text(&String::from_utf8_lossy(&data)),
            Event::Eof => break,
            _ => {}
        }

        if builder.root_closed {
            break;
        }
    }

    if !builder.root_open {
        return Err(LoadError::Malformed("document has no root element".to_string()));
    }
    if !builder.root_closed {
        return Err(LoadError::Malformed("unexpected end of document inside <TS>".to_string()));
    }

    tracing::debug!(
        language = ?builder.document.language,
        contexts = builder.document.contexts.len(),
        "Parsed TS document"
    );
    Ok(builder.document)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="zh_HK" sourcelanguage="en">
<context>
    <name>RacePredictionModal</name>
    <message>
        <location filename="../ui/prediction_detail_modal.py" line="470"/>
        <source>POS {}</source>
        <translation>第{}</translation>
    </message>
    <message>
        <source>Refresh &amp; Predict</source>
        <comment>button</comment>
        <translation type="unfinished"></translation>
    </message>
</context>
</TS>
"#;

    #[googletest::test]
    fn test_parse_root_attributes() {
        let doc = parse_ts_document(SAMPLE).unwrap();

        expect_that!(doc.version.as_deref(), some(eq("2.1")));
        expect_that!(doc.language.as_deref(), some(eq("zh_HK")));
        expect_that!(doc.source_language.as_deref(), some(eq("en")));
        expect_that!(doc.contexts.len(), eq(1));
        expect_that!(doc.orphan_messages.len(), eq(0));
    }

    #[googletest::test]
    fn test_parse_messages() {
        let doc = parse_ts_document(SAMPLE).unwrap();
        let context = &doc.contexts[0];

        expect_that!(context.name.as_deref(), some(eq("RacePredictionModal")));
        expect_that!(context.messages.len(), eq(2));

        let first = &context.messages[0];
        expect_that!(first.source.as_deref(), some(eq("POS {}")));
        expect_that!(first.translation.as_ref().map(|t| t.text.as_str()), some(eq("第{}")));
        expect_that!(first.locations.len(), eq(1));
        expect_that!(first.locations[0].line, some(eq(470_u32)));

        let second = &context.messages[1];
        expect_that!(second.source.as_deref(), some(eq("Refresh & Predict")));
        expect_that!(second.comment.as_deref(), some(eq("button")));
        expect_that!(
            second.translation.as_ref().map(|t| t.kind),
            some(eq(TranslationKind::Unfinished))
        );
    }

    #[googletest::test]
    fn test_parse_preserves_whitespace_in_source() {
        let xml = "<TS><context><name>C</name><message><source>  padded  </source>\
                   <translation> 填充 </translation></message></context></TS>";

        let doc = parse_ts_document(xml).unwrap();
        let message = &doc.contexts[0].messages[0];

        expect_that!(message.source.as_deref(), some(eq("  padded  ")));
        expect_that!(message.translation.as_ref().map(|t| t.text.as_str()), some(eq(" 填充 ")));
    }

    #[googletest::test]
    fn test_parse_numerus_forms() {
        let xml = r#"<TS language="en">
<context><name>DatabaseBrowser</name>
<message numerus="yes">
    <source>%n record(s)</source>
    <translation>
        <numerusform>%n record</numerusform>
        <numerusform>%n records</numerusform>
    </translation>
</message>
</context></TS>"#;

        let doc = parse_ts_document(xml).unwrap();
        let message = &doc.contexts[0].messages[0];
        let translation = message.translation.as_ref().unwrap();

        expect_that!(message.numerus, eq(true));
        expect_that!(
            translation.numerus_forms,
            elements_are![eq("%n record"), eq("%n records")]
        );
    }

    #[googletest::test]
    fn test_parse_length_variants_keeps_first() {
        let xml = r#"<TS><context><name>C</name><message><source>Settings</source>
<translation variants="yes"><lengthvariant>設定選項</lengthvariant><lengthvariant>設定</lengthvariant></translation>
</message></context></TS>"#;

        let doc = parse_ts_document(xml).unwrap();
        let translation = doc.contexts[0].messages[0].translation.as_ref().unwrap();

        expect_that!(translation.text, eq("設定選項"));
    }

    #[googletest::test]
    fn test_parse_indented_length_variants() {
        let xml = r#"<TS><context><name>C</name>
<message>
    <source>Settings</source>
    <translation variants="yes">
        <lengthvariant>設定選項</lengthvariant>
        <lengthvariant>設定</lengthvariant>
    </translation>
</message>
<message numerus="yes">
    <source>%n race(s)</source>
    <translation>
        <numerusform variants="yes">
            <lengthvariant>%n 場賽事</lengthvariant>
            <lengthvariant>%n 場</lengthvariant>
        </numerusform>
    </translation>
</message>
</context></TS>"#;

        let doc = parse_ts_document(xml).unwrap();
        let messages = &doc.contexts[0].messages;

        expect_that!(
            messages[0].translation.as_ref().map(|t| t.text.as_str()),
            some(eq("設定選項"))
        );
        expect_that!(
            messages[1].translation.as_ref().unwrap().numerus_forms,
            elements_are![eq("%n 場賽事")]
        );
    }

    #[googletest::test]
    fn test_parse_length_variants_without_variants_attribute() {
        let xml = "<TS><context><name>C</name><message><source>Close</source>
<translation>
    <lengthvariant>關閉視窗</lengthvariant>
    <lengthvariant>關閉</lengthvariant>
</translation></message></context></TS>";

        let doc = parse_ts_document(xml).unwrap();
        let translation = doc.contexts[0].messages[0].translation.as_ref().unwrap();

        expect_that!(translation.text, eq("關閉視窗"));
    }

    #[googletest::test]
    fn test_parse_byte_escape_and_cdata() {
        let xml = r#"<TS><context><name>C</name><message><source>a<byte value="x9"/>b</source>
<translation><![CDATA[<b>粗</b>]]></translation></message></context></TS>"#;

        let doc = parse_ts_document(xml).unwrap();
        let message = &doc.contexts[0].messages[0];

        expect_that!(message.source.as_deref(), some(eq("a\tb")));
        expect_that!(message.translation.as_ref().map(|t| t.text.as_str()), some(eq("<b>粗</b>")));
    }

    #[googletest::test]
    fn test_parse_repeated_context_blocks_are_kept() {
        let xml = r"<TS>
<context><name>SettingsTab</name><message><source>A</source><translation>甲</translation></message></context>
<context><name>SettingsTab</name><message><source>B</source><translation>乙</translation></message></context>
</TS>";

        let doc = parse_ts_document(xml).unwrap();

        expect_that!(doc.contexts.len(), eq(2));
        expect_that!(doc.contexts[1].name.as_deref(), some(eq("SettingsTab")));
    }

    #[googletest::test]
    fn test_parse_orphan_message() {
        let xml = "<TS><message><source>Lost</source><translation>迷失</translation></message></TS>";

        let doc = parse_ts_document(xml).unwrap();

        expect_that!(doc.contexts.len(), eq(0));
        expect_that!(doc.orphan_messages.len(), eq(1));
    }

    #[googletest::test]
    fn test_parse_self_closing_elements() {
        let xml = r#"<TS><context><name>C</name><message><source>Empty</source><translation type="unfinished"/></message></context></TS>"#;

        let doc = parse_ts_document(xml).unwrap();
        let translation = doc.contexts[0].messages[0].translation.as_ref().unwrap();

        expect_that!(translation.text, eq(""));
        expect_that!(translation.kind, eq(TranslationKind::Unfinished));
    }

    #[rstest]
    #[case::not_xml("this is not xml <")]
    #[case::wrong_root("<resources><string>x</string></resources>")]
    #[case::empty("")]
    #[case::unclosed_root("<TS><context><name>C</name></context>")]
    #[case::mismatched_end("<TS><context></message></TS>")]
    fn test_parse_malformed_document(#[case] xml: &str) {
        let result = parse_ts_document(xml);

        assert!(matches!(result, Err(LoadError::Malformed(_))), "{result:?}");
    }

    #[rstest]
    #[case("x1B", Some('\u{1b}'))]
    #[case("27", Some('\u{1b}'))]
    #[case("xZZ", None)]
    fn test_decode_byte(#[case] value: &str, #[case] expected: Option<char>) {
        assert_eq!(decode_byte(value), expected);
    }
}
