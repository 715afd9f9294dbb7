//! Placeholder templates
//!
//! Templates use brace placeholders: `{}` (next positional argument),
//! `{0}` (positional argument by index) and `{name}` (named argument).
//! `{{` and `}}` produce literal braces. A trailing `!conversion` or
//! `:spec` is accepted and ignored. Brace groups that do not match this
//! grammar are copied verbatim.

use std::collections::BTreeSet;

use super::FormatArgs;
use crate::error::FormatError;

/// The argument a placeholder refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<'a> {
    /// `{}`: the next positional argument.
    Auto,
    /// `{N}`
    Index(usize),
    /// `{name}`
    Name(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub field: Field<'a>,
    /// Format spec after `:`, kept for display only.
    pub spec: Option<&'a str>,
    /// The placeholder exactly as written, braces included.
    pub raw: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Placeholder(Placeholder<'a>),
}

/// Split a template into literal text and placeholders.
#[must_use]
pub fn parse_template(template: &str) -> Vec<Segment<'_>> {
    let bytes = template.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut pos = 0;

    while let Some(offset) = template.get(pos..).and_then(|rest| rest.find(['{', '}'])) {
        let at = pos + offset;
        let brace = bytes.get(at).copied();
        let next = bytes.get(at + 1).copied();

        match (brace, next) {
            (Some(b'{'), Some(b'{')) | (Some(b'}'), Some(b'}')) => {
                push_literal(&mut segments, template, literal_start, at + 1);
                pos = at + 2;
                literal_start = pos;
            }
            (Some(b'{'), _) => {
                let body_start = at + 1;
                let close = template
                    .get(body_start..)
                    .and_then(|rest| rest.find(['{', '}']))
                    .map(|len| body_start + len)
                    .filter(|&end| bytes.get(end) == Some(&b'}'));

                let Some(end) = close else {
                    pos = at + 1;
                    continue;
                };

                let raw = template.get(at..=end).unwrap_or_default();
                let body = template.get(body_start..end).unwrap_or_default();
                if let Some(placeholder) = parse_placeholder(body, raw) {
                    push_literal(&mut segments, template, literal_start, at);
                    segments.push(Segment::Placeholder(placeholder));
                    literal_start = end + 1;
                }
                pos = end + 1;
            }
            _ => pos = at + 1,
        }
    }

    push_literal(&mut segments, template, literal_start, template.len());
    segments
}

/// The placeholders of a template, in order of appearance.
#[must_use]
pub fn placeholders(template: &str) -> Vec<Placeholder<'_>> {
    parse_template(template)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Placeholder(placeholder) => Some(placeholder),
            Segment::Literal(_) => None,
        })
        .collect()
}

/// Push `template[start..end]` as a literal unless it is empty.
fn push_literal<'a>(segments: &mut Vec<Segment<'a>>, template: &'a str, start: usize, end: usize) {
    if let Some(text) = template.get(start..end)
        && !text.is_empty()
    {
        segments.push(Segment::Literal(text));
    }
}

/// Parse the text between `{` and `}`. `None` means it is not a placeholder.
fn parse_placeholder<'a>(body: &'a str, raw: &'a str) -> Option<Placeholder<'a>> {
    let (head, spec) = match body.split_once(':') {
        Some((head, spec)) => (head, Some(spec)),
        None => (body, None),
    };
    let field_text = head.split_once('!').map_or(head, |(field, _conversion)| field);

    let field = if field_text.is_empty() {
        Field::Auto
    } else if field_text.chars().all(|c| c.is_ascii_digit()) {
        Field::Index(field_text.parse().ok()?)
    } else if is_identifier(field_text) {
        Field::Name(field_text)
    } else {
        return None;
    };

    Some(Placeholder { field, spec, raw })
}

/// ASCII-or-Unicode identifier, as used by named placeholders.
fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Substitute `args` into `template`.
///
/// # Errors
/// Returns [`FormatError`] when a placeholder has no matching argument.
pub fn render(template: &str, args: &FormatArgs) -> Result<String, FormatError> {
    let mut output = String::with_capacity(template.len());
    let mut next_auto = 0;

    for segment in parse_template(template) {
        let placeholder = match segment {
            Segment::Literal(text) => {
                output.push_str(text);
                continue;
            }
            Segment::Placeholder(placeholder) => placeholder,
        };

        let value = match placeholder.field {
            Field::Auto => {
                let index = next_auto;
                next_auto += 1;
                positional(args, index, template)?
            }
            Field::Index(index) => positional(args, index, template)?,
            Field::Name(name) => args.named_value(name).ok_or_else(|| {
                FormatError::MissingNamed { name: name.to_string(), template: template.to_string() }
            })?,
        };
        output.push_str(value);
    }

    Ok(output)
}

/// Positional argument `index`, or the matching error.
fn positional<'a>(
    args: &'a FormatArgs,
    index: usize,
    template: &str,
) -> Result<&'a str, FormatError> {
    args.positional_at(index)
        .ok_or_else(|| FormatError::MissingPositional { index, template: template.to_string() })
}

/// The arguments a template needs, independent of placeholder order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderSignature {
    /// Number of positional slots referenced (`{}` count or highest `{N}` + 1).
    pub positional: usize,
    pub named: BTreeSet<String>,
}

impl PlaceholderSignature {
    #[must_use]
    pub fn of(template: &str) -> Self {
        let mut signature = Self::default();
        let mut autos = 0;

        for placeholder in placeholders(template) {
            match placeholder.field {
                Field::Auto => autos += 1,
                Field::Index(index) => {
                    signature.positional = signature.positional.max(index.saturating_add(1));
                }
                Field::Name(name) => {
                    signature.named.insert(name.to_string());
                }
            }
        }

        signature.positional = signature.positional.max(autos);
        signature
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional == 0 && self.named.is_empty()
    }
}
