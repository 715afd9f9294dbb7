//! Placeholder substitution for translated strings
mod args;
mod template;

pub use args::FormatArgs;
pub use template::{
    Field,
    Placeholder,
    PlaceholderSignature,
    Segment,
    parse_template,
    placeholders,
    render,
};
