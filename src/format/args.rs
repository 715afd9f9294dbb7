use std::fmt::Display;

/// Arguments substituted into a template.
///
/// ```
/// use qt_ts_catalog::format::{FormatArgs, render};
///
/// let args = FormatArgs::new().arg(3).named("total", 14);
/// assert_eq!(render("{} / {total}", &args).ok().as_deref(), Some("3 / 14"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatArgs {
    positional: Vec<String>,
    named: Vec<(String, String)>,
}

impl FormatArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl Display) -> Self {
        self.push(value);
        self
    }

    /// Set a named argument, replacing an earlier value for the same name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.insert(name, value);
        self
    }

    pub fn push(&mut self, value: impl Display) {
        self.positional.push(value.to_string());
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Display) {
        let name = name.into();
        let value = value.to_string();
        match self.named.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.named.push((name, value)),
        }
    }

    #[must_use]
    pub fn positional_at(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn named_value(&self, name: &str) -> Option<&str> {
        self.named.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

impl<T: Display> FromIterator<T> for FormatArgs {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { positional: iter.into_iter().map(|v| v.to_string()).collect(), named: Vec::new() }
    }
}
