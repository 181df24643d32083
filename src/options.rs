//! User-facing options and their conversion into aggregation parameters.
//!
//! The host collects values through a modal form described by
//! [`OptionField`]s. [`VisualizerOptions::from_values`] validates what comes
//! back and turns it into typed settings.

use crate::error::VisualizerError;
use serde::{Deserialize, Serialize};

/// Title of the options form and of the viewer window.
pub const DIALOG_TITLE: &str = "Data visualizer";

/// Byte order used to split integer values into bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

/// Which accesses take part in aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessFilter {
    #[default]
    ReadsOnly,
    All,
}

/// What happens when an offset that already has a record is touched again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FirstAccessPolicy {
    /// Keep the first access; later touches only bump the count
    #[default]
    KeepFirst,
    /// Later accesses replace the stored instruction/row/value
    Overwrite,
}

/// Which of the host's traces to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TraceSource {
    #[default]
    Full,
    Filtered,
}

/// Kind and default of one form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text(String),
    Number(i64),
    /// Choice list; the default is the first entry
    Choice(Vec<String>),
}

/// One field of the host's options form.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionField {
    pub label: String,
    pub kind: FieldKind,
}

impl OptionField {
    fn text(label: &str, default: &str) -> Self {
        Self { label: label.to_string(), kind: FieldKind::Text(default.to_string()) }
    }

    fn number(label: &str, default: i64) -> Self {
        Self { label: label.to_string(), kind: FieldKind::Number(default) }
    }

    fn choice(label: &str, choices: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            kind: FieldKind::Choice(choices.iter().map(|c| c.to_string()).collect()),
        }
    }

    /// The value the field holds before the user edits it.
    pub fn default_value(&self) -> OptionValue {
        match &self.kind {
            FieldKind::Text(s) => OptionValue::Text(s.clone()),
            FieldKind::Number(n) => OptionValue::Number(*n),
            FieldKind::Choice(_) => OptionValue::Choice(0),
        }
    }
}

/// A value returned by the host for one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Text(String),
    Number(i64),
    /// Index into the field's choice list
    Choice(usize),
}

/// Builds the form shown to the user, in the order `from_values` expects.
pub fn option_fields() -> Vec<OptionField> {
    vec![
        OptionField::text("Memory address", "0x0"),
        OptionField::number("Size", 2000),
        OptionField::choice("Source trace", &["Full trace", "Filtered trace"]),
        OptionField::choice("Byte order", &["Little endian", "Big endian"]),
        OptionField::choice("Access filter", &["Reads only", "Reads and writes"]),
        OptionField::choice("Repeated access", &["Keep first", "Keep last"]),
    ]
}

/// Settings collected from the user for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizerOptions {
    pub base_address: u64,
    pub window_size: u64,
    pub source: TraceSource,
    pub byte_order: ByteOrder,
    pub access_filter: AccessFilter,
    pub first_access_policy: FirstAccessPolicy,
}

impl Default for VisualizerOptions {
    fn default() -> Self {
        Self {
            base_address: 0,
            window_size: 2000,
            source: TraceSource::Full,
            byte_order: ByteOrder::Little,
            access_filter: AccessFilter::ReadsOnly,
            first_access_policy: FirstAccessPolicy::KeepFirst,
        }
    }
}

impl VisualizerOptions {
    /// Converts the values of the form built by [`option_fields`].
    ///
    /// Trailing fields may be omitted; they keep their defaults.
    pub fn from_values(values: &[OptionValue]) -> Result<Self, VisualizerError> {
        let mut options = Self::default();
        let mut iter = values.iter();

        match iter.next() {
            Some(OptionValue::Text(s)) => options.base_address = parse_address(s)?,
            Some(OptionValue::Number(n)) => options.base_address = non_negative(*n, "Memory address")?,
            Some(other) => return Err(unexpected("Memory address", other)),
            None => return Err(VisualizerError::InvalidOptions("missing memory address".to_string())),
        }

        match iter.next() {
            Some(OptionValue::Number(n)) => options.window_size = non_negative(*n, "Size")?,
            Some(OptionValue::Text(s)) => options.window_size = parse_address(s)?,
            Some(other) => return Err(unexpected("Size", other)),
            None => return Err(VisualizerError::InvalidOptions("missing size".to_string())),
        }

        if let Some(v) = iter.next() {
            options.source = match choice(v, "Source trace")? {
                0 => TraceSource::Full,
                _ => TraceSource::Filtered,
            };
        }
        if let Some(v) = iter.next() {
            options.byte_order = match choice(v, "Byte order")? {
                0 => ByteOrder::Little,
                _ => ByteOrder::Big,
            };
        }
        if let Some(v) = iter.next() {
            options.access_filter = match choice(v, "Access filter")? {
                0 => AccessFilter::ReadsOnly,
                _ => AccessFilter::All,
            };
        }
        if let Some(v) = iter.next() {
            options.first_access_policy = match choice(v, "Repeated access")? {
                0 => FirstAccessPolicy::KeepFirst,
                _ => FirstAccessPolicy::Overwrite,
            };
        }

        Ok(options)
    }

    /// Inverse of [`from_values`](Self::from_values), used to preset a form.
    pub fn to_values(&self) -> Vec<OptionValue> {
        vec![
            OptionValue::Text(format!("{:#x}", self.base_address)),
            OptionValue::Number(self.window_size.min(i64::MAX as u64) as i64),
            OptionValue::Choice(match self.source {
                TraceSource::Full => 0,
                TraceSource::Filtered => 1,
            }),
            OptionValue::Choice(match self.byte_order {
                ByteOrder::Little => 0,
                ByteOrder::Big => 1,
            }),
            OptionValue::Choice(match self.access_filter {
                AccessFilter::ReadsOnly => 0,
                AccessFilter::All => 1,
            }),
            OptionValue::Choice(match self.first_access_policy {
                FirstAccessPolicy::KeepFirst => 0,
                FirstAccessPolicy::Overwrite => 1,
            }),
        ]
    }
}

/// Parses an address typed by the user.
///
/// Strings starting with `0x` are read as hexadecimal, anything else as decimal.
/// Empty input yields 0.
pub fn parse_address(s: &str) -> Result<u64, VisualizerError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0);
    }
    let value = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(digits) => u64::from_str_radix(digits, 16)?,
        None => s.parse::<u64>()?,
    };
    Ok(value)
}

fn non_negative(n: i64, label: &str) -> Result<u64, VisualizerError> {
    u64::try_from(n).map_err(|_| VisualizerError::InvalidOptions(format!("{} must not be negative", label)))
}

fn choice(value: &OptionValue, label: &str) -> Result<usize, VisualizerError> {
    match value {
        OptionValue::Choice(i) => Ok(*i),
        other => Err(unexpected(label, other)),
    }
}

fn unexpected(label: &str, value: &OptionValue) -> VisualizerError {
    VisualizerError::InvalidOptions(format!("unexpected value for '{}': {:?}", label, value))
}
