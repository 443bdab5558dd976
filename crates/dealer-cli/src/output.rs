//! Output formatting for CLI commands.
//!
//! Supports table (human-readable), JSON and YAML output. API payloads are
//! schemaless [`serde_json::Value`]s, so tables are driven by per-command
//! column lists.

use std::io::Write;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::cli::Format;
use crate::error::CliError;

/// Maximum width of one table cell.
const MAX_CELL_WIDTH: usize = 60;

/// Output formatter that handles table, JSON and YAML output.
#[derive(Debug, Clone, Copy)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write + ?Sized,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Yaml => {
                let yaml = serde_yaml::to_string(value)
                    .map_err(|e| CliError::Format(format!("YAML serialization failed: {e}")))?;
                writer.write_all(yaml.as_bytes())?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// One table column: header label and the payload key it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Header label.
    pub header: &'static str,
    /// Key looked up in each row object.
    pub key: &'static str,
}

impl Column {
    /// Create a column.
    pub const fn new(header: &'static str, key: &'static str) -> Self {
        Self { header, key }
    }
}

/// A list response rendered as rows.
#[derive(Debug, Clone)]
pub struct Listing {
    columns: &'static [Column],
    value: Value,
}

impl Listing {
    /// Wrap a list payload with the columns to show.
    pub const fn new(columns: &'static [Column], value: Value) -> Self {
        Self { columns, value }
    }

    /// Rows of the payload: the array itself, or the single array field
    /// of a wrapping object.
    fn rows(&self) -> Option<&[Value]> {
        match &self.value {
            Value::Array(items) => Some(items),
            Value::Object(map) => {
                let mut arrays = map.values().filter_map(Value::as_array);
                match (arrays.next(), arrays.next()) {
                    (Some(items), None) => Some(items),
                    _ => None,
                }
            }
            Value::Null => Some(&[]),
            _ => None,
        }
    }
}

impl Serialize for Listing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl TableDisplay for Listing {
    fn write_table<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), CliError> {
        let Some(rows) = self.rows() else {
            return Record::new(self.value.clone()).write_table(writer);
        };
        if rows.is_empty() {
            writeln!(writer, "No results")?;
            return Ok(());
        }

        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| truncate(&cell(row.get(c.key)), MAX_CELL_WIDTH))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                cells
                    .iter()
                    .map(|r| r[i].chars().count())
                    .chain(std::iter::once(c.header.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let headers: Vec<String> = self.columns.iter().map(|c| c.header.to_string()).collect();
        write_row(writer, &headers, &widths)?;
        let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        writeln!(writer, "{}", "─".repeat(total))?;
        for row in &cells {
            write_row(writer, row, &widths)?;
        }

        writeln!(writer)?;
        writeln!(writer, "Total: {} item(s)", rows.len())?;
        Ok(())
    }
}

fn write_row<W: Write + ?Sized>(writer: &mut W, cells: &[String], widths: &[usize]) -> Result<(), CliError> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(writer, "{}", line.trim_end())?;
    Ok(())
}

/// A single object rendered as `Field / Value` pairs.
#[derive(Debug, Clone)]
pub struct Record {
    value: Value,
}

impl Record {
    /// Wrap a single-object payload.
    pub const fn new(value: Value) -> Self {
        Self { value }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl TableDisplay for Record {
    fn write_table<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), CliError> {
        let Value::Object(map) = &self.value else {
            writeln!(writer, "{}", cell(Some(&self.value)))?;
            return Ok(());
        };

        let width = map.keys().map(|k| k.chars().count()).max().unwrap_or(0).max("Field".len());
        writeln!(writer, "{:<width$}  Value", "Field")?;
        writeln!(writer, "{}", "─".repeat(width + 2 + "Value".len()))?;
        for (key, value) in map {
            writeln!(writer, "{key:<width$}  {}", cell(Some(value)))?;
        }
        Ok(())
    }
}

/// Text payload (YAML documents, logs) written verbatim in table mode.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Text(pub String);

impl TableDisplay for Text {
    fn write_table<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), CliError> {
        writer.write_all(self.0.as_bytes())?;
        if !self.0.ends_with('\n') {
            writeln!(writer)?;
        }
        Ok(())
    }
}

/// Simple message output.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Message text.
    pub message: String,
    /// Whether this is a success message.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub success: bool,
}

impl Message {
    /// Create a success message.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    /// Create an informational message.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

impl TableDisplay for Message {
    fn write_table<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.success {
            writeln!(writer, "✓ {}", self.message)?;
        } else {
            writeln!(writer, "{}", self.message)?;
        }
        Ok(())
    }
}

/// Scalar cell text; nested values are shown as compact JSON.
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Truncate a string to a maximum length in characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}
