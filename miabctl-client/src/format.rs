//! Output rendering for the domain entities.
//!
//! One entry point, [`render`], turns any renderable entity (or collection
//! of them) into `plain`, `json`, `yaml` or `csv` text. The structural
//! formats come straight from serde; `plain` and `csv` are shaped per
//! entity type via the [`Render`] trait.

use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};

/// An output format selectable per render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable plain text.
    #[default]
    Plain,
    /// JSON.
    Json,
    /// YAML.
    Yaml,
    /// Comma-separated values with a fixed header row per entity type.
    Csv,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => f.write_str("plain"),
            Self::Json => f.write_str("json"),
            Self::Yaml => f.write_str("yaml"),
            Self::Csv => f.write_str("csv"),
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    /// Parses case-insensitively; an unrecognized token is an error rather
    /// than a silent fallback to plain text.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            "csv" => Ok(Self::Csv),
            _ => Err(Error::Format {
                token: s.to_string(),
            }),
        }
    }
}

/// Shaping rules an entity provides for the non-structural formats.
///
/// JSON and YAML are derived from the entity's `Serialize` impl; `plain`
/// and `csv` need per-type shaping, which implementors supply here. The
/// blanket impl for `Vec<T>` renders collections: plain sections joined by
/// newlines, CSV as a single table with one shared header.
pub trait Render: Serialize {
    /// The fixed CSV header row for this entity type.
    const CSV_HEADER: &'static str;

    /// Human-readable rendering.
    fn plain(&self) -> String;

    /// Appends this entity's CSV data rows, one line per leaf record, with
    /// the parent domain repeated on every row where applicable.
    fn csv_rows(&self, out: &mut String);
}

impl<T: Render> Render for Vec<T> {
    const CSV_HEADER: &'static str = T::CSV_HEADER;

    fn plain(&self) -> String {
        let parts: Vec<String> = self.iter().map(Render::plain).collect();
        parts.join("\n")
    }

    fn csv_rows(&self, out: &mut String) {
        for item in self {
            item.csv_rows(out);
        }
    }
}

/// Renders `value` in the requested format.
///
/// # Errors
///
/// Returns [`Error::Serialization`] when the structural serializers fail;
/// unrecognized format tokens are already rejected while parsing the
/// [`Format`].
pub fn render<T: Render>(value: &T, format: Format) -> Result<String> {
    match format {
        Format::Plain => Ok(value.plain()),
        Format::Json => serde_json::to_string(value).map_err(|e| Error::Serialization {
            detail: e.to_string(),
        }),
        Format::Yaml => serde_yaml::to_string(value).map_err(|e| Error::Serialization {
            detail: e.to_string(),
        }),
        Format::Csv => {
            let mut out = String::from(T::CSV_HEADER);
            out.push('\n');
            value.csv_rows(&mut out);
            Ok(out)
        }
    }
}
