//! Workflow options, loadable from TOML
//!
//! ```toml
//! header_rows = 3
//! name_column = "A"
//! output = "processed_colleges.xlsx"
//!
//! [oracle]
//! provider = "alias"
//!
//! [oracle.aliases]
//! "Massachusetts Institute of Technology" = "MIT"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use campus_sheets_core::{CellAddress, Color, FillStyle, MAX_COLS, MAX_ROWS};
use serde::Deserialize;

use crate::error::{ReconcileError, ReconcileResult};
use crate::sheet_reader::SheetLayout;

pub const DEFAULT_OUTPUT: &str = "processed_colleges.xlsx";
pub const DEFAULT_SHEET_NAME: &str = "Sheet";
pub const DEFAULT_MATCH_COLOR: &str = "03FDFD";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-preview-04-17";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A column given as a 1-based number or as letters ("A", "AB")
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    Number(u32),
    Letters(String),
}

impl ColumnRef {
    /// The 1-based column number
    pub fn resolve(&self) -> ReconcileResult<u16> {
        let column = match self {
            ColumnRef::Number(n) => *n,
            ColumnRef::Letters(letters) => CellAddress::letters_to_column(letters.trim())
                .map(|col| col as u32 + 1)
                .map_err(|_| {
                    ReconcileError::InvalidOptions(format!(
                        "'{}' is not a column (expected letters like A or a number)",
                        letters
                    ))
                })?,
        };

        if column == 0 || column > MAX_COLS as u32 {
            return Err(ReconcileError::InvalidOptions(format!(
                "name column {} is outside 1..={}",
                column, MAX_COLS
            )));
        }
        Ok(column as u16)
    }
}

impl Default for ColumnRef {
    fn default() -> Self {
        ColumnRef::Number(1)
    }
}

impl FromStr for ColumnRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<u32>() {
            Ok(n) => ColumnRef::Number(n),
            Err(_) => ColumnRef::Letters(s.to_string()),
        })
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Number(n) => write!(f, "{}", n),
            ColumnRef::Letters(letters) => write!(f, "{}", letters),
        }
    }
}

/// Which oracle normalizes candidate names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleProvider {
    #[default]
    Gemini,
    Alias,
    None,
}

impl FromStr for OracleProvider {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(OracleProvider::Gemini),
            "alias" => Ok(OracleProvider::Alias),
            "none" => Ok(OracleProvider::None),
            other => Err(ReconcileError::InvalidOptions(format!(
                "unknown oracle '{}' (expected gemini, alias or none)",
                other
            ))),
        }
    }
}

/// The `[oracle]` table
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OracleOptions {
    pub provider: OracleProvider,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub endpoint: String,
    pub timeout_secs: u64,
    /// `alias -> canonical` pairs for the alias oracle
    pub aliases: BTreeMap<String, String>,
}

impl Default for OracleOptions {
    fn default() -> Self {
        Self {
            provider: OracleProvider::default(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            timeout_secs: 60,
            aliases: BTreeMap::new(),
        }
    }
}

/// Everything a workflow run can be configured with
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    /// Rows copied verbatim above the data
    pub header_rows: u32,
    /// Column holding college names
    pub name_column: ColumnRef,
    /// First data row, `header_rows + 1` when unset
    pub data_start_row: Option<u32>,
    /// Output file name
    pub output: String,
    /// Name of the sheet written to the output
    pub sheet_name: String,
    /// Fill for matched names, as hex RGB
    pub match_color: String,
    pub oracle: OracleOptions,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            header_rows: 3,
            name_column: ColumnRef::default(),
            data_start_row: None,
            output: DEFAULT_OUTPUT.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            match_color: DEFAULT_MATCH_COLOR.to_string(),
            oracle: OracleOptions::default(),
        }
    }
}

impl ReconcileOptions {
    /// Parse options from TOML text; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> ReconcileResult<Self> {
        toml::from_str(text).map_err(|e| ReconcileError::InvalidOptions(e.to_string()))
    }

    /// Load options from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> ReconcileResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ReconcileError::InvalidOptions(format!("cannot read {}: {}", path.display(), e))
        })?;
        log::debug!("loaded options from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Check the options and resolve the sheet layout
    pub fn validate(&self) -> ReconcileResult<SheetLayout> {
        let name_column = self.name_column.resolve()?;

        if self.header_rows >= MAX_ROWS {
            return Err(ReconcileError::InvalidOptions(format!(
                "header_rows {} leaves no room for data",
                self.header_rows
            )));
        }

        let data_start_row = self.data_start_row.unwrap_or(self.header_rows + 1);
        if data_start_row == 0 {
            return Err(ReconcileError::InvalidOptions(
                "data_start_row is 1-based and cannot be 0".into(),
            ));
        }
        if data_start_row <= self.header_rows {
            return Err(ReconcileError::InvalidOptions(format!(
                "data_start_row {} is inside the {} header rows",
                data_start_row, self.header_rows
            )));
        }

        if self.sheet_name.trim().is_empty() {
            return Err(ReconcileError::InvalidOptions(
                "sheet_name cannot be empty".into(),
            ));
        }
        self.match_fill()?;

        Ok(SheetLayout {
            header_rows: self.header_rows,
            data_start_row,
            name_column,
        })
    }

    /// Solid fill for matched name cells
    pub fn match_fill(&self) -> ReconcileResult<FillStyle> {
        Color::from_hex(self.match_color.trim_start_matches('#'))
            .map(FillStyle::solid)
            .ok_or_else(|| {
                ReconcileError::InvalidOptions(format!(
                    "match_color '{}' is not a hex color",
                    self.match_color
                ))
            })
    }
}
