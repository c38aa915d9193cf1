//! Cell hyperlinks

use std::fmt;

/// Where a hyperlink points
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HyperlinkTarget {
    /// External URI (stored in the sheet's relationships part)
    External(String),
    /// Location inside the workbook, e.g. `Sheet!A1` or a defined name
    Internal(String),
}

/// A hyperlink attached to one cell
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hyperlink {
    /// Link target
    pub target: HyperlinkTarget,
    /// Text shown when hovering over the cell
    pub tooltip: Option<String>,
    /// Display text recorded with the link, if it differs from the cell value
    pub display: Option<String>,
}

impl Hyperlink {
    /// Link to an external URI
    pub fn external<S: Into<String>>(uri: S) -> Self {
        Self {
            target: HyperlinkTarget::External(uri.into()),
            tooltip: None,
            display: None,
        }
    }

    /// Link to a location in the workbook
    pub fn internal<S: Into<String>>(location: S) -> Self {
        Self {
            target: HyperlinkTarget::Internal(location.into()),
            tooltip: None,
            display: None,
        }
    }

    /// Set the tooltip
    pub fn with_tooltip<S: Into<String>>(mut self, tooltip: S) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Set the display text
    pub fn with_display<S: Into<String>>(mut self, display: S) -> Self {
        self.display = Some(display.into());
        self
    }

    /// External URI, if this link leaves the workbook
    pub fn uri(&self) -> Option<&str> {
        match &self.target {
            HyperlinkTarget::External(uri) => Some(uri),
            HyperlinkTarget::Internal(_) => None,
        }
    }

    /// In-workbook location, if any
    pub fn location(&self) -> Option<&str> {
        match &self.target {
            HyperlinkTarget::Internal(location) => Some(location),
            HyperlinkTarget::External(_) => None,
        }
    }
}

impl fmt::Display for Hyperlink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            HyperlinkTarget::External(uri) => write!(f, "{}", uri),
            HyperlinkTarget::Internal(location) => write!(f, "#{}", location),
        }
    }
}
