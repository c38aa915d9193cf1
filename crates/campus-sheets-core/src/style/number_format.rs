//! Number format types

/// Number format for cell display
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    /// General format (default)
    #[default]
    General,

    /// Built-in format by ID
    BuiltIn(u32),

    /// Custom format string
    Custom(String),
}

impl NumberFormat {
    /// First ID available to custom formats in a workbook
    pub const FIRST_CUSTOM_ID: u32 = 164;

    /// Create a number format from a format string
    ///
    /// Strings that name a built-in format resolve to it, so `"0.00"` and
    /// `BuiltIn(2)` compare equal after a round trip.
    pub fn from_string<S: Into<String>>(format: S) -> Self {
        let format = format.into();
        if format.eq_ignore_ascii_case("general") {
            return NumberFormat::General;
        }
        match Self::builtin_id(&format) {
            Some(id) => NumberFormat::BuiltIn(id),
            None => NumberFormat::Custom(format),
        }
    }

    /// Create a built-in format by ID
    pub fn from_id(id: u32) -> Self {
        if id == 0 {
            NumberFormat::General
        } else {
            NumberFormat::BuiltIn(id)
        }
    }

    /// Get the format string
    pub fn format_string(&self) -> &str {
        match self {
            NumberFormat::General => "General",
            NumberFormat::BuiltIn(id) => Self::builtin_format_string(*id).unwrap_or("General"),
            NumberFormat::Custom(s) => s,
        }
    }

    fn builtin_format_string(id: u32) -> Option<&'static str> {
        Some(match id {
            0 => "General",
            1 => "0",
            2 => "0.00",
            3 => "#,##0",
            4 => "#,##0.00",
            9 => "0%",
            10 => "0.00%",
            11 => "0.00E+00",
            12 => "# ?/?",
            13 => "# ??/??",
            14 => "mm-dd-yy",
            15 => "d-mmm-yy",
            16 => "d-mmm",
            17 => "mmm-yy",
            18 => "h:mm AM/PM",
            19 => "h:mm:ss AM/PM",
            20 => "h:mm",
            21 => "h:mm:ss",
            22 => "m/d/yy h:mm",
            37 => "#,##0 ;(#,##0)",
            38 => "#,##0 ;[Red](#,##0)",
            39 => "#,##0.00;(#,##0.00)",
            40 => "#,##0.00;[Red](#,##0.00)",
            49 => "@",
            _ => return None,
        })
    }

    fn builtin_id(format: &str) -> Option<u32> {
        (1..=49).find(|id| Self::builtin_format_string(*id) == Some(format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_strings_resolve_to_ids() {
        assert_eq!(NumberFormat::from_string("0.00"), NumberFormat::BuiltIn(2));
        assert_eq!(NumberFormat::from_string("General"), NumberFormat::General);
        assert_eq!(
            NumberFormat::from_string("yyyy-mm-dd"),
            NumberFormat::Custom("yyyy-mm-dd".into())
        );
        assert_eq!(NumberFormat::from_id(0), NumberFormat::General);
        assert_eq!(NumberFormat::BuiltIn(49).format_string(), "@");
    }
}
