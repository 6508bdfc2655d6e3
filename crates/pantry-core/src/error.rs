use std::fmt;

/// Machine-readable error codes for scripting against the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    MalformedDataFile,
    DataFileWriteFailed,
    ExportWriteFailed,
}

impl ErrorCode {
    /// Every code, in numeric order.
    pub const ALL: [Self; 4] = [
        Self::ConfigParseError,
        Self::MalformedDataFile,
        Self::DataFileWriteFailed,
        Self::ExportWriteFailed,
    ];

    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::MalformedDataFile => "E3001",
            Self::DataFileWriteFailed => "E5001",
            Self::ExportWriteFailed => "E5002",
        }
    }

    /// Optional remediation hint that can be surfaced to the operator.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .pantry/config.toml and retry."),
            Self::MalformedDataFile => {
                Some("Check the header is `name,quantity,category,expiry` and dates are YYYY-MM-DD.")
            }
            Self::DataFileWriteFailed | Self::ExportWriteFailed => {
                Some("Check disk space and write permissions.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique_and_hinted() {
        let mut seen = HashSet::new();
        for code in ErrorCode::ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
            assert!(code.hint().is_some(), "{} has no hint", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ErrorCode::ALL {
            let code = code.code();
            assert_eq!(code.len(), 5);
            assert!(code.starts_with('E'));
            assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn display_uses_code() {
        assert_eq!(ErrorCode::MalformedDataFile.to_string(), "E3001");
    }
}
