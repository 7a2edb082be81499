use serde::Serialize;
use std::fmt;

/// How well a project supports Python 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportLevel {
    /// No usable metadata; Python 2 only is assumed
    Unknown,
    LegacyOnly,
    /// Works on both Python 2 and Python 3
    ModernSupported,
    ModernOnly,
}

impl SupportLevel {
    /// Whether the project can be used on Python 3.
    pub fn is_usable(self) -> bool {
        matches!(self, SupportLevel::ModernSupported | SupportLevel::ModernOnly)
    }

    /// Resolve the final level from the two support signals.
    pub fn from_signals(has_legacy: bool, has_modern: bool) -> Self {
        match (has_legacy, has_modern) {
            (true, true) => SupportLevel::ModernSupported,
            (false, true) => SupportLevel::ModernOnly,
            (true, false) => SupportLevel::LegacyOnly,
            (false, false) => SupportLevel::Unknown,
        }
    }
}

impl fmt::Display for SupportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SupportLevel::Unknown => "unknown (Python 2 only assumed)",
            SupportLevel::LegacyOnly => "Python 2 only",
            SupportLevel::ModernSupported => "Python 3 supported",
            SupportLevel::ModernOnly => "Python 3 only",
        };
        f.write_str(text)
    }
}
