use serde::Serialize;

/// Highest severity a caller may report.
pub const MAX_SEVERITY: u8 = 10;

/// Coarse band shown next to the numeric severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    Mild,
    Moderate,
    Severe,
}

impl SeverityBand {
    pub fn from_severity(severity: u8) -> Self {
        match severity {
            0..=3 => Self::Mild,
            4..=6 => Self::Moderate,
            _ => Self::Severe,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeverityBand::Mild => "Mild",
            SeverityBand::Moderate => "Moderate",
            SeverityBand::Severe => "Severe",
        }
    }
}
