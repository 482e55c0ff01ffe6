use super::scorer::RankedCondition;
use std::collections::BTreeSet;

/// Severity at or above which an assessment is always critical.
pub const CRITICAL_SEVERITY: u8 = 8;

/// Minimum percentage a critical condition must reach to raise the flag.
pub const CRITICAL_PERCENTAGE: f64 = 85.0;

/// Condition names treated as emergencies out of the box.
pub const DEFAULT_CRITICAL_CONDITIONS: [&str; 5] = [
    "ischemic heart disease",
    "ischemic stroke",
    "sepsis",
    "septic shock",
    "pulmonary embolism",
];

/// Case-insensitive set of high-severity condition names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticalConditions {
    names: BTreeSet<String>,
}

impl Default for CriticalConditions {
    fn default() -> Self {
        Self::from_names(DEFAULT_CRITICAL_CONDITIONS)
    }
}

impl CriticalConditions {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();
        Self { names }
    }

    /// Extend the set with additional names, e.g. from configuration.
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.names.extend(
            extra
                .into_iter()
                .map(|name| name.as_ref().trim().to_lowercase())
                .filter(|name| !name.is_empty()),
        );
        self
    }

    pub fn contains(&self, condition: &str) -> bool {
        self.names.contains(&condition.trim().to_lowercase())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Emergency flag for a ranked result.
    ///
    /// Severity of [`CRITICAL_SEVERITY`] or more is critical regardless of the
    /// ranking. Otherwise a listed condition must score at least
    /// [`CRITICAL_PERCENTAGE`].
    pub fn is_critical(&self, ranked: &[RankedCondition], severity: u8) -> bool {
        if severity >= CRITICAL_SEVERITY {
            return true;
        }

        ranked.iter().any(|entry| {
            entry.percentage >= CRITICAL_PERCENTAGE && self.contains(&entry.condition)
        })
    }
}

/// [`CriticalConditions::is_critical`] against the default condition set.
pub fn is_critical(ranked: &[RankedCondition], severity: u8) -> bool {
    CriticalConditions::default().is_critical(ranked, severity)
}
