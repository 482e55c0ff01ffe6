use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Location of the rule file when the caller does not name one.
pub const DEFAULT_RULES_PATH: &str = "rules.json";

/// Reasons a rule file could not be turned into a [`RuleTable`].
#[derive(Debug, thiserror::Error)]
pub enum RulesLoadError {
    #[error("rules file not found at {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read rules file {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse rules JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid rules file: missing 'rules' object")]
    MissingRules,
    #[error("invalid mapping for token '{token}'")]
    InvalidMapping { token: String },
    #[error("weight for '{token}' -> '{condition}' must be a positive integer")]
    InvalidWeight { token: String, condition: String },
}

/// Single weighted vote a symptom token casts for a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionWeight {
    pub condition: String,
    pub weight: u64,
}

/// Immutable token -> condition -> weight lookup.
///
/// Tokens are stored lowercased and trimmed. Each token keeps its conditions
/// in the order the rule file lists them so accumulation order is stable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleTable {
    rules: BTreeMap<String, Vec<ConditionWeight>>,
}

impl RuleTable {
    /// Minimal table substituted when the rule file cannot be loaded.
    pub fn fallback() -> Self {
        let mut rules = BTreeMap::new();
        rules.insert(
            "chest pain".to_string(),
            vec![ConditionWeight {
                condition: "Ischemic Heart Disease".to_string(),
                weight: 5,
            }],
        );
        rules.insert(
            "fever".to_string(),
            vec![ConditionWeight {
                condition: "Community-Acquired Pneumonia".to_string(),
                weight: 3,
            }],
        );
        Self { rules }
    }

    /// Read and validate a rule file. `None` resolves to [`DEFAULT_RULES_PATH`].
    pub fn load(path: Option<&Path>) -> Result<Self, RulesLoadError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_RULES_PATH));

        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
                return Err(RulesLoadError::NotFound { path });
            }
            Err(source) => {
                return Err(RulesLoadError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let table = Self::from_json_str(&raw)?;
        debug!(path = %path.display(), tokens = table.len(), "rule table loaded");
        Ok(table)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, RulesLoadError> {
        let document: Value = serde_json::from_str(raw)?;
        Self::from_value(&document)
    }

    /// Validate an already-parsed rule document. `version` and `metadata` are ignored.
    pub fn from_value(document: &Value) -> Result<Self, RulesLoadError> {
        let raw_rules = document
            .get("rules")
            .and_then(Value::as_object)
            .ok_or(RulesLoadError::MissingRules)?;

        let mut rules = BTreeMap::new();
        for (token, mapping) in raw_rules {
            let mapping = mapping
                .as_object()
                .ok_or_else(|| RulesLoadError::InvalidMapping {
                    token: token.clone(),
                })?;
            let weights = parse_weights(token, mapping)?;
            rules.insert(normalize_token(token), weights);
        }

        Ok(Self { rules })
    }

    pub fn get(&self, token: &str) -> Option<&[ConditionWeight]> {
        self.rules.get(token).map(Vec::as_slice)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.rules.contains_key(token)
    }

    /// Normalized tokens in lexical order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn parse_weights(
    token: &str,
    mapping: &Map<String, Value>,
) -> Result<Vec<ConditionWeight>, RulesLoadError> {
    let mut weights: Vec<ConditionWeight> = Vec::with_capacity(mapping.len());
    for (condition, weight) in mapping {
        let weight = weight
            .as_u64()
            .filter(|weight| *weight > 0)
            .ok_or_else(|| RulesLoadError::InvalidWeight {
                token: token.to_string(),
                condition: condition.clone(),
            })?;

        let condition = condition.trim().to_string();
        // Names that collide after trimming keep their first position and the later weight.
        match weights.iter_mut().find(|entry| entry.condition == condition) {
            Some(existing) => existing.weight = weight,
            None => weights.push(ConditionWeight { condition, weight }),
        }
    }
    Ok(weights)
}

/// Lowercase and trim a symptom string into a lookup token.
pub fn normalize_token(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Where the active rule table came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleSource {
    File { path: PathBuf },
    Fallback { reason: String },
}

impl RuleSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, RuleSource::Fallback { .. })
    }
}

/// File-backed provider of the rule table with a degrade-don't-halt fallback.
#[derive(Debug, Clone)]
pub struct RulesStore {
    path: PathBuf,
}

impl Default for RulesStore {
    fn default() -> Self {
        Self::new(DEFAULT_RULES_PATH)
    }
}

impl RulesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<RuleTable, RulesLoadError> {
        RuleTable::load(Some(&self.path))
    }

    /// Load the table, substituting [`RuleTable::fallback`] on any error.
    pub fn load_or_fallback(&self) -> (RuleTable, RuleSource) {
        match self.load() {
            Ok(table) => (
                table,
                RuleSource::File {
                    path: self.path.clone(),
                },
            ),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "falling back to built-in rule table");
                (
                    RuleTable::fallback(),
                    RuleSource::Fallback {
                        reason: err.to_string(),
                    },
                )
            }
        }
    }
}
