use super::rules::normalize_token;
use std::collections::HashSet;

/// Merge a comma-separated symptom line with individually picked symptoms.
///
/// Blank entries are dropped, every entry is normalized into a lookup token,
/// and duplicates keep their first position.
pub fn collect_symptoms<S: AsRef<str>>(free_text: Option<&str>, picked: &[S]) -> Vec<String> {
    let typed = free_text
        .into_iter()
        .flat_map(|line| line.split(','));
    let picked = picked.iter().map(AsRef::as_ref);

    let mut seen = HashSet::new();
    typed
        .chain(picked)
        .map(normalize_token)
        .filter(|token| !token.is_empty())
        .filter(|token| seen.insert(token.clone()))
        .collect()
}
