use std::collections::HashMap;

/// Find the column matching the first candidate header, ignoring case.
///
/// Candidate order decides, not column order. If two columns differ only in
/// case, the later one is returned.
pub fn resolve_column<S: AsRef<str>>(columns: &[String], candidates: &[S]) -> Option<usize> {
    let by_lower: HashMap<String, usize> = columns
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.to_lowercase(), idx))
        .collect();

    candidates
        .iter()
        .find_map(|candidate| by_lower.get(&candidate.as_ref().to_lowercase()).copied())
}
