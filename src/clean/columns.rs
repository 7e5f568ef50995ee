use anyhow::{bail, Result};
use std::collections::HashMap;

/// What to do when two headers normalise to the same name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CollisionPolicy {
    /// Fail the step, naming both source headers.
    #[default]
    Reject,
    /// Keep the duplicate names; the output then has repeated header cells.
    Allow,
}

/// Lowercase and replace every space with an underscore.
pub fn normalize_column(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Normalise all headers in order, enforcing `policy` on collisions.
pub fn normalize_headers(headers: &[String], policy: CollisionPolicy) -> Result<Vec<String>> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_column(h)).collect();

    if policy == CollisionPolicy::Reject {
        let mut seen: HashMap<&str, &str> = HashMap::with_capacity(headers.len());
        for (norm, original) in normalized.iter().zip(headers) {
            if let Some(first) = seen.insert(norm.as_str(), original.as_str()) {
                bail!(
                    "columns {:?} and {:?} both normalize to {:?}",
                    first,
                    original,
                    norm
                );
            }
        }
    }

    Ok(normalized)
}
