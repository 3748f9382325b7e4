//! Task id generation and resolution
//!
//! Ids are `task-` prefixed UUIDv7 strings. The v7 layout puts a millisecond
//! timestamp ahead of 74 cryptographically random bits, so ids sort roughly
//! by creation time and collide only with negligible probability.

use uuid::Uuid;

/// Generate a fresh task id
pub fn generate_id() -> String {
    format!("task-{}", Uuid::now_v7())
}

/// Resolve user-supplied id references (full id or unique prefix)
pub struct IdResolver<'a> {
    ids: Vec<&'a str>,
}

impl<'a> IdResolver<'a> {
    pub fn new(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Resolve a reference to a full id
    ///
    /// Returns:
    /// - Ok(Some(id)) if exactly one match
    /// - Ok(None) if no matches
    /// - Err with candidates if ambiguous
    pub fn resolve(&self, reference: &str) -> Result<Option<&'a str>, Vec<&'a str>> {
        if let Some(&exact) = self.ids.iter().find(|id| **id == reference) {
            return Ok(Some(exact));
        }

        let matches: Vec<&'a str> = self
            .ids
            .iter()
            .copied()
            .filter(|id| id.starts_with(reference))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(Some(matches[0])),
            _ => Err(matches),
        }
    }
}
