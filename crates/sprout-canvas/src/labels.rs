#![forbid(unsafe_code)]

//! Sibling-unique object labels.
//!
//! Labels compare after trimming surrounding whitespace and are otherwise
//! exact: `"Bed"` and `"bed"` are different labels.

use crate::error::ValidationError;

/// Trim and reject an empty label.
pub fn normalize_label(label: &str) -> Result<&str, ValidationError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyLabel)
    } else {
        Ok(trimmed)
    }
}

/// `base` itself when free, else the first of `"base 2"`, `"base 3"`, …
/// that no existing label uses.
#[must_use]
pub fn unique_label<'a>(base: &str, existing: impl IntoIterator<Item = &'a str> + Clone) -> String {
    let base = base.trim();
    let taken = |candidate: &str| existing.clone().into_iter().any(|l| l.trim() == candidate);
    if !taken(base) {
        return base.to_owned();
    }
    (2u64..)
        .map(|n| format!("{base} {n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_owned())
}

/// `count` labels, distinct from each other and from `existing`.
#[must_use]
pub fn unique_labels(base: &str, count: usize, existing: &[&str]) -> Vec<String> {
    let mut taken: Vec<String> = existing.iter().map(|l| l.trim().to_owned()).collect();
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let label = unique_label(base, taken.iter().map(String::as_str));
        taken.push(label.clone());
        out.push(label);
    }
    out
}
