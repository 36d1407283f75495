//! Legal term glossary: search and the built-in seed set.

mod seed;

pub use seed::seed_terms;

use crate::types::LegalTerm;

/// Whether `term` mentions `needle` in its term, definition, or category.
/// `needle` must already be lowercase.
fn matches(term: &LegalTerm, needle: &str) -> bool {
  term.term.to_lowercase().contains(needle)
    || term.definition.to_lowercase().contains(needle)
    || term.category.to_lowercase().contains(needle)
}

/// Terms containing the search string, case-insensitively, in their original
/// order. The query is matched as typed; only an empty query matches
/// everything.
pub fn filter_terms<'a>(terms: &'a [LegalTerm], query: &str) -> Vec<&'a LegalTerm> {
  if query.is_empty() {
    return terms.iter().collect();
  }
  let needle = query.to_lowercase();
  terms.iter().filter(|t| matches(t, &needle)).collect()
}

/// Alphabetical by term, ignoring case.
pub fn sort_terms(terms: &mut [LegalTerm]) {
  terms.sort_by_cached_key(|t| t.term.to_lowercase());
}
