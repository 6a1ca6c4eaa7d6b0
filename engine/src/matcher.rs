//! Free-text matching against the knowledge store and symptom rules.

use mediq_types::ConditionRecord;

use crate::knowledge::KnowledgeStore;

/// A fixed symptom-combination rule: fires when every keyword is contained
/// in the normalized input.
#[derive(Debug, Clone, Copy)]
pub struct SymptomRule {
    pub keywords: &'static [&'static str],
    pub response: &'static str,
}

/// Evaluated in order; the first rule whose keywords all match wins.
pub const SYMPTOM_RULES: &[SymptomRule] = &[
    SymptomRule {
        keywords: &["fever", "headache"],
        response: "Having a fever and headache can be symptoms of several \
                   conditions like the flu or other viral infections. Rest and \
                   hydration are important. If it persists, please consult a doctor.",
    },
    SymptomRule {
        keywords: &["sore throat", "cough"],
        response: "A sore throat with a cough is often associated with the common \
                   cold. Gargling with warm salt water can help. If you have a high \
                   fever or difficulty swallowing, see a professional.",
    },
];

/// Outcome of matching one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult<'a> {
    /// The input contained a store key as a substring.
    Condition {
        name: &'a str,
        record: &'a ConditionRecord,
    },
    /// A symptom rule fired; the canned response text.
    Symptom(&'static str),
    /// Nothing matched; the renderer falls back to external references.
    NoMatch,
}

/// Match free text against the store, then the symptom rules.
///
/// Priority order, first match wins:
/// 1. store keys in document order, substring containment over the
///    lowercased input (positional tie-break: the earliest-iterated key
///    that matches wins, even if a later key is longer or more specific);
/// 2. [`SYMPTOM_RULES`] in order, all keywords contained;
/// 3. [`MatchResult::NoMatch`].
///
/// Linear, deterministic, and total: every input produces exactly one
/// result, and the store is never mutated.
#[must_use]
pub fn match_input<'a>(input: &str, store: &'a KnowledgeStore) -> MatchResult<'a> {
    let normalized = input.to_lowercase();

    for (name, record) in store.iter() {
        if normalized.contains(name) {
            return MatchResult::Condition { name, record };
        }
    }

    for rule in SYMPTOM_RULES {
        if rule.keywords.iter().all(|kw| normalized.contains(kw)) {
            return MatchResult::Symptom(rule.response);
        }
    }

    MatchResult::NoMatch
}
