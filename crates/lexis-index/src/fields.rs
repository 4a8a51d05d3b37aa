//! Field weight multipliers.
//!
//! Every occurrence of a term is counted once, but the (term, document) pair remembers the
//! highest multiplier of any field it appeared in. Repeated fields (`authors_0`,
//! `authors_1`, ...) share the weight of their base name.

use std::collections::{BTreeMap, HashMap};

/// Multiplier for fields without a configured weight.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Built-in weights by base field name.
const BUILTIN_WEIGHTS: [(&str, f64); 7] = [
    ("title", 3.0),
    ("abstract", 2.0),
    ("categories", 1.5),
    ("authors", 1.5),
    ("journal", 1.2),
    ("publisher", 1.0),
    ("body", 1.0),
];

/// Lookup table from field name to multiplier.
#[derive(Debug, Clone)]
pub struct FieldWeights {
    /// Base field name -> multiplier.
    weights: HashMap<String, f64>,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            weights: BUILTIN_WEIGHTS
                .iter()
                .map(|(name, weight)| ((*name).to_string(), *weight))
                .collect(),
        }
    }
}

impl FieldWeights {
    /// Built-in weights with configured overrides applied on top.
    pub fn with_overrides(overrides: &BTreeMap<String, f64>) -> Self {
        let mut weights = Self::default();
        for (name, weight) in overrides {
            weights.weights.insert(name.clone(), *weight);
        }
        weights
    }

    /// Multiplier for a field, after stripping any `_N` suffix.
    pub fn weight(&self, field: &str) -> f64 {
        self.weights
            .get(base_name(field))
            .copied()
            .unwrap_or(DEFAULT_WEIGHT)
    }
}

/// Strips a trailing `_<digits>` suffix from a field name.
pub fn base_name(field: &str) -> &str {
    if let Some((base, suffix)) = field.rsplit_once('_')
        && !base.is_empty()
        && !suffix.is_empty()
        && suffix.bytes().all(|b| b.is_ascii_digit())
    {
        return base;
    }
    field
}
