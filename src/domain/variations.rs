//! Single-factor perturbations of an input assignment.

use crate::domain::entities::{InputAssignment, InputValue};

const NUMERIC_STEP: i64 = 10;
const STRING_ALTERNATIVE: &str = "alternative";

/// Produce one or two variations per key of `base`.
///
/// Numbers get `v + 10` then `max(0, v - 10)`; strings flip between empty and
/// `"alternative"`; other values are left alone. Each variation copies `base`
/// and changes exactly one key. Output follows key order.
pub fn generate_variations(base: &InputAssignment) -> Vec<InputAssignment> {
    let mut variations = Vec::new();

    for (key, value) in base {
        let replacements = match value {
            InputValue::Integer(v) => vec![
                InputValue::Integer(v.saturating_add(NUMERIC_STEP)),
                InputValue::Integer(v.saturating_sub(NUMERIC_STEP).max(0)),
            ],
            InputValue::Float(v) => vec![
                InputValue::Float(v + NUMERIC_STEP as f64),
                InputValue::Float((v - NUMERIC_STEP as f64).max(0.0)),
            ],
            InputValue::Text(s) if s.is_empty() => vec![InputValue::from(STRING_ALTERNATIVE)],
            InputValue::Text(_) => vec![InputValue::from("")],
            InputValue::Bool(_) | InputValue::Other(_) => continue,
        };

        for replacement in replacements {
            let mut variation = base.clone();
            variation.insert(key.clone(), replacement);
            variations.push(variation);
        }
    }

    variations
}

/// The sample set sent for reachability analysis: `base` first, then its
/// variations.
pub fn coverage_samples(base: &InputAssignment) -> Vec<InputAssignment> {
    let mut samples = vec![base.clone()];
    samples.extend(generate_variations(base));
    samples
}
