//! Dynamic `max_tokens` budget computation.

use crate::service::{AddRule, MaxTokensPolicy, Measure};
use crate::types::{Params, Value};

/// Compute the token budget: `base + Σ rule contributions`, then clamped into
/// `[min, max]` for the bounds that are set (non-zero).
///
/// Arithmetic saturates, so an oversized parameter lands on `max` instead of
/// wrapping.
pub fn compute_max_tokens(policy: &MaxTokensPolicy, params: &Params) -> i64 {
    let mut total = policy.base;
    for rule in &policy.add {
        total = total.saturating_add(rule_contribution(rule, params));
    }

    if policy.min > 0 && total < policy.min {
        total = policy.min;
    }
    if policy.max > 0 && total > policy.max {
        total = policy.max;
    }
    total
}

fn rule_contribution(rule: &AddRule, params: &Params) -> i64 {
    // skip rules whose parameter is absent
    let Some(value) = params.get(&rule.param) else {
        return 0;
    };

    let mut measured = measure(rule.measure, value);
    if rule.multiply > 0.0 {
        measured = (measured as f64 * rule.multiply) as i64;
    }
    measured.saturating_add(rule.add)
}

fn measure(measure: Measure, value: &Value) -> i64 {
    match measure {
        Measure::Length => value.length() as i64,
        Measure::SumItemLength => item_lengths(value).sum::<usize>() as i64,
        Measure::MaxItemLength => item_lengths(value).max().unwrap_or(0) as i64,
        Measure::NumericValue => value.as_f64().map(|n| n as i64).unwrap_or(0),
    }
}

fn item_lengths(value: &Value) -> impl Iterator<Item = usize> + '_ {
    value
        .as_array()
        .unwrap_or(&[])
        .iter()
        .map(|item| item.to_param_string().chars().count())
}
