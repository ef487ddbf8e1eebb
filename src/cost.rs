//! Token cost estimate.
//!
//! Providers report a single total in some cases, so the split is
//! assumed rather than measured: 60% input, 40% output.

/// USD per million input tokens
pub const INPUT_COST_PER_MTOK: f64 = 3.00;
/// USD per million output tokens
pub const OUTPUT_COST_PER_MTOK: f64 = 15.00;

const INPUT_SHARE: f64 = 0.6;
const OUTPUT_SHARE: f64 = 0.4;

/// Estimated cost for `tokens` total tokens, rounded to 6 decimals
pub fn estimate_cost(tokens: u64) -> f64
{   let tokens = tokens as f64;
    let input_tokens = tokens * INPUT_SHARE;
    let output_tokens = tokens * OUTPUT_SHARE;

    let cost = input_tokens / 1_000_000.0 * INPUT_COST_PER_MTOK
      + output_tokens / 1_000_000.0 * OUTPUT_COST_PER_MTOK;

    round_to(cost, 6)
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64
{   let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
