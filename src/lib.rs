use std::collections::BTreeMap;
use thiserror::Error;

/// Returned when the n-gram window size is zero; a zero-width window has no
/// meaningful entropy and is treated as a caller error rather than 0.0.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("n-gram window size must be at least 1")]
pub struct NgramSizeError;

/// Compute Shannon entropy of a string tokenized into sliding n-grams.
///
/// Windows are `n` characters wide and overlap; entropy is in bits
/// (log base 2). Inputs shorter than `n` produce no windows and yield 0.0.
pub fn shannon_entropy(input: &str, n: usize) -> Result<f64, NgramSizeError> {
    if n == 0 { return Err(NgramSizeError) }
    let chars: Vec<char> = input.chars().collect();
    if chars.len() < n { return Ok(0.0) }

    // BTreeMap keeps the summation order fixed so results are bit-reproducible
    let mut freq: BTreeMap<&[char], usize> = BTreeMap::new();
    for window in chars.windows(n) {
        *freq.entry(window).or_insert(0usize) += 1;
    }

    let total = (chars.len() - n + 1) as f64;
    let mut ent = 0f64;
    for &count in freq.values() {
        let p = (count as f64) / total;
        ent -= p * p.log2();
    }
    Ok(ent)
}
