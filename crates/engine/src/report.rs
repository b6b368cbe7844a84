//! Frequency summaries of skipped type tokens.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

/// Count each distinct token and order by count, then by token, both
/// descending.
pub fn condense<T, I>(tokens: I) -> Vec<(T, usize)>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash + Ord,
{
    let mut freq: HashMap<T, usize> = HashMap::new();
    for token in tokens {
        *freq.entry(token).or_insert(0) += 1;
    }

    let mut sorted: Vec<(T, usize)> = freq.into_iter().collect();
    sorted.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
    sorted
}

/// `token -> (count)` lines, one per condensed entry.
pub fn format_condensed<T: Display>(condensed: &[(T, usize)]) -> Vec<String> {
    condensed
        .iter()
        .map(|(token, count)| format!("{} -> ({})", token, count))
        .collect()
}
