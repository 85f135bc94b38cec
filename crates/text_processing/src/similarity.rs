//! Similarity primitives for fuzzy catalog matching
//!
//! - Bounded Levenshtein distance over chars with early abort
//! - Bigram Jaccard similarity
//! - Consonant signature, a cheap phonetic key
//!
//! All functions are pure and expect already-normalized input.

use std::collections::HashSet;

/// Edit budget for a token of `len` chars
///
/// Short tokens must match exactly; longer ones tolerate more typos.
pub fn max_edits_for(len: usize) -> usize {
    match len {
        0..=3 => 0,
        4..=5 => 1,
        6..=8 => 2,
        9..=12 => 3,
        _ => 4,
    }
}

/// Unbounded Levenshtein distance over chars
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev_row: Vec<usize> = (0..=b.len()).collect();
    let mut curr_row: Vec<usize> = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr_row[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr_row[j] = (prev_row[j] + 1)
                .min(curr_row[j - 1] + 1)
                .min(prev_row[j - 1] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b.len()]
}

/// Levenshtein distance if it does not exceed `max`
///
/// Gives up as soon as a whole DP row exceeds `max`; no later row can come
/// back under it.
pub fn edit_distance_within(a: &str, b: &str, max: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.len().abs_diff(b.len()) > max {
        return None;
    }
    if a.is_empty() || b.is_empty() {
        let distance = a.len().max(b.len());
        return (distance <= max).then_some(distance);
    }

    let mut prev_row: Vec<usize> = (0..=b.len()).collect();
    let mut curr_row: Vec<usize> = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr_row[0] = i;
        let mut row_min = curr_row[0];
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr_row[j] = (prev_row[j] + 1)
                .min(curr_row[j - 1] + 1)
                .min(prev_row[j - 1] + cost);
            row_min = row_min.min(curr_row[j]);
        }
        if row_min > max {
            return None;
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    let distance = prev_row[b.len()];
    (distance <= max).then_some(distance)
}

fn bigrams(text: &str) -> HashSet<String> {
    let chars: Vec<char> = text.chars().collect();
    match chars.len() {
        0 => HashSet::new(),
        1 => std::iter::once(text.to_string()).collect(),
        _ => chars.windows(2).map(|w| w.iter().collect()).collect(),
    }
}

/// Jaccard similarity of the two strings' bigram sets, in [0, 1]
///
/// Strings shorter than two chars count as a single gram. Returns 0 when
/// either side is empty.
pub fn bigram_similarity(a: &str, b: &str) -> f64 {
    let left = bigrams(a);
    let right = bigrams(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let intersection = left.intersection(&right).count();
    let union = left.union(&right).count();
    intersection as f64 / union as f64
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Consonant signature of a text
///
/// Keeps letters and digits, drops every vowel except a leading one, then
/// collapses immediate repeats: "samsung" → "smsng", "kuuler" → "klr".
pub fn consonant_signature(text: &str) -> String {
    let mut signature = String::with_capacity(text.len());
    let mut last: Option<char> = None;

    for (i, c) in text
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .enumerate()
    {
        if i > 0 && is_vowel(c) {
            continue;
        }
        if last == Some(c) {
            continue;
        }
        signature.push(c);
        last = Some(c);
    }

    signature
}
