//! Textual similarity between two model answers
//!
//! A deliberately lightweight, deterministic blend of three signals — no
//! embeddings, no network calls — so that consensus tier selection is fully
//! reproducible in tests:
//!
//! 1. **Sequence similarity** (weight 0.4): longest-matching-blocks ratio
//!    over the lower-cased character sequences, matching the behavior of
//!    Python's `difflib.SequenceMatcher.ratio()` including its autojunk rule.
//! 2. **Word overlap** (weight 0.4): Jaccard index over lower-cased,
//!    whitespace-tokenized words.
//! 3. **Length ratio** (weight 0.2): `min(len) / max(len)` in characters.

use std::collections::{HashMap, HashSet};

const SEQUENCE_WEIGHT: f64 = 0.4;
const WORD_OVERLAP_WEIGHT: f64 = 0.4;
const LENGTH_RATIO_WEIGHT: f64 = 0.2;

/// Sequences at least this long get the popular-character filter applied
/// when building the match index.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Blended similarity score between two answers, in `[0, 1]`.
///
/// Returns `0.0` if either text is empty, before any scoring.
pub fn response_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();

    let sequence = sequence_ratio(&a_lower, &b_lower);
    let words = word_overlap(&a_lower, &b_lower);
    let length = length_ratio(&a_lower, &b_lower);

    SEQUENCE_WEIGHT * sequence + WORD_OVERLAP_WEIGHT * words + LENGTH_RATIO_WEIGHT * length
}

/// Matching-blocks similarity ratio between two character sequences.
///
/// `2 * M / T`, where `M` is the total size of all matching blocks and `T`
/// the combined length. This is an edit-distance-style block matching, not
/// plain Levenshtein: the longest common block is found first, then the
/// regions to its left and right are matched recursively.
///
/// Case is significant; callers wanting case-insensitive comparison must
/// lower-case first.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let index = match_index(&b);
    let mut matches = 0usize;

    // Worklist of (alo, ahi, blo, bhi) regions still to match. Order of
    // processing doesn't affect the total match count.
    let mut regions = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = regions.pop() {
        let (i, j, size) = longest_match(&a, &b, &index, alo, ahi, blo, bhi);
        if size > 0 {
            matches += size;
            regions.push((alo, i, blo, j));
            regions.push((i + size, ahi, j + size, bhi));
        }
    }

    2.0 * matches as f64 / total as f64
}

/// Jaccard index over whitespace-tokenized words.
fn word_overlap(a: &str, b: &str) -> f64 {
    let words_a: HashSet<&str> = a.split_whitespace().collect();
    let words_b: HashSet<&str> = b.split_whitespace().collect();

    let union = words_a.union(&words_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = words_a.intersection(&words_b).count();
    intersection as f64 / union as f64
}

/// Ratio of the shorter text's length to the longer's, in characters.
fn length_ratio(a: &str, b: &str) -> f64 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }
    len_a.min(len_b) as f64 / len_a.max(len_b) as f64
}

/// Positions of each character in `b`.
///
/// For long sequences, characters occurring more than `len/100 + 1` times
/// are considered noise and left out of the index. Matching blocks found
/// around them are still extended through them afterwards.
fn match_index(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut index: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &ch) in b.iter().enumerate() {
        index.entry(ch).or_default().push(j);
    }
    if b.len() >= AUTOJUNK_MIN_LEN {
        let popularity_cap = b.len() / 100 + 1;
        index.retain(|_, positions| positions.len() <= popularity_cap);
    }
    index
}

/// Find the longest block of characters matching in `a[alo..ahi]` and
/// `b[blo..bhi]`. Returns `(i, j, size)` with the block at `a[i..i+size]`
/// and `b[j..j+size]`; ties prefer the earliest block in `a`.
fn longest_match(
    a: &[char],
    b: &[char],
    index: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best_i = alo;
    let mut best_j = blo;
    let mut best_size = 0usize;

    // j2len[j] = length of the longest match ending at a[i], b[j]
    let mut j2len: HashMap<usize, usize> = HashMap::new();
    for i in alo..ahi {
        let mut next_j2len = HashMap::new();
        if let Some(positions) = index.get(&a[i]) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = if j > 0 {
                    j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                } else {
                    1
                };
                next_j2len.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        j2len = next_j2len;
    }

    // Extend the block over equal characters the index skipped
    while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
        best_i -= 1;
        best_j -= 1;
        best_size += 1;
    }
    while best_i + best_size < ahi
        && best_j + best_size < bhi
        && a[best_i + best_size] == b[best_j + best_size]
    {
        best_size += 1;
    }

    (best_i, best_j, best_size)
}
