//! Approximate filename matching.
//!
//! The ratio is the longest-matching-blocks measure: find the longest common
//! run, recurse on the pieces to its left and right, and report
//! `2 * matched / (len_a + len_b)` over characters.

use std::path::Path;
use tracing::debug;

/// Longest common run in `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`.
/// Among equally long runs the one starting earliest in `a`, then in `b`, wins.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);
    // run length ending at b[j] for the previous row of a
    let mut prev = vec![0usize; bhi - blo + 1];
    for i in alo..ahi {
        let mut row = vec![0usize; bhi - blo + 1];
        for j in blo..bhi {
            if a[i] == b[j] {
                let k = prev[j - blo] + 1;
                row[j - blo + 1] = k;
                if k > best_len {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_len = k;
                }
            }
        }
        prev = row;
    }
    (best_i, best_j, best_len)
}

/// Total length of the recursively found matching blocks.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }
    total
}

/// Similarity of two strings in `[0, 1]`; two empty strings score 1.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matched_chars(&a, &b) as f64 / total as f64
}

/// Finds the reference file whose name best matches a generated file's name.
#[derive(Debug, Clone, Copy)]
pub struct CorpusMatcher {
    threshold: f64,
}

impl CorpusMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Best candidate with a ratio at or above the threshold.
    ///
    /// Candidates are visited in name order and a later candidate only wins
    /// with a strictly higher ratio, so equal scores go to the first name.
    /// Python's `difflib.get_close_matches` breaks the same tie the other way,
    /// towards the greatest name.
    pub fn best_match<'a>(&self, file_name: &str, candidates: &'a [String]) -> Option<&'a str> {
        let mut ordered: Vec<&String> = candidates.iter().collect();
        ordered.sort();

        let mut best: Option<(&'a str, f64)> = None;
        for candidate in ordered {
            let ratio = similarity_ratio(candidate, file_name);
            if ratio < self.threshold {
                continue;
            }
            if best.is_none_or(|(_, top)| ratio > top) {
                best = Some((candidate.as_str(), ratio));
            }
        }

        if let Some((name, ratio)) = best {
            debug!(file = file_name, matched = name, ratio, "Reference matched");
        }
        best.map(|(name, _)| name)
    }

    /// List the regular files in `folder` and match against their names.
    /// A missing or unreadable folder has no candidates.
    pub async fn find_match(&self, file_name: &str, folder: &Path) -> Option<String> {
        let candidates = list_file_names(folder, None).await.unwrap_or_default();
        self.best_match(file_name, &candidates).map(str::to_string)
    }
}

/// Names of the regular files in `folder`, optionally filtered by extension.
pub async fn list_file_names(folder: &Path, extension: Option<&str>) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(folder).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let wanted = extension.is_none_or(|ext| {
            Path::new(&name)
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(ext))
        });
        if wanted {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
