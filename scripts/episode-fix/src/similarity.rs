//! Fuzzy ratio between two normalized strings.

/// Similarity on a 0–100 scale: `2 * M / (|a| + |b|)` where `M` is the length
/// of the longest common subsequence, rounded to the nearest integer.
///
/// Symmetric; identical strings (including two empty ones) score 100.
pub fn similarity_score(a: &str, b: &str) -> u8 {
    (sequence_ratio(a, b) * 100.0).round() as u8
}

pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let lcs = lcs_length(&a, &b);
    (2.0 * lcs as f64) / (a.len() as f64 + b.len() as f64)
}

fn lcs_length(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ch_a in a {
        for (j, &ch_b) in b.iter().enumerate() {
            curr[j + 1] = if ch_a == ch_b {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_100() {
        assert_eq!(similarity_score("the one with the robbery", "the one with the robbery"), 100);
        assert_eq!(similarity_score("", ""), 100);
    }

    #[test]
    fn disjoint_strings_score_0() {
        assert_eq!(similarity_score("abc", "xyz"), 0);
        assert_eq!(similarity_score("abc", ""), 0);
    }

    #[test]
    fn score_is_symmetric() {
        let pairs = [
            ("03 the one with the robbery", "the one with the robbery"),
            ("pilot", "the pilot episode"),
            ("kitten", "sitting"),
        ];
        for (a, b) in pairs {
            assert_eq!(similarity_score(a, b), similarity_score(b, a));
        }
    }

    #[test]
    fn numbered_prefix_still_scores_high() {
        // 2 * 24 / (27 + 24)
        assert_eq!(similarity_score("03 the one with the robbery", "the one with the robbery"), 94);
    }

    #[test]
    fn partial_overlap() {
        // lcs("kitten", "sitting") = "ittn"
        assert_eq!(lcs_length(&['k', 'i', 't', 't', 'e', 'n'], &['s', 'i', 't', 't', 'i', 'n', 'g']), 4);
        assert_eq!(similarity_score("kitten", "sitting"), 62);
    }
}
