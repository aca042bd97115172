use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

/// Lower-cased, NFKC-normalized whitespace tokens of a free-text field.
fn tokenize(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|token| token.nfkc().collect::<String>().to_lowercase())
        .collect()
}

/// Jaccard similarity over the token sets of two strings, in [0,1].
/// An empty token set on either side yields 0, not an error.
pub fn jaccard(a: &str, b: &str) -> f64 {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);

    let union = tokens_a.union(&tokens_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = tokens_a.intersection(&tokens_b).count();
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_one() {
        assert_eq!(jaccard("trash dumped near river", "trash dumped near river"), 1.0);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(jaccard("Trash Dumped", "trash dumped"), 1.0);
    }

    #[test]
    fn test_disjoint_strings_score_zero() {
        assert_eq!(jaccard("smoke over factory", "dead fish downstream"), 0.0);
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        assert_eq!(jaccard("", ""), 0.0);
        assert_eq!(jaccard("", "trash"), 0.0);
        assert_eq!(jaccard("   ", "trash"), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let s = "large pile of plastic waste";
        let t = "pile of old tires and plastic";
        assert_eq!(jaccard(s, t), jaccard(t, s));
    }

    #[test]
    fn test_bounded() {
        let score = jaccard("trash near the river bank", "trash on the river bank");
        assert!((0.0..=1.0).contains(&score));
        assert!(score > 0.0 && score < 1.0);
    }

    #[test]
    fn test_partial_overlap_ratio() {
        // Tokens {a, b} vs {b, c}: intersection 1, union 3.
        let score = jaccard("a b", "b c");
        assert!((score - 1.0 / 3.0).abs() < 1e-12);
    }
}
