/// Edit distance between two character sequences
///
/// Classic Levenshtein with unit costs for insertion, deletion and substitution,
/// computed with two rolling rows.
pub fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Best placement of the shorter string inside the longer one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    /// Start of the window in the longer string (in chars)
    pub offset: usize,
    /// Edit distance between the shorter string and that window
    pub distance: usize,
}

/// Slide a window the size of `shorter` across `longer` and keep the window with
/// the smallest edit distance. Ties keep the leftmost window.
///
/// `shorter` must not be longer than `longer`.
pub fn best_alignment(shorter: &[char], longer: &[char]) -> Alignment {
    debug_assert!(shorter.len() <= longer.len());

    let width = shorter.len();
    let mut best = Alignment {
        offset: 0,
        distance: usize::MAX,
    };

    for offset in 0..=(longer.len() - width) {
        let distance = levenshtein(shorter, &longer[offset..offset + width]);
        if distance < best.distance {
            best = Alignment { offset, distance };
            if distance == 0 {
                break;
            }
        }
    }

    best
}

/// Partial-ratio similarity in `0..=100`
///
/// `round(100 * (1 - d / len(shorter)))` where `d` is the distance of the best
/// alignment of the shorter string within the longer one. Inputs are compared
/// as given; callers lower-case them first. Empty input on either side scores 0.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let alignment = best_alignment(shorter, longer);

    let similarity = 1.0 - alignment.distance as f64 / shorter.len() as f64;
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_levenshtein_known_values() {
        assert_eq!(levenshtein(&chars("kitten"), &chars("sitting")), 3);
        assert_eq!(levenshtein(&chars("flaw"), &chars("lawn")), 2);
        assert_eq!(levenshtein(&chars(""), &chars("abc")), 3);
        assert_eq!(levenshtein(&chars("abc"), &chars("abc")), 0);
    }

    #[test]
    fn test_exact_substring_scores_100() {
        assert_eq!(partial_ratio("python", "sarah chen ml expert python"), 100);
        assert_eq!(partial_ratio("sarah chen", "sarah chen ml expert python"), 100);
    }

    #[test]
    fn test_argument_order_does_not_matter() {
        let text = "bob java dev java";
        assert_eq!(partial_ratio("python", text), partial_ratio(text, "python"));
    }

    #[test]
    fn test_equal_length_is_plain_ratio() {
        // one substitution over three chars
        assert_eq!(partial_ratio("abc", "abd"), 67);
        // transposition costs two edits
        assert_eq!(partial_ratio("pyhton", "python"), 67);
    }

    #[test]
    fn test_disjoint_text_scores_zero() {
        assert_eq!(partial_ratio("xyz", "abcdef"), 0);
    }

    #[test]
    fn test_empty_input_scores_zero() {
        assert_eq!(partial_ratio("", "anything"), 0);
        assert_eq!(partial_ratio("query", ""), 0);
    }

    #[test]
    fn test_typo_scores_between() {
        let score = partial_ratio("pythn", "data science with python");
        assert!(score > 50 && score < 100, "unexpected score {}", score);
    }

    #[test]
    fn test_leftmost_alignment_wins_ties() {
        let alignment = best_alignment(&chars("ab"), &chars("xabab"));
        assert_eq!(alignment, Alignment { offset: 1, distance: 0 });

        let alignment = best_alignment(&chars("zz"), &chars("abcd"));
        assert_eq!(alignment.offset, 0);
        assert_eq!(alignment.distance, 2);
    }

    #[test]
    fn test_unicode_counts_chars() {
        assert_eq!(partial_ratio("josé", "mentor josé garcía"), 100);
    }
}
