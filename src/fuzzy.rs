//! Subsequence matching used by the endpoint filter.

/// Case-insensitive ordered-subsequence match.
///
/// Returns the sum of the haystack character indices at which each needle
/// character was found (leftmost match), so lower is better. An empty needle
/// always matches with score 0; `None` means the needle is not a subsequence.
pub fn fuzzy_match_score(needle: &str, haystack: &str) -> Option<usize> {
    let needle: Vec<char> = needle.to_lowercase().chars().collect();
    if needle.is_empty() {
        return Some(0);
    }

    let mut score = 0;
    let mut next = 0;
    for (i, c) in haystack.to_lowercase().chars().enumerate() {
        if c == needle[next] {
            score += i;
            next += 1;
            if next == needle.len() {
                return Some(score);
            }
        }
    }
    None
}

/// Ranks candidates against a filter string.
///
/// The needle is trimmed first; a blank needle keeps every candidate in its
/// original order. Otherwise only matches survive, ordered by ascending score
/// and then by ascending candidate index.
pub fn rank<'a, I>(needle: &str, candidates: I) -> Vec<usize>
where
    I: IntoIterator<Item = (usize, &'a str)>,
{
    let needle = needle.trim();
    if needle.is_empty() {
        return candidates.into_iter().map(|(idx, _)| idx).collect();
    }

    let mut scored: Vec<(usize, usize)> = candidates
        .into_iter()
        .filter_map(|(idx, text)| fuzzy_match_score(needle, text).map(|score| (score, idx)))
        .collect();
    scored.sort_unstable();
    scored.into_iter().map(|(_, idx)| idx).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_needle_always_matches_with_zero() {
        assert_eq!(fuzzy_match_score("", "anything"), Some(0));
        assert_eq!(fuzzy_match_score("", ""), Some(0));
    }

    #[test]
    fn subsequences_match_and_others_do_not() {
        assert!(fuzzy_match_score("gusr", "get /users").is_some());
        assert!(fuzzy_match_score("GET", "get /users").is_some());
        assert!(fuzzy_match_score("sru", "get /users").is_none());
        assert!(fuzzy_match_score("xyz", "get /users").is_none());
        assert!(fuzzy_match_score("users!", "get /users").is_none());
    }

    #[test]
    fn score_sums_leftmost_indices() {
        // g=0, u=5
        assert_eq!(fuzzy_match_score("gu", "get /users"), Some(5));
        // e=1, then the first s after it at 6
        assert_eq!(fuzzy_match_score("es", "get /users"), Some(7));
    }

    #[test]
    fn earlier_matches_rank_first_and_ties_keep_catalog_order() {
        let items = ["post /users", "get /users", "get /users/{id}"];
        let ranked = rank("get", items.iter().enumerate().map(|(i, s)| (i, *s)));
        // both GETs score 0+1+2; POST has no 'g'
        assert_eq!(ranked, vec![1, 2]);

        let ranked = rank("users", items.iter().enumerate().map(|(i, s)| (i, *s)));
        // "get /users" matches at 5.. which beats "post /users" at 6..
        assert_eq!(ranked, vec![1, 2, 0]);
    }

    #[test]
    fn blank_needle_keeps_everything_in_order() {
        let items = ["b", "a", "c"];
        let ranked = rank("   ", items.iter().enumerate().map(|(i, s)| (i, *s)));
        assert_eq!(ranked, vec![0, 1, 2]);
    }
}
