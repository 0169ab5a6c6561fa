//! "Did you mean" suggestions for unknown minigame names

/// Maximum edit distance for a name to count as similar
const DISTANCE_THRESHOLD: usize = 3;

/// Maximum number of suggestions returned
const MAX_SUGGESTIONS: usize = 3;

/// Ids within a small edit distance of `query`, closest first.
pub fn find_similar<T, F>(query: &str, items: &[T], get_id: F) -> Vec<String>
where
    F: Fn(&T) -> &str,
{
    let mut matches: Vec<(&str, usize)> = items
        .iter()
        .map(|item| {
            let id = get_id(item);
            (id, levenshtein_distance(query, id))
        })
        .filter(|(_, dist)| *dist <= DISTANCE_THRESHOLD)
        .collect();

    // Stable sort keeps registration order among equal distances
    matches.sort_by_key(|(_, dist)| *dist);
    matches
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(id, _)| id.to_string())
        .collect()
}

/// Levenshtein distance between two strings, by `char`.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != *cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
        }
    }

    row[b.len()]
}
