use super::data::Movie;
use super::utils::normalize_title;

/// Indices of movies whose title or director contains `query` (normalized).
/// An empty query keeps everything, in feed order.
pub fn filtered_indices(movies: &[Movie], query: &str) -> Vec<usize> {
    let needle = normalize_title(query);
    if needle.is_empty() {
        return (0..movies.len()).collect();
    }
    movies
        .iter()
        .enumerate()
        .filter(|(_, m)| {
            normalize_title(m.title()).contains(&needle) || normalize_title(m.director()).contains(&needle)
        })
        .map(|(i, _)| i)
        .collect()
}
