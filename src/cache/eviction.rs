//! Eviction Module
//!
//! Frequency-biased victim selection for a full cache.
//!
//! Victims are the lowest quarter of keys ranked by `access_count`. This is an
//! approximation of least-frequently-used eviction, not strict LRU. Keys with
//! equal counts are ranked in `HashMap` iteration order, which is
//! implementation-defined and varies between runs; callers must not rely on
//! which of several tied keys goes first.

use std::collections::HashMap;

use crate::cache::CacheEntry;

// == Quartile Victims ==
/// Returns the keys to evict: the `len / 4` entries with the lowest access count.
///
/// An empty map or one with fewer than four entries yields no victims.
pub fn quartile_victims<V>(entries: &HashMap<String, CacheEntry<V>>) -> Vec<String> {
    let quota = entries.len() / 4;
    if quota == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(&String, u64)> = entries
        .iter()
        .map(|(key, entry)| (key, entry.access_count))
        .collect();
    ranked.sort_by_key(|(_, count)| *count);

    ranked
        .into_iter()
        .take(quota)
        .map(|(key, _)| key.clone())
        .collect()
}

// == Least Accessed ==
/// Returns the single key with the lowest access count, if any.
pub fn least_accessed<V>(entries: &HashMap<String, CacheEntry<V>>) -> Option<String> {
    entries
        .iter()
        .min_by_key(|(_, entry)| entry.access_count)
        .map(|(key, _)| key.clone())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn entries_with_counts(counts: &[(&str, u64)]) -> HashMap<String, CacheEntry<()>> {
        counts
            .iter()
            .map(|(key, count)| {
                let mut entry = CacheEntry::new(());
                entry.access_count = *count;
                (key.to_string(), entry)
            })
            .collect()
    }

    #[test]
    fn test_empty_map_has_no_victims() {
        let entries = entries_with_counts(&[]);
        assert!(quartile_victims(&entries).is_empty());
        assert!(least_accessed(&entries).is_none());
    }

    #[test]
    fn test_fewer_than_four_entries_evicts_zero() {
        let entries = entries_with_counts(&[("a", 1), ("b", 5), ("c", 9)]);
        assert!(quartile_victims(&entries).is_empty());
    }

    #[test]
    fn test_quartile_picks_lowest_counts() {
        let entries = entries_with_counts(&[
            ("a", 7),
            ("b", 1),
            ("c", 4),
            ("d", 2),
            ("e", 9),
            ("f", 3),
            ("g", 8),
            ("h", 6),
        ]);

        let mut victims = quartile_victims(&entries);
        victims.sort();
        assert_eq!(victims, vec!["b".to_string(), "d".to_string()]);
    }

    #[test]
    fn test_quartile_rounds_down() {
        let entries = entries_with_counts(&[
            ("a", 1),
            ("b", 2),
            ("c", 3),
            ("d", 4),
            ("e", 5),
            ("f", 6),
            ("g", 7),
        ]);

        assert_eq!(quartile_victims(&entries), vec!["a".to_string()]);
    }

    #[test]
    fn test_least_accessed() {
        let entries = entries_with_counts(&[("a", 3), ("b", 1), ("c", 2)]);
        assert_eq!(least_accessed(&entries), Some("b".to_string()));
    }
}
