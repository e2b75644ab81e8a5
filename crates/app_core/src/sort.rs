//! Sort and filter helpers for sidebar directory listings

use app_fs::compare_names;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::SystemTime;

/// Sort key for sub-directory listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DirectorySort {
    /// Ascending by base name
    #[default]
    #[serde(rename = "name")]
    Name,
    /// Newest creation time first
    #[serde(rename = "time")]
    CreatedDesc,
}

/// What the comparators need to know about a directory
#[derive(Debug, Clone, Copy)]
pub struct SortKey<'a> {
    pub name: &'a str,
    pub created: Option<SystemTime>,
}

/// Total order for directories under `sort`.
///
/// A missing creation time counts as the oldest possible value. Equal
/// timestamps fall back to ascending name.
pub fn compare_directories(sort: DirectorySort, a: &SortKey, b: &SortKey) -> Ordering {
    match sort {
        DirectorySort::Name => compare_names(a.name.as_bytes(), b.name.as_bytes()),
        DirectorySort::CreatedDesc => {
            // None < Some(_), so reversing puts unreadable timestamps last
            b.created
                .cmp(&a.created)
                .then_with(|| compare_names(a.name.as_bytes(), b.name.as_bytes()))
        }
    }
}

/// Case-sensitive substring match; an empty filter matches everything
pub fn matches_filter(name: &str, filter: &str) -> bool {
    filter.is_empty() || name.contains(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(secs: u64) -> Option<SystemTime> {
        Some(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
    }

    fn sorted<'a>(sort: DirectorySort, keys: &[SortKey<'a>]) -> Vec<&'a str> {
        let mut keys = keys.to_vec();
        keys.sort_by(|a, b| compare_directories(sort, a, b));
        keys.into_iter().map(|k| k.name).collect()
    }

    #[test]
    fn test_sort_by_name() {
        let keys = [
            SortKey { name: "b", created: at(1) },
            SortKey { name: "B", created: at(2) },
            SortKey { name: "a", created: None },
        ];
        assert_eq!(sorted(DirectorySort::Name, &keys), vec!["B", "a", "b"]);
    }

    #[test]
    fn test_sort_by_time_descending_unreadable_last() {
        let keys = [
            SortKey { name: "old", created: at(10) },
            SortKey { name: "unknown", created: None },
            SortKey { name: "new", created: at(30) },
            SortKey { name: "mid", created: at(20) },
        ];
        assert_eq!(
            sorted(DirectorySort::CreatedDesc, &keys),
            vec!["new", "mid", "old", "unknown"]
        );
    }

    #[test]
    fn test_sort_by_time_ties_use_name() {
        let keys = [
            SortKey { name: "zeta", created: at(5) },
            SortKey { name: "alpha", created: at(5) },
            SortKey { name: "y", created: None },
            SortKey { name: "x", created: None },
        ];
        assert_eq!(
            sorted(DirectorySort::CreatedDesc, &keys),
            vec!["alpha", "zeta", "x", "y"]
        );
    }

    #[test]
    fn test_matches_filter() {
        assert!(matches_filter("Holiday 2023", ""));
        assert!(matches_filter("Holiday 2023", "day"));
        assert!(!matches_filter("Holiday 2023", "holiday"));
        assert!(!matches_filter("cats", "dogs"));
    }
}
