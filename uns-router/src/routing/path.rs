/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Pure helpers over `/`-delimited namespace paths.
//!
//! Every function here is total: empty or malformed input yields `None`, `false` or the input
//! unchanged rather than an error.

pub const PATH_SEPARATOR: char = '/';

const MULTI_LEVEL_WILDCARD: &str = "#";
const SINGLE_LEVEL_WILDCARD: char = '+';

/// Returns everything before the last separator, or `None` when the path has a single segment.
///
/// A separator in the first or last position does not split the path.
pub fn parent(path: &str) -> Option<&str> {
    match path.rfind(PATH_SEPARATOR) {
        Some(index) if index > 0 && index < path.len() - 1 => Some(&path[..index]),
        _ => None,
    }
}

/// Returns the segment after the last separator, or the whole path when it cannot be split.
pub fn last_segment(path: &str) -> &str {
    match path.rfind(PATH_SEPARATOR) {
        Some(index) if index > 0 && index < path.len() - 1 => &path[index + 1..],
        _ => path,
    }
}

/// Lazily walks every prefix of a path, from its first non-empty segment to the full path.
///
/// The iterator is `Clone`, so a chain can be restarted without re-parsing.
#[derive(Clone, Debug)]
pub struct AncestorChain<'a> {
    path: &'a str,
    cursor: usize,
}

impl<'a> Iterator for AncestorChain<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor < self.path.len() {
            let start = self.cursor;
            let end = self.path[start..]
                .find(PATH_SEPARATOR)
                .map(|offset| start + offset)
                .unwrap_or(self.path.len());
            self.cursor = end + PATH_SEPARATOR.len_utf8();

            if end > start {
                return Some(&self.path[..end]);
            }
        }

        None
    }
}

/// Returns the prefix chain of `path`; empty for an empty path.
pub fn ancestor_chain(path: &str) -> AncestorChain<'_> {
    AncestorChain { path, cursor: 0 }
}

/// `true` iff the prefixes of `ancestor` are an in-order prefix of those of `path` and `path`
/// has strictly more of them.
pub fn is_descendant_of(ancestor: &str, path: &str) -> bool {
    if ancestor.is_empty() || path.is_empty() {
        return false;
    }

    let mut ancestor_prefixes = ancestor_chain(ancestor);
    let mut path_prefixes = ancestor_chain(path);

    loop {
        match (ancestor_prefixes.next(), path_prefixes.next()) {
            (Some(expected), Some(actual)) => {
                if expected != actual {
                    return false;
                }
            }
            (None, Some(_)) => return true,
            _ => return false,
        }
    }
}

/// Returns the part of `path` after the segments it shares with `base`.
///
/// When `base` is not a segment prefix of `path` the path is returned unchanged.
pub fn relative_to(base: &str, path: &str) -> String {
    if base.is_empty() || path.is_empty() {
        return path.to_string();
    }

    let base_segments: Vec<&str> = base.split(PATH_SEPARATOR).collect();
    let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();

    if segments.len() < base_segments.len()
        || base_segments
            .iter()
            .zip(segments.iter())
            .any(|(expected, actual)| expected != actual)
    {
        return path.to_string();
    }

    segments[base_segments.len()..].join("/")
}

/// Joins path fragments, trimming separators at every boundary and skipping empty fragments.
pub fn join<S: AsRef<str>>(fragments: &[S]) -> String {
    let trimmed: Vec<&str> = fragments
        .iter()
        .map(AsRef::as_ref)
        .enumerate()
        .filter(|(_, fragment)| !fragment.is_empty())
        .map(|(index, fragment)| {
            if index == 0 {
                fragment.trim_end_matches(PATH_SEPARATOR)
            } else {
                fragment.trim_matches(PATH_SEPARATOR)
            }
        })
        .collect();

    trimmed
        .join("/")
        .trim_end_matches(PATH_SEPARATOR)
        .to_string()
}

/// Drops the wildcard character and the separator in front of it.
fn strip_wildcard_suffix(pattern: &str) -> &str {
    let mut chars = pattern.chars();
    chars.next_back();
    chars.next_back();
    chars.as_str()
}

/// Decides whether a subscription pattern selects a concrete path.
///
/// The first applicable rule wins:
/// 1. `#` matches everything.
/// 2. `<prefix>/#` matches strict descendants of `<prefix>`.
/// 3. `<parent>/+` matches direct children of exactly `<parent>`.
/// 4. A pattern without a leading separator matches on the last segment only.
/// 5. Otherwise the pattern, minus its leading separator, must equal the path.
pub fn matches(pattern: &str, path: &str) -> bool {
    if pattern == MULTI_LEVEL_WILDCARD {
        true
    } else if pattern.ends_with(MULTI_LEVEL_WILDCARD) {
        is_descendant_of(strip_wildcard_suffix(pattern), path)
    } else if pattern.ends_with(SINGLE_LEVEL_WILDCARD) {
        parent(path) == Some(strip_wildcard_suffix(pattern))
    } else if !pattern.starts_with(PATH_SEPARATOR) {
        last_segment(path) == pattern
    } else {
        pattern.trim_start_matches(PATH_SEPARATOR) == path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_and_last_segment_split_on_final_separator() {
        assert_eq!(parent("Plant1/Cell/Temperature"), Some("Plant1/Cell"));
        assert_eq!(parent("Plant1"), None);
        assert_eq!(parent("Plant1/"), None);
        assert_eq!(last_segment("Plant1/Cell/Temperature"), "Temperature");
        assert_eq!(last_segment("Plant1"), "Plant1");
    }

    #[test]
    fn ancestor_chain_is_restartable_and_skips_empty_segments() {
        let chain = ancestor_chain("Site/Line1/PLC");
        let first_pass: Vec<&str> = chain.clone().collect();
        let second_pass: Vec<&str> = chain.collect();

        assert_eq!(first_pass, vec!["Site", "Site/Line1", "Site/Line1/PLC"]);
        assert_eq!(first_pass, second_pass);

        let leading: Vec<&str> = ancestor_chain("/Site/Line1").collect();
        assert_eq!(leading, vec!["/Site", "/Site/Line1"]);
        assert_eq!(ancestor_chain("").count(), 0);
    }

    #[test]
    fn descendant_requires_strictly_more_segments() {
        assert!(is_descendant_of("Plant1/ERP", "Plant1/ERP/Status"));
        assert!(is_descendant_of("Plant1", "Plant1/ERP/Status"));
        assert!(!is_descendant_of("Plant1/ERP", "Plant1/ERP"));
        assert!(!is_descendant_of("Plant1/ER", "Plant1/ERP/Status"));
        assert!(!is_descendant_of("Plant2", "Plant1/ERP"));
        assert!(!is_descendant_of("", "Plant1"));
    }

    #[test]
    fn relative_to_returns_suffix_or_original() {
        assert_eq!(relative_to("Plant1/ERP", "Plant1/ERP/Status/Code"), "Status/Code");
        assert_eq!(relative_to("Plant1/ERP", "Plant1/ERP"), "");
        assert_eq!(relative_to("Plant2", "Plant1/ERP"), "Plant1/ERP");
    }

    #[test]
    fn join_trims_boundary_separators() {
        assert_eq!(join(&["Plant1/", "/Cell/", "Temperature"]), "Plant1/Cell/Temperature");
        assert_eq!(join(&["/Plant1", "", "Cell/"]), "/Plant1/Cell");
        assert_eq!(join::<&str>(&[]), "");
    }

    #[test]
    fn matches_follows_rule_order() {
        assert!(matches("#", "anything/at/all"));
        assert!(matches("Site/#", "Site/Line1/PLC"));
        assert!(!matches("Site/#", "Site"));
        assert!(matches("Site/+", "Site/Line1"));
        assert!(!matches("Site/+", "Site/Line1/PLC"));
        assert!(matches("Temperature", "Plant1/Cell/Temperature"));
        assert!(!matches("Temperature", "Plant1/Cell/Pressure"));
        assert!(matches("/Plant1/Cell", "Plant1/Cell"));
        assert!(!matches("/Plant1/Cell", "Plant1/Cell/Temperature"));
    }

    #[test]
    fn wildcard_suffix_strip_is_char_safe() {
        assert!(!matches("é#", "é/x"));
        assert!(!matches("+", "Site/Line1"));
    }
}
