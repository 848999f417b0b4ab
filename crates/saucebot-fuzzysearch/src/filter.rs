// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Site allow-list and distance ordering.

use saucebot_core::types::{SearchMatch, Site};

/// Keeps matches from `allowed` sites, closest first.
///
/// The sort is stable: equal distances keep API order, and matches without
/// a distance go last.
pub fn apply_allow_list(matches: Vec<SearchMatch>, allowed: &[Site]) -> Vec<SearchMatch> {
    let mut kept: Vec<SearchMatch> = matches
        .into_iter()
        .filter(|m| allowed.contains(&m.site))
        .collect();
    kept.sort_by_key(SearchMatch::distance_key);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(matches: &[SearchMatch]) -> Vec<&str> {
        matches.iter().map(|m| m.external_id.as_str()).collect()
    }

    #[test]
    fn filters_then_sorts() {
        let input = vec![
            SearchMatch::new(Site::E621, "a", Some(3)),
            SearchMatch::new(Site::FurAffinity, "b", Some(0)),
            SearchMatch::new(Site::E621, "c", None),
            SearchMatch::new(Site::E621, "d", Some(1)),
            SearchMatch::new(Site::E621, "e", Some(1)),
        ];
        let out = apply_allow_list(input, &[Site::E621]);
        assert_eq!(ids(&out), ["d", "e", "a", "c"]);
    }

    #[test]
    fn empty_allow_list_keeps_nothing() {
        let input = vec![SearchMatch::new(Site::E621, "a", Some(0))];
        assert!(apply_allow_list(input, &[]).is_empty());
    }

    fn site() -> impl Strategy<Value = Site> {
        prop_oneof![
            Just(Site::FurAffinity),
            Just(Site::Weasyl),
            Just(Site::Twitter),
            Just(Site::E621),
            Just(Site::Unknown),
        ]
    }

    proptest! {
        #[test]
        fn output_is_allowed_sorted_and_stable(
            raw in prop::collection::vec((site(), prop::option::of(0u64..8)), 0..40),
            allowed in prop::collection::vec(site(), 0..5),
        ) {
            let input: Vec<SearchMatch> = raw
                .iter()
                .enumerate()
                .map(|(i, (site, distance))| SearchMatch::new(*site, i.to_string(), *distance))
                .collect();
            let expected_len = input.iter().filter(|m| allowed.contains(&m.site)).count();

            let out = apply_allow_list(input, &allowed);

            prop_assert_eq!(out.len(), expected_len);
            for m in &out {
                prop_assert!(allowed.contains(&m.site));
            }
            for pair in out.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.distance_key() <= b.distance_key());
                if a.distance_key() == b.distance_key() {
                    let ia: usize = a.external_id.parse().unwrap();
                    let ib: usize = b.external_id.parse().unwrap();
                    prop_assert!(ia < ib);
                }
            }
        }
    }
}
