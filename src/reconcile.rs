//! Content-matched reconciliation of provider output onto requests
//!
//! Providers may drop, merge or reorder entries of a batch, so the i-th result list is
//! not necessarily the answer to the i-th request. Each request is paired with the
//! earliest unconsumed result list whose echoed source equals the request's source.
//! With duplicate sources the n-th request bearing a text takes the n-th list echoing it.
//! Requests without a partner get an empty result array and consume nothing.
//!
//! Sources are compared in letter-coded form on both sides, so a segment carrying
//! inline codes (`Press <g1>OK</g1>`) matches an echo that parsed those codes.

use crate::data::{Fragment, QueryResult, TranslationRequest, TranslationResult};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Results for every request slot, in request order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    pub results: Vec<Vec<TranslationResult>>,
    pub matched: usize,
    pub unmatched: usize,
    /// Result lists nobody claimed (echoes of text that was never requested)
    pub leftover: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultReconciler {
    include_codes: bool,
}

impl ResultReconciler {
    pub fn new(include_codes: bool) -> Self {
        Self { include_codes }
    }

    pub fn reconcile(
        &self,
        requests: &[TranslationRequest],
        lists: Vec<Vec<QueryResult>>,
    ) -> Reconciliation {
        // Lists keyed by the letter-coded text of their echoed source, in provider order
        let mut by_source: HashMap<String, VecDeque<usize>> = HashMap::new();
        let mut pending: Vec<Option<Vec<QueryResult>>> = Vec::with_capacity(lists.len());
        for (index, list) in lists.into_iter().enumerate() {
            match list.first() {
                Some(first) => {
                    by_source
                        .entry(first.source.letter_coded())
                        .or_default()
                        .push_back(index);
                    pending.push(Some(list));
                }
                None => pending.push(None),
            }
        }
        let mut leftover = pending.iter().filter(|list| list.is_some()).count();

        let mut outcome = Reconciliation {
            results: Vec::with_capacity(requests.len()),
            ..Reconciliation::default()
        };

        for (position, request) in requests.iter().enumerate() {
            let claimed = if request.is_blank() {
                None
            } else {
                by_source
                    .get_mut(&match_key(request.source()))
                    .and_then(VecDeque::pop_front)
                    .and_then(|index| pending[index].take())
            };

            match claimed {
                Some(list) => {
                    leftover -= 1;
                    outcome.matched += 1;
                    outcome.results.push(
                        list.into_iter()
                            .map(|qr| TranslationResult::from_query_result(qr, self.include_codes))
                            .collect(),
                    );
                }
                None => {
                    debug!(position, "No provider result for request");
                    outcome.unmatched += 1;
                    outcome.results.push(Vec::new());
                }
            }
        }

        outcome.leftover = leftover;
        outcome
    }
}

/// Request source in the same letter-coded form used for provider echoes
fn match_key(source: &str) -> String {
    Fragment::from_letter_coded(source).letter_coded()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Fragment;

    fn requests(sources: &[&str]) -> Vec<TranslationRequest> {
        sources.iter().map(|s| TranslationRequest::new(*s)).collect()
    }

    fn echo(sources: &[&str]) -> Vec<Vec<QueryResult>> {
        sources
            .iter()
            .map(|s| vec![QueryResult::plain(*s, *s)])
            .collect()
    }

    fn translations(outcome: &Reconciliation) -> Vec<Vec<String>> {
        outcome
            .results
            .iter()
            .map(|list| list.iter().map(|r| r.translation.clone()).collect())
            .collect()
    }

    #[test]
    fn test_full_match() {
        let outcome = ResultReconciler::default().reconcile(
            &requests(&["First segment", "Second segment", "Third segment"]),
            echo(&["First segment", "Second segment", "Third segment"]),
        );
        assert_eq!(
            translations(&outcome),
            vec![
                vec!["First segment"],
                vec!["Second segment"],
                vec!["Third segment"]
            ]
        );
        assert_eq!(outcome.matched, 3);
        assert_eq!(outcome.unmatched, 0);
    }

    #[test]
    fn test_missing_middle_entry() {
        let outcome = ResultReconciler::default().reconcile(
            &requests(&["First segment", "Second segment", "Third segment"]),
            echo(&["First segment", "Third segment"]),
        );
        assert_eq!(
            translations(&outcome),
            vec![vec!["First segment"], vec![], vec!["Third segment"]]
        );
        assert_eq!(outcome.matched, 2);
        assert_eq!(outcome.unmatched, 1);
        assert_eq!(outcome.leftover, 0);
    }

    #[test]
    fn test_reordered_output() {
        let lists = vec![
            vec![QueryResult::plain("B", "b")],
            vec![QueryResult::plain("A", "a")],
        ];
        let outcome = ResultReconciler::default().reconcile(&requests(&["A", "B"]), lists);
        assert_eq!(translations(&outcome), vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn test_duplicate_sources_consumed_in_order() {
        let lists = vec![
            vec![QueryResult::plain("A", "first")],
            vec![QueryResult::plain("A", "second")],
        ];
        let outcome = ResultReconciler::default().reconcile(&requests(&["A", "A"]), lists);
        assert_eq!(translations(&outcome), vec![vec!["first"], vec!["second"]]);
    }

    #[test]
    fn test_duplicate_source_with_single_result() {
        let outcome = ResultReconciler::default().reconcile(&requests(&["A", "A"]), echo(&["A"]));
        assert_eq!(translations(&outcome), vec![vec!["A"], vec![]]);
        assert_eq!(outcome.unmatched, 1);
    }

    #[test]
    fn test_unmatched_request_does_not_shift_later_ones() {
        let outcome = ResultReconciler::default().reconcile(
            &requests(&["X", "A", "Y", "B"]),
            echo(&["A", "B"]),
        );
        assert_eq!(
            translations(&outcome),
            vec![vec![], vec!["A"], vec![], vec!["B"]]
        );
    }

    #[test]
    fn test_blank_request_never_matches() {
        let lists = vec![vec![QueryResult::plain("", "")], vec![QueryResult::plain("A", "a")]];
        let outcome = ResultReconciler::default().reconcile(&requests(&["", "A"]), lists);
        assert_eq!(translations(&outcome), vec![vec![], vec!["a"]]);
        assert_eq!(outcome.leftover, 1);
    }

    #[test]
    fn test_empty_lists_are_ignored() {
        let lists = vec![vec![], vec![QueryResult::plain("A", "a")]];
        let outcome = ResultReconciler::default().reconcile(&requests(&["A"]), lists);
        assert_eq!(translations(&outcome), vec![vec!["a"]]);
        assert_eq!(outcome.leftover, 0);
    }

    #[test]
    fn test_unrequested_echo_is_leftover() {
        let outcome =
            ResultReconciler::default().reconcile(&requests(&["A"]), echo(&["Z", "A"]));
        assert_eq!(translations(&outcome), vec![vec!["A"]]);
        assert_eq!(outcome.leftover, 1);
    }

    #[test]
    fn test_multiple_candidates_per_request() {
        let lists = vec![vec![
            QueryResult::plain("Hello", "Bonjour").with_quality(90),
            QueryResult::plain("Hello", "Salut").with_quality(70),
        ]];
        let outcome = ResultReconciler::default().reconcile(&requests(&["Hello"]), lists);
        assert_eq!(translations(&outcome), vec![vec!["Bonjour", "Salut"]]);
        assert_eq!(outcome.results[0][1].quality, Some(70));
    }

    #[test]
    fn test_include_codes() {
        let lists = vec![vec![QueryResult::new(
            Fragment::from_letter_coded("Click <g1>here</g1>"),
            Fragment::from_letter_coded("Cliquez <g1>ici</g1>"),
        )]];
        let reqs = requests(&["Click <g1>here</g1>"]);

        let plain = ResultReconciler::new(false).reconcile(&reqs, lists.clone());
        assert_eq!(translations(&plain), vec![vec!["Cliquez ici"]]);
        assert!(plain.results[0][0].codes.is_empty());

        let coded = ResultReconciler::new(true).reconcile(&reqs, lists);
        assert_eq!(translations(&coded), vec![vec!["Cliquez <g1>ici</g1>"]]);
        assert_eq!(coded.results[0][0].codes.len(), 2);
    }

    #[test]
    fn test_coded_segment_matches_its_echo() {
        for include_codes in [false, true] {
            let lists = vec![vec![QueryResult::new(
                Fragment::from_letter_coded("Press <g1>OK</g1>"),
                Fragment::from_letter_coded("Appuyez sur <g1>OK</g1>"),
            )]];
            let outcome =
                ResultReconciler::new(include_codes).reconcile(&requests(&["Press <g1>OK</g1>"]), lists);
            assert_eq!(outcome.matched, 1);
            assert_eq!(outcome.unmatched, 0);
            assert_eq!(outcome.leftover, 0);
            assert_eq!(outcome.results[0].len(), 1);
        }
    }

    #[test]
    fn test_coded_segment_matches_plain_text_echo() {
        let lists = vec![vec![QueryResult::plain("Press <g1>OK</g1>", "Appuyez sur OK")]];
        let outcome =
            ResultReconciler::default().reconcile(&requests(&["Press <g1>OK</g1>"]), lists);
        assert_eq!(translations(&outcome), vec![vec!["Appuyez sur OK"]]);
    }

    #[test]
    fn test_codes_are_part_of_the_match() {
        // An echo without the request's codes answers a different segment
        let lists = vec![vec![QueryResult::plain("Press OK", "Appuyez sur OK")]];
        let outcome =
            ResultReconciler::default().reconcile(&requests(&["Press <g1>OK</g1>"]), lists);
        assert_eq!(outcome.matched, 0);
        assert_eq!(outcome.leftover, 1);
    }

    #[test]
    fn test_duplicates_with_reordering() {
        let lists = vec![
            vec![QueryResult::plain("B", "b")],
            vec![QueryResult::plain("A", "a1")],
            vec![QueryResult::plain("A", "a2")],
        ];
        let outcome = ResultReconciler::default().reconcile(&requests(&["A", "B", "A"]), lists);
        assert_eq!(translations(&outcome), vec![vec!["a1"], vec!["b"], vec!["a2"]]);
    }

    #[test]
    fn test_duplicates_with_a_dropped_entry() {
        // One of the two "A" entries was dropped by the provider
        let lists = vec![
            vec![QueryResult::plain("B", "b")],
            vec![QueryResult::plain("A", "a")],
            vec![QueryResult::plain("C", "c")],
        ];
        let outcome =
            ResultReconciler::default().reconcile(&requests(&["A", "B", "A", "C"]), lists);
        assert_eq!(
            translations(&outcome),
            vec![vec!["a"], vec!["b"], vec![], vec!["c"]]
        );
        assert_eq!(outcome.matched, 3);
        assert_eq!(outcome.unmatched, 1);
        assert_eq!(outcome.leftover, 0);
    }

    #[test]
    fn test_no_requests() {
        let outcome = ResultReconciler::default().reconcile(&[], echo(&["A"]));
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.leftover, 1);
    }
}
