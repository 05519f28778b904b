//! Property tests for lookup, matching, and tree edits.

mod common;

use std::collections::HashSet;

use opening_core::{match_tree, Forest, MemoryStore, NodeRef, OpeningNode, OpeningStore, TheoryIndex};
use proptest::prelude::*;

const ALPHABET: &[&str] = &["e4", "e5", "d4", "d5", "Nf3", "Nc6", "c4", "c5"];

fn san_line(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(ALPHABET), 0..=max)
        .prop_map(|moves| moves.into_iter().map(String::from).collect())
}

fn leaf() -> impl Strategy<Value = OpeningNode> {
    san_line(5).prop_map(|moves| OpeningNode::user("leaf", moves))
}

fn node() -> impl Strategy<Value = OpeningNode> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        (san_line(5), prop::collection::vec(inner, 0..4)).prop_map(|(moves, variations)| {
            let mut n = OpeningNode::user("branch", moves);
            n.variations = variations;
            n
        })
    })
}

fn forest() -> impl Strategy<Value = Forest> {
    prop::collection::vec(node(), 1..4).prop_map(Forest::new)
}

fn all_refs(forest: &Forest) -> Vec<NodeRef> {
    let mut refs = Vec::new();
    forest.walk(|at, _| refs.push(at.clone()));
    refs
}

proptest! {
    #[test]
    fn canonical_match_is_longest_key_prefix(
        keys in prop::collection::vec(san_line(4), 0..12),
        line in san_line(6),
    ) {
        let theory = TheoryIndex::from_entries(
            keys.iter().map(|k| ("A00", "Some Opening", k.clone())),
        );
        let table: HashSet<String> = keys
            .iter()
            .filter(|k| !k.is_empty())
            .map(|k| k.join(" "))
            .collect();

        let expected = (1..=line.len())
            .rev()
            .find(|&len| table.contains(&line[..len].join(" ")));
        let got = theory.match_canonical(&line).map(|m| m.matched_moves);
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn variation_accepted_only_when_strictly_extending(
        parent in san_line(4).prop_filter("non-empty", |m| !m.is_empty()),
        candidate in san_line(6),
    ) {
        let mut store = OpeningStore::open(MemoryStore::new(), &TheoryIndex::default()).unwrap();
        let root = store.add_main_opening("Parent", &parent).unwrap();

        let valid = candidate.len() > parent.len() && candidate.starts_with(&parent);
        let result = store.add_variation(&root, "Child", &candidate);
        prop_assert_eq!(result.is_ok(), valid);
        prop_assert_eq!(store.forest().node_count(), if valid { 2 } else { 1 });
    }

    #[test]
    fn appending_a_move_never_shortens_the_match(
        forest in forest(),
        line in san_line(6),
        extra in prop::sample::select(ALPHABET),
    ) {
        let before = match_tree(&forest, &line).map_or(0, |m| m.match_length);
        let mut longer = line.clone();
        longer.push(extra.to_string());
        let after = match_tree(&forest, &longer).map_or(0, |m| m.match_length);
        prop_assert!(after >= before);
    }

    #[test]
    fn delete_removes_node_and_descendants(
        forest in forest(),
        pick in any::<prop::sample::Index>(),
    ) {
        let refs = all_refs(&forest);
        let target = pick.get(&refs).clone();
        let below = forest.get(&target).unwrap().descendant_count();
        let before = forest.node_count();
        let json = serde_json::to_string(&forest).unwrap();

        let blobs = MemoryStore::new()
            .with("openings", &json)
            .with("openings_version", "7");
        let mut store = OpeningStore::open(blobs, &TheoryIndex::default()).unwrap();
        let removed = store.delete_node(&target).unwrap();

        prop_assert_eq!(removed.descendant_count(), below);
        prop_assert_eq!(store.forest().node_count(), before - (below + 1));
        prop_assert!(all_refs(store.forest()).len() == before - (below + 1));
    }
}
