//! Opening library listing: category tabs, text search, and the
//! "continuations from here" auto-filter over the root openings.

use serde::Serialize;

use crate::tree::{Forest, NodeRef, OpeningNode};

/// Maximum number of items returned by one listing.
pub const DISPLAY_LIMIT: usize = 100;

/// Category tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Category {
    #[default]
    All,
    /// Roots authored by the user.
    User,
    /// Canonical roots whose eco code starts with the given prefix.
    Eco(String),
}

impl Category {
    /// `ALL`, `USER`, or an eco prefix such as `C` or `C4`.
    pub fn parse(code: &str) -> Self {
        match code.trim() {
            "" | "ALL" | "all" => Category::All,
            "USER" | "user" => Category::User,
            other => Category::Eco(other.to_uppercase()),
        }
    }

    fn admits(&self, node: &OpeningNode) -> bool {
        match self {
            Category::All => true,
            Category::User => !node.is_from_database,
            Category::Eco(prefix) => node
                .eco
                .as_deref()
                .is_some_and(|eco| eco.starts_with(prefix.as_str())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LibraryQuery {
    pub category: Category,
    pub search: String,
    /// When non-empty, overrides category and search: only roots that
    /// continue these moves are listed.
    pub position: Vec<String>,
}

impl LibraryQuery {
    pub fn search(term: &str) -> Self {
        Self {
            search: term.to_string(),
            ..Self::default()
        }
    }

    pub fn category(code: &str) -> Self {
        Self {
            category: Category::parse(code),
            ..Self::default()
        }
    }

    pub fn position(moves: &[String]) -> Self {
        Self {
            position: moves.to_vec(),
            ..Self::default()
        }
    }

    fn admits(&self, node: &OpeningNode) -> bool {
        if !self.position.is_empty() {
            return node.moves.starts_with(&self.position);
        }
        if !self.category.admits(node) {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        match &node.search_text {
            Some(text) => text.contains(&needle),
            None => node.name.to_lowercase().contains(&needle),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryItem {
    pub node: NodeRef,
    pub name: String,
    pub eco: Option<String>,
    pub move_count: usize,
    pub moves: Vec<String>,
    pub sub_variations: usize,
    pub is_from_database: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub items: Vec<LibraryItem>,
    pub total: usize,
    pub matched: usize,
    /// Index into `items` of the most specific listed line for the position.
    pub highlighted: Option<usize>,
}

/// Filter the roots of `forest` and highlight the best match for `current`.
pub fn list(forest: &Forest, query: &LibraryQuery, current: &[String]) -> Listing {
    let filtered: Vec<(usize, &OpeningNode)> = forest
        .roots
        .iter()
        .enumerate()
        .filter(|(_, node)| query.admits(node))
        .collect();

    let items: Vec<LibraryItem> = filtered
        .iter()
        .take(DISPLAY_LIMIT)
        .map(|&(i, node)| LibraryItem {
            node: NodeRef::root(i),
            name: node.name.clone(),
            eco: node.eco.clone(),
            move_count: node.move_count.unwrap_or(node.moves.len()),
            moves: node.moves.clone(),
            sub_variations: node.descendant_count(),
            is_from_database: node.is_from_database,
        })
        .collect();

    let mut highlighted = None;
    let mut best = 0;
    for (i, item) in items.iter().enumerate() {
        if item.moves.len() > best && current.starts_with(&item.moves) {
            best = item.moves.len();
            highlighted = Some(i);
        }
    }

    tracing::debug!("Filtered {} / {} openings", filtered.len(), forest.roots.len());
    Listing {
        items,
        total: forest.roots.len(),
        matched: filtered.len(),
        highlighted,
    }
}

/// A selectable parent in the variation form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentChoice {
    pub node: NodeRef,
    pub depth: usize,
    pub name: String,
    pub move_count: usize,
}

/// Every node in traversal order, for manual parent selection.
pub fn parent_choices(forest: &Forest) -> Vec<ParentChoice> {
    let mut out = Vec::new();
    forest.walk(|at, node| {
        out.push(ParentChoice {
            node: at.clone(),
            depth: at.path.len(),
            name: node.name.clone(),
            move_count: node.moves.len(),
        });
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::TheoryIndex;

    fn mv(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    fn forest() -> Forest {
        let theory = TheoryIndex::from_entries(vec![
            ("C20", "King's Pawn Game", mv("e4 e5")),
            ("C40", "King's Knight Opening", mv("e4 e5 Nf3")),
            ("B20", "Sicilian Defense", mv("e4 c5")),
            ("D06", "Queen's Gambit", mv("d4 d5 c4")),
        ]);
        let mut roots = crate::migration::seed_roots(&theory);
        let mut mine = OpeningNode::user("My Gambit Prep", mv("e4 e5 f4"));
        mine.variations.push(OpeningNode::user("Accepted", mv("e4 e5 f4 exf4")));
        roots.push(mine);
        Forest::new(roots)
    }

    #[test]
    fn test_category_filters() {
        let f = forest();
        let all = list(&f, &LibraryQuery::default(), &[]);
        assert_eq!(all.total, 5);
        assert_eq!(all.matched, 5);

        let c = list(&f, &LibraryQuery::category("C"), &[]);
        assert_eq!(c.matched, 2);

        let user = list(&f, &LibraryQuery::category("USER"), &[]);
        assert_eq!(user.matched, 1);
        assert_eq!(user.items[0].sub_variations, 1);
    }

    #[test]
    fn test_search_text_and_user_names() {
        let f = forest();
        let hits = list(&f, &LibraryQuery::search("SICILIAN"), &[]);
        assert_eq!(hits.matched, 1);
        let hits = list(&f, &LibraryQuery::search("c40"), &[]);
        assert_eq!(hits.items[0].name, "King's Knight Opening");
        let hits = list(&f, &LibraryQuery::search("gambit prep"), &[]);
        assert_eq!(hits.matched, 1);
    }

    #[test]
    fn test_position_filter_overrides_and_highlights() {
        let f = forest();
        let mut query = LibraryQuery::position(&mv("e4 e5"));
        query.category = Category::parse("B");
        let current = mv("e4 e5 Nf3 Nc6");
        let listing = list(&f, &query, &current);
        assert_eq!(listing.matched, 3);
        let hl = listing.highlighted.unwrap();
        assert_eq!(listing.items[hl].name, "King's Knight Opening");
    }

    #[test]
    fn test_parent_choices_flatten() {
        let choices = parent_choices(&forest());
        assert_eq!(choices.len(), 6);
        let last = choices.last().unwrap();
        assert_eq!(last.name, "Accepted");
        assert_eq!(last.depth, 1);
    }
}
