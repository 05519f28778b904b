//! Movetext utilities: lightweight regex-based SAN extraction.

use std::sync::LazyLock;

use regex::Regex;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("valid regex"));
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[^}]*\}").expect("valid regex"));
static MOVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=[QRBN])?[+#]?|O-O-O[+#]?|O-O[+#]?")
        .expect("valid regex")
});

/// Extract SAN moves from movetext (`1. e4 e5 2. Nf3`), ignoring headers,
/// comments, side variations, move numbers and results.
pub fn parse_movetext(text: &str) -> Vec<String> {
    let no_headers = HEADER_RE.replace_all(text, "");
    let no_comments = COMMENT_RE.replace_all(&no_headers, "");
    let no_variations = strip_variations(&no_comments);

    MOVE_RE
        .find_iter(&no_variations)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Drop parenthesised side lines, including nested ones.
fn strip_variations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Render SAN moves as numbered movetext.
pub fn format_movetext(moves: &[String]) -> String {
    let mut out = String::new();
    for (i, mv) in moves.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        if i % 2 == 0 {
            out.push_str(&format!("{}. ", i / 2 + 1));
        }
        out.push_str(mv);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_movetext_basic() {
        let moves = parse_movetext("1. e4 e5 2. Nf3 Nc6 3. Bb5");
        assert_eq!(moves, vec!["e4", "e5", "Nf3", "Nc6", "Bb5"]);
    }

    #[test]
    fn test_parse_movetext_strips_noise() {
        let text = r#"[Event "x"]
1. d4 {queen pawn} d5 (1... Nf6 2. c4) 2. c4 dxc4 3. O-O-O+ exd8=Q# 1-0"#;
        let moves = parse_movetext(text);
        assert_eq!(moves, vec!["d4", "d5", "c4", "dxc4", "O-O-O+", "exd8=Q#"]);
    }

    #[test]
    fn test_parse_movetext_strips_nested_variations() {
        let moves = parse_movetext("1. e4 (1. d4 (1. c4) 1... d5) e5 2. Nf3 (2. f4 (2. Bc4 Nf6) exf4) Nc6");
        assert_eq!(moves, vec!["e4", "e5", "Nf3", "Nc6"]);

        let moves = parse_movetext("1. d4 d5 (1... Nf6 (1... d5) 2. c4) 2. c4");
        assert_eq!(moves, vec!["d4", "d5", "c4"]);
    }

    #[test]
    fn test_format_movetext() {
        let moves: Vec<String> = ["e4", "e5", "Nf3"].iter().map(|s| s.to_string()).collect();
        assert_eq!(format_movetext(&moves), "1. e4 e5 2. Nf3");
        assert_eq!(format_movetext(&[]), "");
    }
}
