//! Anki search query construction

/// Build a `findCards` query matching any of the given decks:
/// `deck:"A" OR deck:"B"`.
///
/// Deck names containing `"` pass through unescaped; the upstream query
/// grammar defines no escape for them.
pub fn deck_search_query(decks: &[String]) -> String {
    decks
        .iter()
        .map(|name| format!("deck:\"{}\"", name))
        .collect::<Vec<_>>()
        .join(" OR ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_deck() {
        let query = deck_search_query(&["Japanese::N5".to_string()]);
        assert_eq!(query, "deck:\"Japanese::N5\"");
    }

    #[test]
    fn test_multiple_decks_or_joined() {
        let query = deck_search_query(&["A".to_string(), "B".to_string(), "C".to_string()]);
        assert_eq!(query, "deck:\"A\" OR deck:\"B\" OR deck:\"C\"");
    }

    #[test]
    fn test_empty_selection() {
        assert_eq!(deck_search_query(&[]), "");
    }
}
