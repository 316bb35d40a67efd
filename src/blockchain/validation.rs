// src/blockchain/validation.rs

/// Token names must be 3-20 ASCII alphanumeric characters.
pub fn is_valid_token_name(name: &str) -> bool {
    (3..=20).contains(&name.len()) && name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Tickers are only length-checked (3-10), matching on-chain acceptance.
pub fn is_valid_token_ticker(ticker: &str) -> bool {
    (3..=10).contains(&ticker.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_name_bounds() {
        assert!(is_valid_token_name("ABC"));
        assert!(is_valid_token_name("MyToken123"));
        assert!(is_valid_token_name(&"A".repeat(20)));

        assert!(!is_valid_token_name(""));
        assert!(!is_valid_token_name("AB"));
        assert!(!is_valid_token_name(&"A".repeat(21)));
    }

    #[test]
    fn token_name_character_class() {
        assert!(!is_valid_token_name("MY-TOKEN"));
        assert!(!is_valid_token_name("MY TOKEN"));
        assert!(!is_valid_token_name("TOKEN_1"));
        assert!(!is_valid_token_name("TOKé"));
    }

    #[test]
    fn ticker_bounds_only() {
        assert!(is_valid_token_ticker("ABC"));
        assert!(is_valid_token_ticker("ABCDEFGHIJ"));
        // No character-class check for tickers.
        assert!(is_valid_token_ticker("a-c"));

        assert!(!is_valid_token_ticker("AB"));
        assert!(!is_valid_token_ticker("ABCDEFGHIJK"));
    }
}
