/// A single displayable unit of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub index: usize,
    pub text: String,
}

/// Punctuation class of the last character of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trailing {
    SentenceEnd,
    Clause,
    None,
}

impl Token {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Length in characters, not bytes
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn trailing(&self) -> Trailing {
        match self.text.chars().last() {
            Some('.' | '!' | '?') => Trailing::SentenceEnd,
            Some(',' | ';' | ':') => Trailing::Clause,
            _ => Trailing::None,
        }
    }
}

/// Split raw text into tokens on runs of whitespace.
pub fn tokenize(text: &str) -> Vec<Token> {
    text.split_whitespace()
        .enumerate()
        .map(|(index, word)| Token::new(index, word))
        .collect()
}

/// Join up to `radius` tokens on each side of `index` into a single line.
///
/// `index` is clamped to the token range; an empty slice yields an empty string.
pub fn context_window(tokens: &[Token], index: usize, radius: usize) -> String {
    if tokens.is_empty() {
        return String::new();
    }
    let index = index.min(tokens.len() - 1);
    let start = index.saturating_sub(radius);
    let end = (index + radius + 1).min(tokens.len());

    tokens[start..end]
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_splits_on_whitespace_runs() {
        let tokens = tokenize("  the quick\t\tbrown\n\nfox  ");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["the", "quick", "brown", "fox"]);
        assert_eq!(tokens[3].index, 3);
    }

    #[test]
    fn test_tokenize_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \n\t ").is_empty());
    }

    #[test]
    fn test_tokenize_is_deterministic() {
        let text = "One, two. Three!";
        assert_eq!(tokenize(text), tokenize(text));
    }

    #[test]
    fn test_trailing_classes() {
        assert_eq!(Token::new(0, "end.").trailing(), Trailing::SentenceEnd);
        assert_eq!(Token::new(0, "what?").trailing(), Trailing::SentenceEnd);
        assert_eq!(Token::new(0, "wow!").trailing(), Trailing::SentenceEnd);
        assert_eq!(Token::new(0, "however,").trailing(), Trailing::Clause);
        assert_eq!(Token::new(0, "note:").trailing(), Trailing::Clause);
        assert_eq!(Token::new(0, "then;").trailing(), Trailing::Clause);
        assert_eq!(Token::new(0, "plain").trailing(), Trailing::None);
        assert_eq!(Token::new(0, "").trailing(), Trailing::None);
    }

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(Token::new(0, "naïve").char_len(), 5);
    }

    #[test]
    fn test_context_window() {
        let tokens = tokenize("a b c d e f g");
        assert_eq!(context_window(&tokens, 3, 2), "b c d e f");
        assert_eq!(context_window(&tokens, 0, 2), "a b c");
        assert_eq!(context_window(&tokens, 6, 1), "f g");
        assert_eq!(context_window(&tokens, 99, 1), "f g");
        assert_eq!(context_window(&[], 0, 3), "");
    }
}
