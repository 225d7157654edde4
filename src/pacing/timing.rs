use super::settings::{ReadingMode, ReadingSettings};
use crate::tokenizer::{Token, Trailing};

pub const SENTENCE_END_MULTIPLIER: f64 = 2.0;
pub const CLAUSE_MULTIPLIER: f64 = 1.5;
pub const LONG_WORD_MULTIPLIER: f64 = 1.2;
/// Words longer than this many characters are held longer
pub const LONG_WORD_THRESHOLD: usize = 10;

/// Time between two exposures before any punctuation or length adjustment
pub fn base_delay_ms(settings: &ReadingSettings) -> f64 {
    let per_word = 60_000.0 / settings.wpm as f64;
    match settings.mode {
        ReadingMode::Chunk => per_word * settings.chunk_size as f64,
        _ => per_word,
    }
}

/// Only the highest-priority rule applies; multipliers never combine.
pub fn multiplier(token: &Token) -> f64 {
    match token.trailing() {
        Trailing::SentenceEnd => SENTENCE_END_MULTIPLIER,
        Trailing::Clause => CLAUSE_MULTIPLIER,
        Trailing::None if token.char_len() > LONG_WORD_THRESHOLD => LONG_WORD_MULTIPLIER,
        Trailing::None => 1.0,
    }
}

/// How long `token` stays on screen, in milliseconds
pub fn delay_ms(settings: &ReadingSettings, token: &Token) -> f64 {
    base_delay_ms(settings) * multiplier(token)
}

/// Estimated time to show every token from `from` to the end.
pub fn remaining_ms(settings: &ReadingSettings, tokens: &[Token], from: usize) -> f64 {
    tokens
        .iter()
        .skip(from)
        .step_by(settings.step())
        .map(|t| delay_ms(settings, t))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(wpm: u32, mode: ReadingMode, chunk_size: usize) -> ReadingSettings {
        ReadingSettings::new(wpm, mode, chunk_size).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_plain_word() {
        let s = settings(600, ReadingMode::Single, 1);
        assert!(approx(delay_ms(&s, &Token::new(0, "hello")), 100.0));
    }

    #[test]
    fn test_sentence_end_wins() {
        let s = settings(600, ReadingMode::Single, 1);
        assert!(approx(delay_ms(&s, &Token::new(0, "hello.")), 200.0));
        // long and sentence-ending: only the sentence multiplier applies
        assert!(approx(delay_ms(&s, &Token::new(0, "unbelievable!")), 200.0));
    }

    #[test]
    fn test_clause() {
        let s = settings(600, ReadingMode::Single, 1);
        assert!(approx(delay_ms(&s, &Token::new(0, "however,")), 150.0));
        let token = Token::new(0, "interestingly,");
        assert!(approx(delay_ms(&s, &token), 150.0));
    }

    #[test]
    fn test_long_word() {
        let s = settings(600, ReadingMode::Single, 1);
        assert!(approx(delay_ms(&s, &Token::new(0, "extraordinary")), 120.0));
        // exactly at the threshold is not long
        assert!(approx(delay_ms(&s, &Token::new(0, "abcdefghij")), 100.0));
    }

    #[test]
    fn test_chunk_mode_scales_base() {
        let s = settings(600, ReadingMode::Chunk, 3);
        assert!(approx(delay_ms(&s, &Token::new(0, "word")), 300.0));
        assert!(approx(delay_ms(&s, &Token::new(0, "end.")), 600.0));
    }

    #[test]
    fn test_chunk_size_ignored_outside_chunk_mode() {
        let s = settings(600, ReadingMode::Flow, 3);
        assert!(approx(base_delay_ms(&s), 100.0));
    }

    #[test]
    fn test_remaining_ms() {
        let tokens = crate::tokenizer::tokenize("one two three. four");
        let s = settings(600, ReadingMode::Single, 1);
        assert!(approx(remaining_ms(&s, &tokens, 0), 500.0));
        assert!(approx(remaining_ms(&s, &tokens, 3), 100.0));
        assert!(approx(remaining_ms(&s, &tokens, 10), 0.0));

        let c = settings(600, ReadingMode::Chunk, 2);
        // exposures start at tokens 0 and 2 ("three.")
        assert!(approx(remaining_ms(&c, &tokens, 0), 200.0 + 400.0));
    }
}
