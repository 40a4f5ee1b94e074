/// Splits text into sentences on `.`, `!` or `?` followed by whitespace.
///
/// Terminal punctuation stays with its sentence. Pieces are trimmed and those shorter
/// than `min_len` characters are skipped.
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    rest: &'a str,
    min_len: usize,
}

impl<'a> Sentences<'a> {
    #[must_use]
    pub fn new(text: &'a str, min_len: usize) -> Self {
        Self { rest: text, min_len }
    }
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.rest.is_empty() {
            let (piece, rest) = split_at_terminal(self.rest);
            self.rest = rest;

            let piece = piece.trim();
            if piece.chars().count() >= self.min_len {
                return Some(piece);
            }
        }
        None
    }
}

fn split_at_terminal(text: &str) -> (&str, &str) {
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        if let Some(&(next_idx, next)) = chars.peek() {
            if next.is_whitespace() {
                let end = idx + ch.len_utf8();
                return (&text[..end], text[next_idx..].trim_start());
            }
        }
    }

    (text, "")
}

#[must_use]
pub fn split_sentences(text: &str, min_len: usize) -> Sentences<'_> {
    Sentences::new(text, min_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_terminal_punctuation() {
        let text = "Inflation is rising fast. Will the Fed act? Markets are nervous!  Analysts agree.";
        let sentences: Vec<&str> = split_sentences(text, 10).collect();
        assert_eq!(
            sentences,
            vec![
                "Inflation is rising fast.",
                "Will the Fed act?",
                "Markets are nervous!",
                "Analysts agree."
            ]
        );
    }

    #[test]
    fn test_keeps_decimals_together() {
        let sentences: Vec<&str> = split_sentences("GDP grew 2.5 percent last quarter.", 10).collect();
        assert_eq!(sentences, vec!["GDP grew 2.5 percent last quarter."]);
    }

    #[test]
    fn test_drops_short_fragments() {
        let sentences: Vec<&str> = split_sentences("Yes. No. This one is long enough.", 10).collect();
        assert_eq!(sentences, vec!["This one is long enough."]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(split_sentences("", 10).count(), 0);
        assert_eq!(split_sentences("   ", 10).count(), 0);
        assert_eq!(split_sentences("Short.", 10).count(), 0);
    }
}
