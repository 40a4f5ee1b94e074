//! Word lists and text heuristics shared by the extractors and the graph builder.

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "this", "that", "these", "those", "is", "are", "was", "were", "be", "been", "being",
    "have", "has", "had", "do", "does", "did", "will", "would", "could", "should", "may",
    "might", "must", "can",
];

/// Generic nouns and fillers that never make a useful graph node on their own.
const FILLER_WORDS: &[&str] = &[
    "thing", "stuff", "something", "anything", "nothing", "everything", "way", "time", "day",
    "year", "month", "week", "hour", "minute", "place", "area", "part", "section", "piece",
    "bit", "lot", "people", "person", "someone", "anyone", "everyone", "nobody", "one", "two",
    "three", "first", "second", "third", "last", "more", "most", "less", "least", "many",
    "much", "few", "little", "other", "another", "same", "different", "new", "old", "good",
    "bad", "big", "small", "large", "long", "short", "high", "low", "right", "left", "up",
    "down", "here", "there", "where", "then", "now", "when", "before", "after", "during",
    "while", "also", "too", "very", "quite", "really", "just", "only", "even", "well",
    "still", "yet", "already", "again", "once", "twice",
];

const DETERMINERS: &[&str] = &["the", "a", "an", "this", "that", "these", "those"];

const AUXILIARIES: &[&str] = &[
    "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "must", "can",
];

const PRONOUNS: &[&str] = &["it", "they", "we", "you", "he", "she", "him", "her", "them", "us"];

const QUESTION_WORDS: &[&str] = &["what", "when", "where", "why", "how", "which", "who"];

const LEADING_ARTICLES: &[&str] = &["the", "a", "an"];

#[must_use]
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word.to_lowercase().as_str())
}

fn is_filler(word: &str) -> bool {
    FILLER_WORDS.contains(&word)
}

fn is_numeric_like(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '-' | '.' | ',' | '%' | '$'))
}

/// True when `text` carries no content worth a node.
///
/// Numeric and currency strings always pass so statistics survive.
#[must_use]
pub fn is_random_word(text: &str) -> bool {
    if text.chars().count() < 3 {
        return true;
    }

    let lower = text.trim().to_lowercase();

    if is_filler(&lower) {
        return true;
    }
    if lower.chars().count() < 5 && is_stop_word(&lower) {
        return true;
    }
    if is_numeric_like(&lower) {
        return false;
    }

    !lower.split_whitespace().any(|w| {
        w.chars().count() >= 5 && !is_stop_word(w) && !is_filler(w)
    })
}

/// Rejects dangling determiners, bare auxiliaries, pronouns and question words, and
/// requires at least one content word of four or more characters.
#[must_use]
pub fn is_meaningful_concept(concept: &str) -> bool {
    let lower = concept.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();

    match words.as_slice() {
        [] => return false,
        [only] => {
            if AUXILIARIES.contains(only) || PRONOUNS.contains(only) || QUESTION_WORDS.contains(only)
            {
                return false;
            }
        }
        [first, .., last] => {
            if DETERMINERS.contains(first) || DETERMINERS.contains(last) {
                return false;
            }
        }
    }

    words
        .iter()
        .any(|w| w.chars().count() >= 4 && !is_stop_word(w))
}

/// Trims, drops one leading article, collapses whitespace and caps at 100 characters.
#[must_use]
pub fn clean_entity(text: &str) -> String {
    let mut words = text.split_whitespace().peekable();

    if let Some(first) = words.peek() {
        let is_article = LEADING_ARTICLES
            .iter()
            .any(|a| first.eq_ignore_ascii_case(a));
        if is_article && text.split_whitespace().nth(1).is_some() {
            words.next();
        }
    }

    let joined = words.collect::<Vec<_>>().join(" ");
    truncate_chars(&joined, 100)
}

#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_word_rejects_fillers() {
        assert!(is_random_word("thing"));
        assert!(is_random_word("People"));
        assert!(is_random_word("ab"));
        assert!(is_random_word("the"));
        assert!(is_random_word("big time"));
    }

    #[test]
    fn test_random_word_keeps_content_and_numbers() {
        assert!(!is_random_word("Federal Reserve"));
        assert!(!is_random_word("economic slowdown"));
        assert!(!is_random_word("$1,200"));
        assert!(!is_random_word("4.5 %"));
    }

    #[test]
    fn test_meaningful_concept() {
        assert!(is_meaningful_concept("interest rates"));
        assert!(!is_meaningful_concept("the rates"));
        assert!(!is_meaningful_concept("rates that"));
        assert!(!is_meaningful_concept("would"));
        assert!(!is_meaningful_concept("they"));
        assert!(!is_meaningful_concept("which"));
        assert!(!is_meaningful_concept("a b c"));
        assert!(!is_meaningful_concept(""));
    }

    #[test]
    fn test_clean_entity() {
        assert_eq!(clean_entity("  the Federal   Reserve "), "Federal Reserve");
        assert_eq!(clean_entity("An economic slowdown"), "economic slowdown");
        assert_eq!(clean_entity("the"), "the");
        assert_eq!(clean_entity("theory of change"), "theory of change");
        assert_eq!(clean_entity(&"x".repeat(150)).len(), 100);
    }

    #[test]
    fn test_stop_words_case_insensitive() {
        assert!(is_stop_word("The"));
        assert!(!is_stop_word("theory"));
    }
}
