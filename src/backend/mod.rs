//! Capability traits for the external NLP collaborators.
//!
//! The tokenizer, POS tagger, named-entity tagger, and lemmatizer are
//! consumed through their call contracts only; alternate backends substitute
//! here without touching masking or orchestration logic. Implementations are
//! statically dispatched.

pub mod lexicon;

/// Entity label meaning "no recognized entity".
pub const NO_ENTITY: &str = "O";

/// Coarse grammatical class driving which lemmatization rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosCategory {
    Adjective,
    Noun,
    Adverb,
    Verb,
}

impl PosCategory {
    /// Derive the category from a fine-grained tag: the first letter,
    /// uppercased, selects `A`/`N`/`R`/`V`; everything else defaults to
    /// `Noun`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('A') => PosCategory::Adjective,
            Some('N') => PosCategory::Noun,
            Some('R') => PosCategory::Adverb,
            Some('V') => PosCategory::Verb,
            _ => PosCategory::Noun,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PosCategory::Adjective => "adjective",
            PosCategory::Noun => "noun",
            PosCategory::Adverb => "adverb",
            PosCategory::Verb => "verb",
        }
    }
}

/// Contract: given a sentence, return its tokens in order.
pub trait Tokenize {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Contract: given tokens, return `(token, tag)` pairs in order.
pub trait PosTag {
    fn tag(&self, tokens: &[String]) -> Vec<(String, String)>;
}

/// Contract: given tokens, return `(token, entity-label)` pairs in order,
/// with [`NO_ENTITY`] denoting no recognized entity.
pub trait NerTag {
    fn tag(&self, tokens: &[String]) -> Vec<(String, String)>;
}

/// Contract: given a word and its grammatical category, return its base form.
pub trait Lemmatize {
    fn lemmatize(&self, word: &str, category: PosCategory) -> String;
}

/// Umbrella bound for a full set of collaborator handles.
pub trait Backend: Tokenize + PosTag + NerTag + Lemmatize {}

impl<T> Backend for T where T: Tokenize + PosTag + NerTag + Lemmatize {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_penn_tags() {
        assert_eq!(PosCategory::from_tag("NN"), PosCategory::Noun);
        assert_eq!(PosCategory::from_tag("NNS"), PosCategory::Noun);
        assert_eq!(PosCategory::from_tag("VBP"), PosCategory::Verb);
        assert_eq!(PosCategory::from_tag("VBD"), PosCategory::Verb);
        assert_eq!(PosCategory::from_tag("RB"), PosCategory::Adverb);
        assert_eq!(PosCategory::from_tag("ADJ"), PosCategory::Adjective);
    }

    #[test]
    fn test_category_defaults_to_noun() {
        // Penn adjectives start with 'J' and therefore fall back to noun;
        // only tags starting with A/N/R/V select a non-default category.
        assert_eq!(PosCategory::from_tag("JJ"), PosCategory::Noun);
        assert_eq!(PosCategory::from_tag("IN"), PosCategory::Noun);
        assert_eq!(PosCategory::from_tag(","), PosCategory::Noun);
        assert_eq!(PosCategory::from_tag(""), PosCategory::Noun);
    }

    #[test]
    fn test_category_first_letter_is_case_insensitive() {
        assert_eq!(PosCategory::from_tag("vbz"), PosCategory::Verb);
        assert_eq!(PosCategory::from_tag("nns"), PosCategory::Noun);
    }
}
