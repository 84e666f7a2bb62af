// Lookup-driven reference backend. Construction loads two artifacts from
// disk: a JSON lexicon (tags + lemma rules) and a TSV entity gazetteer.
// This backend exists so construction-from-paths, the CLI, and the
// integration tests are real; serious backends substitute through the
// traits in `backend`.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::backend::{Lemmatize, NerTag, PosCategory, PosTag, Tokenize, NO_ENTITY};
use crate::error::Error;

/// Lemmatization rules for one POS category: an exception table consulted
/// first, then ordered suffix rules `(strip, append)` applied to the first
/// match that leaves a non-empty stem.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LemmaRules {
    #[serde(default)]
    pub exceptions: HashMap<String, String>,
    #[serde(default)]
    pub suffixes: Vec<(String, String)>,
}

/// On-disk lexicon model: a fine-grained tag per known word plus lemma rules
/// per category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Lexicon {
    #[serde(default)]
    pub tags: HashMap<String, String>,
    #[serde(default)]
    pub adjective: LemmaRules,
    #[serde(default)]
    pub noun: LemmaRules,
    #[serde(default)]
    pub adverb: LemmaRules,
    #[serde(default)]
    pub verb: LemmaRules,
}

/// Backend implementing all four collaborator contracts from loaded lookup
/// tables. Read-only after construction and safe to share across workers.
#[derive(Debug, Clone)]
pub struct LexiconBackend {
    lexicon: Lexicon,
    gazetteer: HashMap<String, String>,
}

impl LexiconBackend {
    /// Load the backend from a JSON lexicon model and a gazetteer file with
    /// one `surface<TAB>label` entry per line (label defaults to `MISC`).
    ///
    /// Fails with [`Error::ResourceNotFound`] naming the offending path when
    /// either artifact cannot be located or parsed.
    pub fn from_paths(
        model_path: impl AsRef<Path>,
        gazetteer_path: impl AsRef<Path>,
    ) -> Result<Self, Error> {
        let model_path = model_path.as_ref();
        let raw = std::fs::read_to_string(model_path).map_err(|e| Error::ResourceNotFound {
            path: model_path.display().to_string(),
            reason: e.to_string(),
        })?;
        let lexicon: Lexicon =
            serde_json::from_str(&raw).map_err(|e| Error::ResourceNotFound {
                path: model_path.display().to_string(),
                reason: format!("malformed lexicon model: {e}"),
            })?;

        let gazetteer_path = gazetteer_path.as_ref();
        let raw = std::fs::read_to_string(gazetteer_path).map_err(|e| Error::ResourceNotFound {
            path: gazetteer_path.display().to_string(),
            reason: e.to_string(),
        })?;
        let gazetteer = parse_gazetteer(&raw);

        info!(
            words = lexicon.tags.len(),
            entities = gazetteer.len(),
            "Loaded lexicon backend"
        );
        Ok(Self { lexicon, gazetteer })
    }

    fn tag_word(&self, token: &str) -> String {
        if token.is_empty() {
            return "NN".to_string();
        }
        if let Some(tag) = self.lexicon.tags.get(token) {
            return tag.clone();
        }
        if let Some(tag) = self.lexicon.tags.get(&token.to_lowercase()) {
            return tag.clone();
        }
        if token.chars().all(|c| c.is_ascii_punctuation()) {
            // Penn convention: punctuation tags itself.
            return token.to_string();
        }
        if token.chars().next().is_some_and(char::is_uppercase) {
            return "NNP".to_string();
        }
        "NN".to_string()
    }

    fn rules_for(&self, category: PosCategory) -> &LemmaRules {
        match category {
            PosCategory::Adjective => &self.lexicon.adjective,
            PosCategory::Noun => &self.lexicon.noun,
            PosCategory::Adverb => &self.lexicon.adverb,
            PosCategory::Verb => &self.lexicon.verb,
        }
    }
}

fn parse_gazetteer(raw: &str) -> HashMap<String, String> {
    let mut entries = HashMap::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.split_once('\t') {
            Some((surface, label)) => {
                entries.insert(surface.to_string(), label.trim().to_string());
            }
            None => {
                entries.insert(line.to_string(), "MISC".to_string());
            }
        }
    }
    entries
}

impl Tokenize for LexiconBackend {
    /// Whitespace tokenization with leading/trailing ASCII punctuation
    /// peeled into tokens of their own. Marker-bearing compounds are not
    /// punctuation and stay whole.
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for word in text.split_whitespace() {
            let mut core = word;
            let mut leading = Vec::new();
            while let Some(c) = core.chars().next() {
                if !c.is_ascii_punctuation() {
                    break;
                }
                leading.push(c);
                core = &core[c.len_utf8()..];
            }
            let mut trailing = Vec::new();
            while let Some(c) = core.chars().next_back() {
                if !c.is_ascii_punctuation() {
                    break;
                }
                trailing.push(c);
                core = &core[..core.len() - c.len_utf8()];
            }
            tokens.extend(leading.into_iter().map(String::from));
            if !core.is_empty() {
                tokens.push(core.to_string());
            }
            tokens.extend(trailing.into_iter().rev().map(String::from));
        }
        debug!(count = tokens.len(), "Tokenized input");
        tokens
    }
}

impl PosTag for LexiconBackend {
    fn tag(&self, tokens: &[String]) -> Vec<(String, String)> {
        tokens
            .iter()
            .map(|t| (t.clone(), self.tag_word(t)))
            .collect()
    }
}

impl NerTag for LexiconBackend {
    fn tag(&self, tokens: &[String]) -> Vec<(String, String)> {
        tokens
            .iter()
            .map(|t| {
                let label = self
                    .gazetteer
                    .get(t.as_str())
                    .cloned()
                    .unwrap_or_else(|| NO_ENTITY.to_string());
                (t.clone(), label)
            })
            .collect()
    }
}

impl Lemmatize for LexiconBackend {
    fn lemmatize(&self, word: &str, category: PosCategory) -> String {
        let rules = self.rules_for(category);
        if let Some(lemma) = rules.exceptions.get(word) {
            return lemma.clone();
        }
        for (suffix, append) in &rules.suffixes {
            // A rule must leave a non-empty stem behind.
            if word.len() > suffix.len() && word.ends_with(suffix.as_str()) {
                let stem = &word[..word.len() - suffix.len()];
                return format!("{stem}{append}");
            }
        }
        word.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn backend() -> LexiconBackend {
        let lexicon: Lexicon = serde_json::from_value(json!({
            "tags": {
                "in": "IN",
                "I": "PRP",
                "saw": "VBD",
                "and": "CC",
                "officers": "NNS",
                "firefighters": "NNS"
            },
            "noun": {
                "exceptions": { "geese": "goose" },
                "suffixes": [["ies", "y"], ["s", ""]]
            },
            "verb": {
                "exceptions": { "saw": "see", "are": "be" },
                "suffixes": [["ing", ""], ["ed", ""], ["s", ""]]
            }
        }))
        .unwrap();
        let gazetteer = parse_gazetteer("New York\tLOCATION\nStanford\n");
        LexiconBackend { lexicon, gazetteer }
    }

    #[test]
    fn test_tokenize_peels_edge_punctuation() {
        let b = backend();
        assert_eq!(
            b.tokenize("In New\u{2022}York, I saw firefighters."),
            vec!["In", "New\u{2022}York", ",", "I", "saw", "firefighters", "."]
        );
    }

    #[test]
    fn test_tokenize_keeps_interior_punctuation() {
        let b = backend();
        assert_eq!(b.tokenize("don't stop"), vec!["don't", "stop"]);
    }

    #[test]
    fn test_tokenize_all_punctuation_word() {
        let b = backend();
        assert_eq!(b.tokenize("wait ..."), vec!["wait", ".", ".", "."]);
    }

    #[test]
    fn test_tag_lookup_and_fallbacks() {
        let b = backend();
        assert_eq!(b.tag_word("saw"), "VBD");
        assert_eq!(b.tag_word("In"), "IN"); // case-insensitive lexicon hit
        assert_eq!(b.tag_word(","), ",");
        assert_eq!(b.tag_word("York"), "NNP");
        assert_eq!(b.tag_word("blorple"), "NN");
    }

    #[test]
    fn test_lemmatize_exceptions_before_suffix_rules() {
        let b = backend();
        assert_eq!(b.lemmatize("saw", PosCategory::Verb), "see");
        assert_eq!(b.lemmatize("geese", PosCategory::Noun), "goose");
    }

    #[test]
    fn test_lemmatize_suffix_rules_in_order() {
        let b = backend();
        assert_eq!(b.lemmatize("cities", PosCategory::Noun), "city");
        assert_eq!(b.lemmatize("officers", PosCategory::Noun), "officer");
        assert_eq!(b.lemmatize("running", PosCategory::Verb), "runn");
    }

    #[test]
    fn test_lemmatize_never_strips_to_empty_stem() {
        let b = backend();
        assert_eq!(b.lemmatize("s", PosCategory::Noun), "s");
    }

    #[test]
    fn test_ner_gazetteer_membership() {
        let b = backend();
        let tokens = vec!["New York".to_string(), "in".to_string()];
        let tagged = NerTag::tag(&b, &tokens);
        assert_eq!(tagged[0].1, "LOCATION");
        assert_eq!(tagged[1].1, NO_ENTITY);
    }

    #[test]
    fn test_gazetteer_label_defaults_to_misc() {
        let b = backend();
        let tokens = vec!["Stanford".to_string()];
        assert_eq!(NerTag::tag(&b, &tokens)[0].1, "MISC");
    }

    #[test]
    fn test_from_paths_missing_model_fails() {
        let err = LexiconBackend::from_paths("/nonexistent/model.json", "/nonexistent/gaz.tsv")
            .unwrap_err();
        match err {
            Error::ResourceNotFound { path, .. } => assert!(path.contains("model.json")),
            other => panic!("expected ResourceNotFound, got {other:?}"),
        }
    }
}
