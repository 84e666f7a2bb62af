// Sentence lemmatization orchestration: tokenize, restore masked compounds,
// POS-tag, apply the first-token capitalization rule, lemmatize.

use tracing::debug;

use crate::backend::{Backend, Lemmatize, NerTag, PosCategory, PosTag, Tokenize, NO_ENTITY};
use crate::backend::lexicon::LexiconBackend;
use crate::error::Error;
use crate::masker::{DEFAULT_MARKER, DEFAULT_TARGET};

/// Per-call configuration for lemmatization.
///
/// `marker` is what compound tokens are split on; `target` is what rejoins
/// their sub-parts into the human-readable phrase (normally a space).
#[derive(Debug, Clone)]
pub struct LemmatizeOptions {
    pub marker: String,
    pub target: String,
}

impl Default for LemmatizeOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            target: DEFAULT_TARGET.to_string(),
        }
    }
}

impl LemmatizeOptions {
    pub fn with_marker(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.marker.is_empty() {
            return Err(Error::configuration("marker must not be empty"));
        }
        if self.marker == self.target {
            return Err(Error::configuration(
                "marker must differ from the target sequence",
            ));
        }
        Ok(())
    }
}

/// Input to the polymorphic entry point: a single text or a list of texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInput {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for TextInput {
    fn from(text: &str) -> Self {
        TextInput::One(text.to_string())
    }
}

impl From<String> for TextInput {
    fn from(text: String) -> Self {
        TextInput::One(text)
    }
}

impl From<Vec<String>> for TextInput {
    fn from(texts: Vec<String>) -> Self {
        TextInput::Many(texts)
    }
}

impl From<&[&str]> for TextInput {
    fn from(texts: &[&str]) -> Self {
        TextInput::Many(texts.iter().map(|t| t.to_string()).collect())
    }
}

/// JSON boundary for the polymorphic entry point: a string or an array of
/// strings; any other shape fails with [`Error::InvalidInput`].
impl TryFrom<serde_json::Value> for TextInput {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self, Error> {
        match value {
            serde_json::Value::String(text) => Ok(TextInput::One(text)),
            serde_json::Value::Array(items) => {
                let mut texts = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        serde_json::Value::String(text) => texts.push(text),
                        other => {
                            return Err(Error::InvalidInput {
                                found: format!("array containing {}", json_type_name(&other)),
                            })
                        }
                    }
                }
                Ok(TextInput::Many(texts))
            }
            other => Err(Error::InvalidInput {
                found: json_type_name(&other).to_string(),
            }),
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Result of [`SentenceLemmatizer::auto_lemmatize`], mirroring the input
/// shape it dispatched on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LemmaOutput {
    One(Vec<String>),
    Many(Vec<Vec<String>>),
}

/// Tokenizes, POS-tags, and lemmatizes sentences against an injected
/// backend, restoring masked compound phrases along the way.
///
/// Stateless per call; the backend handles are shared read-only.
#[derive(Debug)]
pub struct SentenceLemmatizer<B> {
    backend: B,
}

impl SentenceLemmatizer<LexiconBackend> {
    /// Construct over the bundled lexicon backend.
    ///
    /// Fails with [`Error::ResourceNotFound`] when the model or gazetteer
    /// artifact cannot be located or loaded.
    pub fn from_paths(
        model_path: impl AsRef<std::path::Path>,
        gazetteer_path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Error> {
        Ok(Self::new(LexiconBackend::from_paths(
            model_path,
            gazetteer_path,
        )?))
    }
}

impl<B: Backend> SentenceLemmatizer<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Lemmatize one (possibly masked) text into lemmas in token order.
    pub fn lemmatize_one(&self, text: &str, opts: &LemmatizeOptions) -> Result<Vec<String>, Error> {
        Ok(self
            .lemmatize_tagged(text, opts)?
            .into_iter()
            .map(|(lemma, _)| lemma)
            .collect())
    }

    /// Lemmatize one text into `(lemma, tag)` pairs in token order.
    pub fn lemmatize_one_with_pos(
        &self,
        text: &str,
        opts: &LemmatizeOptions,
    ) -> Result<Vec<(String, String)>, Error> {
        self.lemmatize_tagged(text, opts)
    }

    /// Lazily lemmatize a list of texts, order preserved, each item
    /// independent of the others.
    pub fn lemmatize_many<'a>(
        &'a self,
        texts: &'a [String],
        opts: &'a LemmatizeOptions,
    ) -> impl Iterator<Item = Result<Vec<String>, Error>> + 'a {
        texts.iter().map(move |text| self.lemmatize_one(text, opts))
    }

    /// Lazy `(lemma, tag)` variant of [`Self::lemmatize_many`].
    pub fn lemmatize_many_with_pos<'a>(
        &'a self,
        texts: &'a [String],
        opts: &'a LemmatizeOptions,
    ) -> impl Iterator<Item = Result<Vec<(String, String)>, Error>> + 'a {
        texts
            .iter()
            .map(move |text| self.lemmatize_one_with_pos(text, opts))
    }

    /// The six-step core. Tags are always computed; the lemma-only entry
    /// points drop them at the end.
    fn lemmatize_tagged(
        &self,
        text: &str,
        opts: &LemmatizeOptions,
    ) -> Result<Vec<(String, String)>, Error> {
        opts.validate()?;

        let tokens = self.backend.tokenize(text);
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        // Restore masked compounds: split on the marker, lemmatize the final
        // sub-part in isolation, rejoin with the target sequence.
        let mut words: Vec<String> = Vec::with_capacity(tokens.len());
        for token in tokens {
            if token.contains(&opts.marker) {
                words.push(self.restore_compound(&token, opts));
            } else {
                words.push(token);
            }
        }

        // Full-sentence context this time: restored compounds occupy a
        // single slot in the sequence.
        let pos_tags = PosTag::tag(&self.backend, &words);

        // First-token capitalization: lowercase unless the token carries a
        // named entity or is the literal pronoun "I".
        let entities = NerTag::tag(&self.backend, &words);
        let first_is_entity = entities
            .first()
            .is_some_and(|(_, label)| label != NO_ENTITY);
        if !first_is_entity && words[0] != "I" {
            debug!(token = %words[0], "Lowercasing sentence-initial token");
            words[0] = words[0].to_lowercase();
        }

        Ok(words
            .into_iter()
            .zip(pos_tags)
            .map(|(word, (_, tag))| {
                let lemma = self.backend.lemmatize(&word, PosCategory::from_tag(&tag));
                (lemma, tag)
            })
            .collect())
    }

    /// Split a marker-bearing token, lemmatize its final sub-part by the
    /// category of that bare word, and rejoin with the target sequence.
    ///
    /// Empty sub-parts (a phrase beginning or ending with the target) are
    /// preserved verbatim; an empty final sub-part is neither tagged nor
    /// lemmatized.
    fn restore_compound(&self, token: &str, opts: &LemmatizeOptions) -> String {
        let mut parts: Vec<String> = token
            .split(opts.marker.as_str())
            .map(str::to_owned)
            .collect();

        let last = parts.len() - 1;
        if !parts[last].is_empty() {
            // The tagger sees the bare word, not the whole compound.
            let tagged = PosTag::tag(&self.backend, &parts[last..]);
            let category = tagged
                .first()
                .map(|(_, tag)| PosCategory::from_tag(tag))
                .unwrap_or(PosCategory::Noun);
            parts[last] = self.backend.lemmatize(&parts[last], category);
        }
        parts.join(&opts.target)
    }
}

impl<B: Backend + Sync> SentenceLemmatizer<B> {
    /// Fan a list of texts out across `workers` scoped threads, one text per
    /// unit of work, results collected by input index.
    pub fn lemmatize_batch(
        &self,
        texts: &[String],
        opts: &LemmatizeOptions,
        workers: usize,
    ) -> Result<Vec<Vec<String>>, Error> {
        let tagged = self.batch_tagged(texts, opts, workers)?;
        Ok(tagged
            .into_iter()
            .map(|item| item.into_iter().map(|(lemma, _)| lemma).collect())
            .collect())
    }

    /// `(lemma, tag)` variant of [`Self::lemmatize_batch`].
    pub fn lemmatize_batch_with_pos(
        &self,
        texts: &[String],
        opts: &LemmatizeOptions,
        workers: usize,
    ) -> Result<Vec<Vec<(String, String)>>, Error> {
        self.batch_tagged(texts, opts, workers)
    }

    fn batch_tagged(
        &self,
        texts: &[String],
        opts: &LemmatizeOptions,
        workers: usize,
    ) -> Result<Vec<Vec<(String, String)>>, Error> {
        opts.validate()?;
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let workers = workers.clamp(1, texts.len());
        let chunk_size = (texts.len() + workers - 1) / workers;
        debug!(texts = texts.len(), workers, chunk_size, "Starting batch lemmatization");

        // No shared mutable state: each worker owns a disjoint slice of the
        // results vector.
        let mut results: Vec<Result<Vec<(String, String)>, Error>> =
            vec![Ok(Vec::new()); texts.len()];
        std::thread::scope(|scope| {
            for (text_chunk, out_chunk) in
                texts.chunks(chunk_size).zip(results.chunks_mut(chunk_size))
            {
                scope.spawn(move || {
                    for (text, slot) in text_chunk.iter().zip(out_chunk.iter_mut()) {
                        *slot = self.lemmatize_tagged(text, opts);
                    }
                });
            }
        });

        results.into_iter().collect()
    }

    /// Polymorphic entry point: dispatches to the singular form for a single
    /// text and to the parallel batch form for a list.
    pub fn auto_lemmatize(
        &self,
        input: impl Into<TextInput>,
        opts: &LemmatizeOptions,
    ) -> Result<LemmaOutput, Error> {
        match input.into() {
            TextInput::One(text) => Ok(LemmaOutput::One(self.lemmatize_one(&text, opts)?)),
            TextInput::Many(texts) => Ok(LemmaOutput::Many(self.lemmatize_batch(
                &texts,
                opts,
                num_cpus::get(),
            )?)),
        }
    }
}
