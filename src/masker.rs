// Phrase masking: rewrites a target sequence to a marker strictly inside
// configured multi-word phrases, leaving all other text untouched.

use crate::error::Error;

/// Default marker substituted for the target sequence inside matched phrases.
pub const DEFAULT_MARKER: &str = "\u{2022}";

/// Default target sequence replaced inside matched phrases.
pub const DEFAULT_TARGET: &str = " ";

/// Masks configured multi-word phrases so a word-boundary tokenizer treats
/// each occurrence as a single token.
///
/// Phrases are matched as literal substrings in declared order; once a span
/// has matched a phrase it is consumed and later phrases never re-match
/// inside it, even when the replacement left the bytes unchanged.
#[derive(Debug, Clone)]
pub struct PhraseMasker {
    phrases: Vec<String>,
    target: String,
    marker: String,
}

/// A run of working text during masking. `Masked` runs are consumed spans
/// that later phrases must not re-match inside.
enum Segment {
    Plain(String),
    Masked(String),
}

impl PhraseMasker {
    /// Create a masker over `phrases`, replacing `target` with `marker`
    /// inside each phrase occurrence.
    ///
    /// Fails with [`Error::Configuration`] when the marker equals the target
    /// (masking would be unobservable and irreversible), when either is
    /// empty, when a phrase is empty, or when a phrase already contains the
    /// marker (restoration would be ambiguous).
    pub fn new<I, S>(phrases: I, target: &str, marker: &str) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if target.is_empty() {
            return Err(Error::configuration("target sequence must not be empty"));
        }
        if marker.is_empty() {
            return Err(Error::configuration("marker must not be empty"));
        }
        if target == marker {
            return Err(Error::configuration(
                "marker must differ from the target sequence",
            ));
        }

        let phrases: Vec<String> = phrases.into_iter().map(Into::into).collect();
        for phrase in &phrases {
            if phrase.is_empty() {
                return Err(Error::configuration("phrases must not be empty"));
            }
            if phrase.contains(marker) {
                return Err(Error::configuration(format!(
                    "phrase {phrase:?} contains the marker {marker:?}"
                )));
            }
        }

        Ok(Self {
            phrases,
            target: target.to_string(),
            marker: marker.to_string(),
        })
    }

    /// Create a masker with the default target (a space) and marker (`•`).
    pub fn with_defaults<I, S>(phrases: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(phrases, DEFAULT_TARGET, DEFAULT_MARKER)
    }

    /// Configured phrases, in match-precedence order.
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// The sequence replaced inside matched phrases.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The sequence substituted for the target inside matched phrases.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Mask every occurrence of every configured phrase in `text`.
    ///
    /// Text outside phrase occurrences is returned byte-for-byte unchanged.
    /// Overlapping candidates are resolved by declaration order: the earlier
    /// phrase wins the span, and later phrases only match in the remaining
    /// plain runs.
    pub fn mask(&self, text: &str) -> String {
        let mut segments = vec![Segment::Plain(text.to_string())];

        for phrase in &self.phrases {
            let mut next = Vec::with_capacity(segments.len());
            for segment in segments {
                match segment {
                    Segment::Masked(s) => next.push(Segment::Masked(s)),
                    Segment::Plain(s) => self.mask_plain_run(&s, phrase, &mut next),
                }
            }
            segments = next;
        }

        let mut out = String::with_capacity(text.len());
        for segment in &segments {
            match segment {
                Segment::Plain(s) | Segment::Masked(s) => out.push_str(s),
            }
        }
        out
    }

    /// Scan one plain run for `phrase`, splitting it into plain runs and
    /// consumed masked spans. Matches are located left to right and never
    /// overlap each other.
    fn mask_plain_run(&self, run: &str, phrase: &str, out: &mut Vec<Segment>) {
        let mut rest = run;
        while let Some(pos) = rest.find(phrase) {
            if pos > 0 {
                out.push(Segment::Plain(rest[..pos].to_string()));
            }
            out.push(Segment::Masked(
                phrase.replace(&self.target, &self.marker),
            ));
            rest = &rest[pos + phrase.len()..];
        }
        if !rest.is_empty() {
            out.push(Segment::Plain(rest.to_string()));
        }
    }
}
