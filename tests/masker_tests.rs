// Masking properties over the public PhraseMasker API.

use lemmask::{Error, PhraseMasker, DEFAULT_MARKER, DEFAULT_TARGET};

#[test]
fn test_mask_is_noop_on_phrase_free_text() {
    let masker =
        PhraseMasker::new(["New York", "El Nino"], DEFAULT_TARGET, DEFAULT_MARKER).unwrap();
    let texts = [
        "Proverbs are short sentences drawn from long experience.",
        "",
        "new york is lowercase and does not match",
        "NewYork has no internal space",
    ];
    for text in texts {
        assert_eq!(masker.mask(text), text, "expected identity for {text:?}");
    }
}

#[test]
fn test_single_occurrence_differs_only_inside_span() {
    let phrases = ["New York", "police officer", "El Nino"];
    let masker = PhraseMasker::new(phrases, DEFAULT_TARGET, DEFAULT_MARKER).unwrap();

    for phrase in phrases {
        let prefix = "Before the span ";
        let suffix = " after the span.";
        let text = format!("{prefix}{phrase}{suffix}");
        let expected = format!(
            "{prefix}{}{suffix}",
            phrase.replace(DEFAULT_TARGET, DEFAULT_MARKER)
        );
        assert_eq!(masker.mask(&text), expected);
    }
}

#[test]
fn test_every_internal_target_in_span_becomes_marker() {
    let masker = PhraseMasker::new(
        ["United States of America"],
        DEFAULT_TARGET,
        DEFAULT_MARKER,
    )
    .unwrap();
    let masked = masker.mask("the United States of America today");
    assert_eq!(
        masked,
        "the United\u{2022}States\u{2022}of\u{2022}America today"
    );
    // No marker leaks outside the span.
    assert_eq!(masked.matches('\u{2022}').count(), 3);
}

#[test]
fn test_masking_round_trips_through_replacement() {
    // Masking then restoring the marker recovers the original byte-for-byte.
    let masker =
        PhraseMasker::new(["New York", "El Nino"], DEFAULT_TARGET, DEFAULT_MARKER).unwrap();
    let text = "New York felt El Nino before New York did.";
    let masked = masker.mask(text);
    assert_ne!(masked, text);
    assert_eq!(masked.replace(DEFAULT_MARKER, DEFAULT_TARGET), text);
}

#[test]
fn test_custom_target_and_marker() {
    let masker = PhraseMasker::new(["a la carte"], " ", "_").unwrap();
    assert_eq!(
        masker.mask("They ordered a la carte twice."),
        "They ordered a_la_carte twice."
    );
}

#[test]
fn test_configuration_errors_are_reported_at_construction() {
    let err = PhraseMasker::new(["New York"], "\u{2022}", "\u{2022}").unwrap_err();
    match err {
        Error::Configuration { message } => {
            assert!(message.contains("marker"), "unexpected message: {message}")
        }
        other => panic!("expected Configuration error, got {other:?}"),
    }
}
