// Corpus-filtering helpers over lists of sentences.

/// Return the sentences containing `word` as a literal substring, in input
/// order.
pub fn find_with_word(word: &str, sentences: &[String]) -> Vec<String> {
    sentences
        .iter()
        .filter(|sentence| sentence.contains(word))
        .cloned()
        .collect()
}

/// Replace every literal occurrence of `from` with `to` in each sentence.
pub fn replace_word(from: &str, to: &str, sentences: &[String]) -> Vec<String> {
    sentences
        .iter()
        .map(|sentence| sentence.replace(from, to))
        .collect()
}
