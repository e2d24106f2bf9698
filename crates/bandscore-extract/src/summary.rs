//! Extractive passage summaries.
//!
//! The summary is the opening sentences of the passage, which for exam
//! passages usually carry the topic and the writer's position.

use std::sync::LazyLock;

use regex::Regex;

use bandscore_core::error::ScoreError;

/// Share of sentences kept when no ratio is given.
pub const DEFAULT_RATIO: f64 = 0.3;

/// Terminal punctuation, optional closing quotes or brackets, then a space.
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[.!?]+["'\u{201D}\u{2019})\]]*\s+"#).expect("sentence boundary regex")
});

/// Words whose trailing period does not end a sentence.
const ABBREVIATIONS: [&str; 9] = ["mr", "mrs", "ms", "dr", "prof", "st", "e.g", "i.e", "vs"];

fn is_abbreviation(before: &str) -> bool {
    let word = before
        .rsplit(' ')
        .next()
        .unwrap_or("")
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    let initial = word.chars().count() == 1 && word.chars().all(char::is_alphabetic);
    initial || ABBREVIATIONS.contains(&word.as_str())
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let sentence = raw.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
}

/// Split text into sentences. Line breaks inside a sentence are joined.
///
/// A boundary followed by a lowercase word (`"Why?" he asked`) does not end
/// the sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END.find_iter(&normalized) {
        let continues_lowercase = normalized[m.end()..]
            .chars()
            .next()
            .is_some_and(char::is_lowercase);
        if continues_lowercase || is_abbreviation(&normalized[start..m.start()]) {
            continue;
        }
        push_sentence(&mut sentences, &normalized[start..m.end()]);
        start = m.end();
    }
    push_sentence(&mut sentences, &normalized[start..]);
    sentences
}

/// Keep the first `ratio` of the passage's sentences, at least one.
///
/// Ratios above 1 are treated as 1; zero, negative and non-finite ratios
/// are rejected.
pub fn summarize_passage(text: &str, ratio: f64) -> Result<String, ScoreError> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(ScoreError::InvalidInput(format!(
            "summary ratio must be above 0, got {ratio}"
        )));
    }
    let ratio = ratio.min(1.0);

    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return Err(ScoreError::InvalidInput(
            "passage has no sentences to summarize".into(),
        ));
    }

    let keep = ((sentences.len() as f64 * ratio).floor() as usize).max(1);
    tracing::debug!(sentences = sentences.len(), keep, "summarized passage");
    Ok(sentences[..keep].join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_passage(n: usize) -> String {
        (1..=n)
            .map(|i| format!("Sentence number {i} is here."))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn keeps_leading_share_of_sentences() {
        let summary = summarize_passage(&numbered_passage(10), DEFAULT_RATIO).unwrap();
        assert_eq!(
            summary,
            "Sentence number 1 is here. Sentence number 2 is here. Sentence number 3 is here."
        );
    }

    #[test]
    fn always_keeps_one_sentence() {
        let summary = summarize_passage(&numbered_passage(2), 0.1).unwrap();
        assert_eq!(summary, "Sentence number 1 is here.");
    }

    #[test]
    fn ratio_above_one_keeps_everything() {
        let passage = numbered_passage(3);
        assert_eq!(summarize_passage(&passage, 4.0).unwrap(), passage);
    }

    #[test]
    fn non_positive_ratio_is_rejected() {
        for ratio in [0.0, -0.5, f64::NAN] {
            assert!(matches!(
                summarize_passage("One. Two.", ratio),
                Err(ScoreError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(matches!(
            summarize_passage(" \n\t ", DEFAULT_RATIO),
            Err(ScoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn split_handles_abbreviations_decimals_and_line_breaks() {
        let text = "Dr. Smith measured\na rise of 3.5 metres, e.g. near J. Cook's hut!\n\"Was it real?\" he asked. Nobody knew";
        let sentences = split_sentences(text);
        assert_eq!(
            sentences,
            vec![
                "Dr. Smith measured a rise of 3.5 metres, e.g. near J. Cook's hut!",
                "\"Was it real?\" he asked.",
                "Nobody knew",
            ]
        );
    }
}
