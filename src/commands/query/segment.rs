use anyhow::{Context, Result};
use regex::Regex;

use super::vocabulary::segmenter_lexicon;

const SCRIPT_RUN_PATTERN: &str =
    r"[\p{Han}々〆]+|[\p{Katakana}ー]+|\p{Hiragana}+|[0-9０-９]+|\p{Latin}+|\S";

/// Splits free text into an ordered sequence of surface tokens.
pub trait Segmenter {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Longest-match segmentation over the query vocabulary. Text between
/// vocabulary hits is cut into script runs (kanji, katakana, hiragana,
/// digits, latin), so `会心率50` comes out as `会心` `率` `50`.
#[derive(Debug, Clone)]
pub struct LexiconSegmenter {
    words: Vec<&'static str>,
    script_run: Regex,
}

impl LexiconSegmenter {
    pub fn new() -> Result<Self> {
        let mut words = segmenter_lexicon();
        words.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });

        let script_run = Regex::new(SCRIPT_RUN_PATTERN)
            .context("failed to compile script-run regex")?;

        Ok(Self { words, script_run })
    }

    fn longest_match(&self, rest: &str) -> Option<&'static str> {
        self.words
            .iter()
            .copied()
            .find(|word| rest.starts_with(word))
    }

    fn push_runs(&self, gap: &str, tokens: &mut Vec<String>) {
        tokens.extend(
            self.script_run
                .find_iter(gap)
                .map(|found| found.as_str().to_string()),
        );
    }
}

impl Segmenter for LexiconSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut gap_start = 0;
        let mut cursor = 0;

        while let Some(next_char) = text[cursor..].chars().next() {
            if let Some(word) = self.longest_match(&text[cursor..]) {
                self.push_runs(&text[gap_start..cursor], &mut tokens);
                tokens.push(word.to_string());
                cursor += word.len();
                gap_start = cursor;
            } else {
                cursor += next_char.len_utf8();
            }
        }

        self.push_runs(&text[gap_start..], &mut tokens);
        tokens
    }
}
