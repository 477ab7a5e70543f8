use std::collections::BTreeSet;

use serde::Serialize;

use super::attribute::{ALIASES, Attribute, ElementTag, lookup_alias};
use super::monster_index::{MonsterIndex, MonsterMention};
use super::vocabulary::{
    ATTACK_WORD, CRIT_WORD, DEGREE_SUFFIX, EFFECTIVE_PHRASES, ELEMENT_WORD, HIGH_TIER_WORD,
    HIGH_WORD, LOW_TIER_WORD, LOW_WORD, MOST_EFFECTIVE_PHRASES, RARITY_WORD, RATE_SUFFIX,
    STRONG_WORDS, WEAK_WORDS,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Superlative {
    /// "the single best": keep only the top total attack.
    MostEffective,
    /// "effective": keep the top three.
    Effective,
    Unspecified,
}

impl Superlative {
    fn detect(text: &str) -> Self {
        if contains_any(text, &MOST_EFFECTIVE_PHRASES) {
            Self::MostEffective
        } else if contains_any(text, &EFFECTIVE_PHRASES) {
            Self::Effective
        } else {
            Self::Unspecified
        }
    }
}

/// Everything the interpreter understood from one question.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QueryIntent {
    pub attack_focus: bool,
    pub crit_focus: bool,
    pub high: bool,
    pub low: bool,
    pub low_tier: bool,
    pub high_tier: bool,
    pub exact_rarity: Option<i64>,
    pub crit_rate_threshold: Option<i64>,
    pub superlative: Superlative,
    pub strong: bool,
    pub weak: bool,
    pub attributes: BTreeSet<ElementTag>,
    pub monsters: Vec<MonsterMention>,
}

impl QueryIntent {
    pub fn extract(text: &str, tokens: &[String], index: &MonsterIndex) -> Self {
        let monsters = index.detect_mentions(text);
        let mut attributes = detect_attributes(text, tokens);
        attributes.extend(monsters.iter().map(|mention| mention.weakness.clone()));

        let has_token = |word: &str| tokens.iter().any(|token| token == word);
        let crit_rate_threshold = find_numeric_window(tokens, CRIT_WORD, RATE_SUFFIX);

        Self {
            attack_focus: has_token(ATTACK_WORD),
            crit_focus: has_token(CRIT_WORD) && crit_rate_threshold.is_none(),
            high: has_token(HIGH_WORD),
            low: has_token(LOW_WORD),
            low_tier: has_token(LOW_TIER_WORD),
            high_tier: has_token(HIGH_TIER_WORD),
            exact_rarity: find_numeric_window(tokens, RARITY_WORD, DEGREE_SUFFIX),
            crit_rate_threshold,
            superlative: Superlative::detect(text),
            strong: contains_any(text, &STRONG_WORDS),
            weak: contains_any(text, &WEAK_WORDS),
            attributes,
            monsters,
        }
    }

    pub fn targets_monster(&self) -> bool {
        !self.monsters.is_empty() && !self.attributes.is_empty()
    }
}

fn contains_any(text: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|pattern| text.contains(pattern))
}

fn detect_attributes(text: &str, tokens: &[String]) -> BTreeSet<ElementTag> {
    let mut found = ALIASES
        .iter()
        .filter(|(alias, _)| text.contains(alias))
        .map(|(_, attribute)| ElementTag::Known(*attribute))
        .collect::<BTreeSet<ElementTag>>();

    for (position, token) in tokens.iter().enumerate() {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        if let Some(attribute) = lookup_alias(token) {
            found.insert(ElementTag::Known(attribute));
        }

        let followed_by_element = tokens
            .get(position + 1)
            .is_some_and(|next| next == ELEMENT_WORD);
        if followed_by_element {
            if let Some(attribute) = Attribute::from_canonical(token) {
                found.insert(ElementTag::Known(attribute));
            }
        }
    }

    found
}

/// First `first second <digits>` window, scanning left to right.
fn find_numeric_window(tokens: &[String], first: &str, second: &str) -> Option<i64> {
    tokens.windows(3).find_map(|window| {
        if window[0] == first && window[1] == second {
            parse_digits(&window[2])
        } else {
            None
        }
    })
}

fn parse_digits(token: &str) -> Option<i64> {
    if token.is_empty() {
        return None;
    }

    token.chars().try_fold(0_i64, |value, character| {
        let digit = match character {
            '0'..='9' => character.to_digit(10)?,
            '０'..='９' => u32::from(character) - u32::from('０'),
            _ => return None,
        };
        value.checked_mul(10)?.checked_add(i64::from(digit))
    })
}

#[cfg(test)]
mod tests {
    use super::{QueryIntent, Superlative, parse_digits};
    use crate::commands::query::attribute::{Attribute, ElementTag};
    use crate::commands::query::monster_index::MonsterIndex;
    use crate::commands::query::segment::{LexiconSegmenter, Segmenter};
    use crate::model::{Cell, MonsterRecord};

    fn extract(text: &str) -> QueryIntent {
        extract_with(text, &MonsterIndex::default())
    }

    fn extract_with(text: &str, index: &MonsterIndex) -> QueryIntent {
        let tokens = LexiconSegmenter::new()
            .expect("segmenter should build")
            .segment(text);
        QueryIntent::extract(text, &tokens, index)
    }

    fn tokens(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn most_effective_phrase_dominates_effective_phrase() {
        let intent = extract("一番効く武器、有効なもの");
        assert_eq!(intent.superlative, Superlative::MostEffective);

        let intent = extract("有効な武器");
        assert_eq!(intent.superlative, Superlative::Effective);

        let intent = extract("おすすめの武器");
        assert_eq!(intent.superlative, Superlative::Unspecified);
    }

    #[test]
    fn strongest_sets_both_strong_flag_and_most_effective() {
        let intent = extract("最強の火属性");
        assert!(intent.strong);
        assert!(!intent.weak);
        assert_eq!(intent.superlative, Superlative::MostEffective);
    }

    #[test]
    fn alias_substrings_are_normalized() {
        let intent = extract("電撃か竜の武器");
        let expected = [
            ElementTag::Known(Attribute::Thunder),
            ElementTag::Known(Attribute::Dragon),
        ];
        assert!(expected.iter().all(|tag| intent.attributes.contains(tag)));
        assert_eq!(intent.attributes.len(), 2);
    }

    #[test]
    fn canonical_token_followed_by_element_word_is_detected() {
        let raw_tokens = tokens(&["睡眠", "属性", "の", "武器"]);
        let intent = QueryIntent::extract("睡ねむ", &raw_tokens, &MonsterIndex::default());
        assert!(
            intent
                .attributes
                .contains(&ElementTag::Known(Attribute::Sleep))
        );
    }

    #[test]
    fn monster_weakness_joins_detected_attributes() {
        let index = MonsterIndex::build(&[MonsterRecord {
            name: "アルファ".to_string(),
            weakness: "雷属性".to_string(),
            low_rank: Cell::Empty,
        }]);
        let intent = extract_with("アルファに効く武器", &index);

        assert_eq!(intent.monsters.len(), 1);
        assert!(intent.targets_monster());
        assert!(
            intent
                .attributes
                .contains(&ElementTag::Known(Attribute::Thunder))
        );
    }

    #[test]
    fn scalar_tokens_set_flags() {
        let intent = extract("下位で攻撃力が高い武器");
        assert!(intent.attack_focus);
        assert!(intent.high);
        assert!(intent.low_tier);
        assert!(!intent.high_tier);
        assert!(!intent.low);
        assert!(!intent.crit_focus);
    }

    #[test]
    fn rarity_window_takes_first_match() {
        let intent = extract("レア度5かレア度7");
        assert_eq!(intent.exact_rarity, Some(5));
    }

    #[test]
    fn crit_rate_window_replaces_crit_focus() {
        let intent = extract("会心率50以上で会心が高い");
        assert_eq!(intent.crit_rate_threshold, Some(50));
        assert!(!intent.crit_focus);
        assert!(intent.high);

        let intent = extract("会心が高い");
        assert_eq!(intent.crit_rate_threshold, None);
        assert!(intent.crit_focus);
    }

    #[test]
    fn window_without_digits_is_ignored() {
        let intent = QueryIntent::extract(
            "",
            &tokens(&["レア", "度", "高", "レア", "度", "３"]),
            &MonsterIndex::default(),
        );
        assert_eq!(intent.exact_rarity, Some(3));
    }

    #[test]
    fn parse_digits_accepts_ascii_and_full_width() {
        assert_eq!(parse_digits("42"), Some(42));
        assert_eq!(parse_digits("４２"), Some(42));
        assert_eq!(parse_digits("4a"), None);
        assert_eq!(parse_digits(""), None);
        assert_eq!(parse_digits("99999999999999999999"), None);
    }
}
