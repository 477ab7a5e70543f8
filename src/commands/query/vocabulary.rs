//! Surface words the query interpreter reacts to.

use super::attribute::{Attribute, single_word_aliases};

pub(crate) const ELEMENT_WORD: &str = "属性";

pub(crate) const ATTACK_WORD: &str = "攻撃";
pub(crate) const CRIT_WORD: &str = "会心";
pub(crate) const HIGH_WORD: &str = "高い";
pub(crate) const LOW_WORD: &str = "低い";
pub(crate) const LOW_TIER_WORD: &str = "下位";
pub(crate) const HIGH_TIER_WORD: &str = "上位";

pub(crate) const RARITY_WORD: &str = "レア";
pub(crate) const DEGREE_SUFFIX: &str = "度";
pub(crate) const RATE_SUFFIX: &str = "率";

pub(crate) const STRONG_WORDS: [&str; 2] = ["強い", "最強"];
pub(crate) const WEAK_WORDS: [&str; 2] = ["弱い", "最弱"];

pub(crate) const MOST_EFFECTIVE_PHRASES: [&str; 4] =
    ["最強", "一番効く", "一番有効な", "一番効果のある"];
pub(crate) const EFFECTIVE_PHRASES: [&str; 4] = ["効く", "有効", "強い", "効果のある"];

/// Extra words the default segmenter keeps whole so phrase boundaries
/// line up with the ones above.
pub(crate) const AUXILIARY_WORDS: [&str; 9] = [
    "一番", "効果", "有効", "効く", "最弱", "武器", "以上", "以下", "弱点",
];

/// Every word the default segmenter matches before falling back to script runs.
pub(crate) fn segmenter_lexicon() -> Vec<&'static str> {
    let mut words = vec![
        ELEMENT_WORD,
        ATTACK_WORD,
        CRIT_WORD,
        HIGH_WORD,
        LOW_WORD,
        LOW_TIER_WORD,
        HIGH_TIER_WORD,
        RARITY_WORD,
        DEGREE_SUFFIX,
        RATE_SUFFIX,
    ];
    words.extend(STRONG_WORDS);
    words.extend(WEAK_WORDS);
    words.extend(AUXILIARY_WORDS);
    words.extend(Attribute::ALL.iter().map(|tag| tag.as_str()));
    words.extend(single_word_aliases());
    words.sort_unstable();
    words.dedup();
    words
}
