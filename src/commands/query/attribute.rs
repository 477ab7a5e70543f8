use std::fmt;

use serde::Serialize;

use super::vocabulary::ELEMENT_WORD;

/// The ten canonical elemental/status categories.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Attribute {
    Fire,
    Water,
    Thunder,
    Ice,
    Dragon,
    Blast,
    Poison,
    Sleep,
    Paralysis,
    NonElemental,
}

impl Attribute {
    pub const ALL: [Attribute; 10] = [
        Self::Fire,
        Self::Water,
        Self::Thunder,
        Self::Ice,
        Self::Dragon,
        Self::Blast,
        Self::Poison,
        Self::Sleep,
        Self::Paralysis,
        Self::NonElemental,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fire => "火",
            Self::Water => "水",
            Self::Thunder => "雷",
            Self::Ice => "氷",
            Self::Dragon => "龍",
            Self::Blast => "爆破",
            Self::Poison => "毒",
            Self::Sleep => "睡眠",
            Self::Paralysis => "麻痺",
            Self::NonElemental => "無",
        }
    }

    pub fn from_canonical(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.as_str() == value)
    }
}

/// Surface spellings and the canonical tag they stand for. Each canonical
/// label is listed as its own alias.
pub(crate) const ALIASES: &[(&str, Attribute)] = &[
    ("火属性", Attribute::Fire),
    ("火", Attribute::Fire),
    ("水属性", Attribute::Water),
    ("水", Attribute::Water),
    ("雷属性", Attribute::Thunder),
    ("雷", Attribute::Thunder),
    ("電", Attribute::Thunder),
    ("電撃", Attribute::Thunder),
    ("電気", Attribute::Thunder),
    ("氷属性", Attribute::Ice),
    ("氷", Attribute::Ice),
    ("龍属性", Attribute::Dragon),
    ("竜属性", Attribute::Dragon),
    ("龍", Attribute::Dragon),
    ("竜", Attribute::Dragon),
    ("ドラゴン", Attribute::Dragon),
    ("爆破属性", Attribute::Blast),
    ("爆破", Attribute::Blast),
    ("毒属性", Attribute::Poison),
    ("毒", Attribute::Poison),
    ("睡眠属性", Attribute::Sleep),
    ("睡眠", Attribute::Sleep),
    ("麻痺属性", Attribute::Paralysis),
    ("麻痺", Attribute::Paralysis),
    ("無属性", Attribute::NonElemental),
    ("無", Attribute::NonElemental),
    ("無撃", Attribute::NonElemental),
];

/// A normalized element value. Strings outside the alias table survive
/// verbatim so they can still match each other exactly.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ElementTag {
    Known(Attribute),
    Other(String),
}

impl ElementTag {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(attribute) => attribute.as_str(),
            Self::Other(raw) => raw,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Other(raw) if raw.is_empty())
    }
}

impl fmt::Display for ElementTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ElementTag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

pub fn lookup_alias(surface: &str) -> Option<Attribute> {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == surface)
        .map(|(_, attribute)| *attribute)
}

pub fn normalize(raw: &str) -> ElementTag {
    let trimmed = raw.trim();
    match lookup_alias(trimmed) {
        Some(attribute) => ElementTag::Known(attribute),
        None => ElementTag::Other(trimmed.to_string()),
    }
}

/// Aliases that are single words rather than "<tag>属性" compounds.
pub(crate) fn single_word_aliases() -> impl Iterator<Item = &'static str> {
    ALIASES
        .iter()
        .map(|(alias, _)| *alias)
        .filter(|alias| !alias.ends_with(ELEMENT_WORD))
}
