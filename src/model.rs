use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const WEAPON_NAME: &str = "武器";
pub const BASE_ATTACK: &str = "基礎攻撃力";
pub const CRIT_RATE: &str = "会心率";
pub const SLOT_COUNT: &str = "スロット数";
pub const SKILL: &str = "スキル";
pub const TOTAL_ATTACK: &str = "総攻撃力";
pub const PHYSICAL_ATTACK: &str = "総攻撃力(物理)";
pub const ELEMENT: &str = "属性";
pub const ELEMENT_VALUE: &str = "属性値";
pub const SHARPNESS: &str = "切れ味";
pub const RARITY: &str = "レア度";
pub const LOW_RANK: &str = "下位";

pub const MONSTER_NAME: &str = "モンスター名";
pub const WEAKNESS: &str = "弱点";

pub const WEAPON_REQUIRED_COLUMNS: [&str; 11] = [
    WEAPON_NAME,
    BASE_ATTACK,
    CRIT_RATE,
    SLOT_COUNT,
    SKILL,
    TOTAL_ATTACK,
    PHYSICAL_ATTACK,
    ELEMENT,
    ELEMENT_VALUE,
    SHARPNESS,
    RARITY,
];

pub const MONSTER_REQUIRED_COLUMNS: [&str; 2] = [MONSTER_NAME, WEAKNESS];

/// A spreadsheet cell as exported: a number, free text, or nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl Cell {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::Number(number) => number
                .as_f64()
                .map(Self::Number)
                .unwrap_or(Self::Empty),
            Value::String(text) => Self::Text(text.clone()),
            other => Self::Text(other.to_string()),
        }
    }

    /// Lenient numeric view. Unparsable or non-finite cells are unknown.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
            Self::Empty => return None,
        };
        value.is_finite().then_some(value)
    }

    pub fn as_text(&self) -> String {
        match self {
            Self::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                format!("{}", *value as i64)
            }
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text.clone(),
            Self::Empty => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponRecord {
    pub name: String,
    pub base_attack: Cell,
    pub crit_rate: Cell,
    pub slot_count: Cell,
    pub skill: String,
    pub total_attack: Cell,
    pub physical_attack: Cell,
    pub element: String,
    pub element_value: Cell,
    pub sharpness: String,
    pub rarity: Cell,
    pub low_rank: Cell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterRecord {
    pub name: String,
    pub weakness: String,
    pub low_rank: Cell,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    pub table: String,
    pub path: String,
    pub sha256: String,
    pub row_count: usize,
    pub has_low_rank_column: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub db_path: String,
    pub db_schema_version: String,
    pub sources: Vec<SourceEntry>,
    pub warnings: Vec<String>,
}
