//! Typed views over exported spreadsheet tables.
//!
//! Required columns are checked once here; everything downstream works on
//! [`WeaponTable`] and [`MonsterTable`] and never re-checks the schema.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::QueryError;
use crate::model::{
    BASE_ATTACK, CRIT_RATE, Cell, ELEMENT, ELEMENT_VALUE, LOW_RANK, MONSTER_NAME,
    MONSTER_REQUIRED_COLUMNS, MonsterRecord, PHYSICAL_ATTACK, RARITY, SHARPNESS, SKILL, SLOT_COUNT,
    TOTAL_ATTACK, WEAKNESS, WEAPON_NAME, WEAPON_REQUIRED_COLUMNS, WeaponRecord,
};

/// Accepted JSON shapes: pandas `orient="records"` or `orient="split"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum SheetExport {
    Records(Vec<Map<String, Value>>),
    Split {
        columns: Vec<String>,
        data: Vec<Vec<Value>>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

impl RawTable {
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let export: SheetExport = serde_json::from_slice(bytes)
            .context("sheet export is not a records or split JSON table")?;

        Ok(match export {
            SheetExport::Records(rows) => {
                let mut columns = Vec::<String>::new();
                for row in &rows {
                    for key in row.keys() {
                        if !columns.contains(key) {
                            columns.push(key.clone());
                        }
                    }
                }
                Self { columns, rows }
            }
            SheetExport::Split { columns, data } => {
                let rows = data
                    .into_iter()
                    .map(|values| columns.iter().cloned().zip(values).collect())
                    .collect();
                Self { columns, rows }
            }
        })
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|value| value == column)
    }

    fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|column| !self.has_column(column))
            .map(|column| column.to_string())
            .collect()
    }
}

fn cell(row: &Map<String, Value>, column: &str) -> Cell {
    row.get(column).map(Cell::from_json).unwrap_or_default()
}

fn text(row: &Map<String, Value>, column: &str) -> String {
    cell(row, column).as_text()
}

#[derive(Debug, Clone, Default)]
pub struct WeaponTable {
    pub records: Vec<WeaponRecord>,
    /// Whether the sheet carries the optional low-rank ordinal column.
    pub has_low_rank: bool,
}

impl WeaponTable {
    pub fn from_raw(raw: &RawTable) -> Result<Self, QueryError> {
        let missing = raw.missing_columns(&WEAPON_REQUIRED_COLUMNS);
        if !missing.is_empty() {
            return Err(QueryError::Schema {
                table: "weapon",
                missing,
            });
        }

        let records = raw
            .rows
            .iter()
            .map(|row| WeaponRecord {
                name: text(row, WEAPON_NAME),
                base_attack: cell(row, BASE_ATTACK),
                crit_rate: cell(row, CRIT_RATE),
                slot_count: cell(row, SLOT_COUNT),
                skill: text(row, SKILL),
                total_attack: cell(row, TOTAL_ATTACK),
                physical_attack: cell(row, PHYSICAL_ATTACK),
                element: text(row, ELEMENT),
                element_value: cell(row, ELEMENT_VALUE),
                sharpness: text(row, SHARPNESS),
                rarity: cell(row, RARITY),
                low_rank: cell(row, LOW_RANK),
            })
            .collect();

        Ok(Self {
            records,
            has_low_rank: raw.has_column(LOW_RANK),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MonsterTable {
    pub records: Vec<MonsterRecord>,
    pub has_low_rank: bool,
}

impl MonsterTable {
    pub fn from_raw(raw: &RawTable) -> Result<Self, QueryError> {
        let missing = raw.missing_columns(&MONSTER_REQUIRED_COLUMNS);
        if !missing.is_empty() {
            return Err(QueryError::Schema {
                table: "monster",
                missing,
            });
        }

        let records = raw
            .rows
            .iter()
            .map(|row| MonsterRecord {
                name: text(row, MONSTER_NAME),
                weakness: text(row, WEAKNESS),
                low_rank: cell(row, LOW_RANK),
            })
            .collect();

        Ok(Self {
            records,
            has_low_rank: raw.has_column(LOW_RANK),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{MonsterTable, RawTable, WeaponTable};
    use crate::error::QueryError;
    use crate::model::Cell;

    const RECORDS_EXPORT: &str = r#"[
      {"武器": "アーティアブレイド", "基礎攻撃力": 190, "会心率": "5", "スロット数": 2,
       "スキル": "攻撃", "総攻撃力": 220, "総攻撃力(物理)": 200, "属性": "火属性",
       "属性値": 300, "切れ味": "青", "レア度": 6, "下位": 12}
    ]"#;

    const SPLIT_EXPORT: &str = r#"{"columns": ["モンスター名", "弱点"], "index": [0, 1],
      "data": [["チャタカブラ", "雷"], ["ケマトリス", "水属性"]]}"#;

    #[test]
    fn records_export_collects_columns_and_cells() {
        let raw = RawTable::from_json_slice(RECORDS_EXPORT.as_bytes())
            .expect("records export should parse");

        let table = WeaponTable::from_raw(&raw).expect("schema should be complete");
        assert!(table.has_low_rank);
        assert_eq!(table.records.len(), 1);

        let record = &table.records[0];
        assert_eq!(record.name, "アーティアブレイド");
        assert_eq!(record.element, "火属性");
        assert_eq!(record.crit_rate.as_number(), Some(5.0));
        assert_eq!(record.rarity, Cell::Number(6.0));
    }

    #[test]
    fn split_export_zips_columns_with_rows() {
        let raw = RawTable::from_json_slice(SPLIT_EXPORT.as_bytes())
            .expect("split export should parse");

        let table = MonsterTable::from_raw(&raw).expect("monster schema should be complete");
        assert!(!table.has_low_rank);
        assert_eq!(table.records[1].name, "ケマトリス");
        assert_eq!(table.records[1].weakness, "水属性");
        assert_eq!(table.records[1].low_rank, Cell::Empty);
    }

    #[test]
    fn missing_weapon_columns_are_all_reported() {
        let raw = RawTable::from_json_slice(r#"[{"武器": "x", "総攻撃力": 1}]"#.as_bytes())
            .expect("records export should parse");

        let error = WeaponTable::from_raw(&raw).expect_err("schema check should fail");
        let QueryError::Schema { table, missing } = error else {
            panic!("unexpected error: {error}");
        };
        assert_eq!(table, "weapon");
        assert_eq!(missing.len(), 9);
        assert!(missing.contains(&"レア度".to_string()));
        assert!(!missing.contains(&"総攻撃力".to_string()));
    }

    #[test]
    fn monster_table_requires_weakness_column() {
        let raw = RawTable::from_json_slice(r#"[{"モンスター名": "アルファ"}]"#.as_bytes())
            .expect("records export should parse");

        let error = MonsterTable::from_raw(&raw).expect_err("schema check should fail");
        assert_eq!(
            error,
            QueryError::Schema {
                table: "monster",
                missing: vec!["弱点".to_string()],
            }
        );
    }
}
