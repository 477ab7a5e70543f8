//! SQLite cache holding the last ingested weapon and monster sheets.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Value, ValueRef};
use rusqlite::{Connection, OpenFlags, OptionalExtension, ToSql, params};

use crate::dataset::{MonsterTable, WeaponTable};
use crate::error::QueryError;
use crate::model::{Cell, MonsterRecord, WeaponRecord};
use crate::util::ensure_directory;

pub const DB_SCHEMA_VERSION: &str = "1.0.0";

const WEAPONS_HAVE_LOW_RANK: &str = "weapons_have_low_rank";
const MONSTERS_HAVE_LOW_RANK: &str = "monsters_have_low_rank";

impl ToSql for Cell {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Cell::Number(value) => ToSqlOutput::Owned(Value::Real(*value)),
            Cell::Text(text) => ToSqlOutput::Borrowed(ValueRef::Text(text.as_bytes())),
            Cell::Empty => ToSqlOutput::Owned(Value::Null),
        })
    }
}

impl FromSql for Cell {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(Cell::Empty),
            ValueRef::Integer(value) => Ok(Cell::Number(value as f64)),
            ValueRef::Real(value) => Ok(Cell::Number(value)),
            ValueRef::Text(bytes) => Ok(Cell::Text(String::from_utf8_lossy(bytes).into_owned())),
            ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

pub fn open_read_only(db_path: &Path) -> Result<Connection> {
    if !db_path.exists() {
        return Err(QueryError::not_found(format!(
            "no dataset available at {}; run `wilds-navi ingest` first",
            db_path.display()
        ))
        .into());
    }

    Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("failed to open database read-only: {}", db_path.display()))
}

pub fn open_for_write(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        ensure_directory(parent)?;
    }

    let connection = Connection::open(db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    configure_connection(&connection)?;
    ensure_schema(&connection)?;
    Ok(connection)
}

fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}

pub fn ensure_schema(connection: &Connection) -> Result<()> {
    // Cell columns carry no type affinity so numbers and text survive as exported.
    connection
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS metadata (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS weapons (
              row_index INTEGER PRIMARY KEY,
              name TEXT NOT NULL,
              base_attack,
              crit_rate,
              slot_count,
              skill TEXT NOT NULL,
              total_attack,
              physical_attack,
              element TEXT NOT NULL,
              element_value,
              sharpness TEXT NOT NULL,
              rarity,
              low_rank
            );

            CREATE TABLE IF NOT EXISTS monsters (
              row_index INTEGER PRIMARY KEY,
              name TEXT NOT NULL,
              weakness TEXT NOT NULL,
              low_rank
            );
            ",
        )
        .context("failed to create dataset schema")
}

/// Replaces both sheets in one transaction. A missing monster sheet leaves
/// the monster table empty.
pub fn replace_dataset(
    connection: &mut Connection,
    weapons: &WeaponTable,
    monsters: Option<&MonsterTable>,
    ingested_at: &str,
) -> Result<()> {
    let tx = connection
        .transaction()
        .context("failed to start dataset transaction")?;

    tx.execute("DELETE FROM weapons", [])?;
    tx.execute("DELETE FROM monsters", [])?;

    {
        let mut insert = tx.prepare(
            "
            INSERT INTO weapons (
              row_index, name, base_attack, crit_rate, slot_count, skill, total_attack,
              physical_attack, element, element_value, sharpness, rarity, low_rank
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ",
        )?;

        for (row_index, record) in weapons.records.iter().enumerate() {
            insert
                .execute(params![
                    row_index as i64,
                    record.name,
                    record.base_attack,
                    record.crit_rate,
                    record.slot_count,
                    record.skill,
                    record.total_attack,
                    record.physical_attack,
                    record.element,
                    record.element_value,
                    record.sharpness,
                    record.rarity,
                    record.low_rank,
                ])
                .with_context(|| format!("failed to insert weapon row {row_index}"))?;
        }
    }

    if let Some(monsters) = monsters {
        let mut insert = tx.prepare(
            "INSERT INTO monsters (row_index, name, weakness, low_rank) VALUES (?1, ?2, ?3, ?4)",
        )?;

        for (row_index, record) in monsters.records.iter().enumerate() {
            insert
                .execute(params![
                    row_index as i64,
                    record.name,
                    record.weakness,
                    record.low_rank,
                ])
                .with_context(|| format!("failed to insert monster row {row_index}"))?;
        }
    }

    let monsters_have_low_rank = monsters.is_some_and(|table| table.has_low_rank);
    for (key, value) in [
        ("db_schema_version", DB_SCHEMA_VERSION.to_string()),
        ("ingested_at", ingested_at.to_string()),
        (WEAPONS_HAVE_LOW_RANK, flag(weapons.has_low_rank)),
        (MONSTERS_HAVE_LOW_RANK, flag(monsters_have_low_rank)),
    ] {
        tx.execute(
            "
            INSERT INTO metadata (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            ",
            params![key, value],
        )?;
    }

    tx.commit().context("failed to commit dataset transaction")?;
    Ok(())
}

fn flag(value: bool) -> String {
    String::from(if value { "1" } else { "0" })
}

pub fn read_metadata(connection: &Connection, key: &str) -> Result<Option<String>> {
    connection
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("failed to read metadata key {key}"))
}

fn read_flag(connection: &Connection, key: &str) -> Result<bool> {
    Ok(read_metadata(connection, key)?.as_deref() == Some("1"))
}

pub fn load_weapons(connection: &Connection) -> Result<WeaponTable> {
    let mut statement = connection.prepare(
        "
        SELECT name, base_attack, crit_rate, slot_count, skill, total_attack,
               physical_attack, element, element_value, sharpness, rarity, low_rank
        FROM weapons
        ORDER BY row_index ASC
        ",
    )?;

    let records = statement
        .query_map([], |row| {
            Ok(WeaponRecord {
                name: row.get(0)?,
                base_attack: row.get(1)?,
                crit_rate: row.get(2)?,
                slot_count: row.get(3)?,
                skill: row.get(4)?,
                total_attack: row.get(5)?,
                physical_attack: row.get(6)?,
                element: row.get(7)?,
                element_value: row.get(8)?,
                sharpness: row.get(9)?,
                rarity: row.get(10)?,
                low_rank: row.get(11)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<WeaponRecord>>>()
        .context("failed to load weapon rows")?;

    if records.is_empty() {
        return Err(QueryError::not_found(
            "weapon table is empty; run `wilds-navi ingest` with a weapon sheet",
        )
        .into());
    }

    Ok(WeaponTable {
        records,
        has_low_rank: read_flag(connection, WEAPONS_HAVE_LOW_RANK)?,
    })
}

pub fn load_monsters(connection: &Connection) -> Result<MonsterTable> {
    let mut statement = connection.prepare(
        "
        SELECT name, weakness, low_rank
        FROM monsters
        ORDER BY row_index ASC
        ",
    )?;

    let records = statement
        .query_map([], |row| {
            Ok(MonsterRecord {
                name: row.get(0)?,
                weakness: row.get(1)?,
                low_rank: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<MonsterRecord>>>()
        .context("failed to load monster rows")?;

    Ok(MonsterTable {
        records,
        has_low_rank: read_flag(connection, MONSTERS_HAVE_LOW_RANK)?,
    })
}

pub fn count_rows(connection: &Connection, table: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    let count = connection.query_row(&sql, [], |row| row.get(0))?;
    Ok(count)
}
