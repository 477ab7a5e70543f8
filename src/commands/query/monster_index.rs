use std::sync::OnceLock;

use serde::Serialize;
use tracing::debug;

use super::attribute::{ElementTag, normalize};
use crate::model::MonsterRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonsterMention {
    pub name: String,
    pub weakness: ElementTag,
}

#[derive(Debug, Clone)]
struct IndexedMonster {
    name: String,
    weakness: ElementTag,
    low_rank: Option<f64>,
}

/// Monster names with their normalized weakness, in sheet order.
#[derive(Debug, Clone, Default)]
pub struct MonsterIndex {
    entries: Vec<IndexedMonster>,
}

impl MonsterIndex {
    pub fn build(records: &[MonsterRecord]) -> Self {
        let entries = records
            .iter()
            .map(|record| IndexedMonster {
                name: record.name.clone(),
                weakness: normalize(&record.weakness),
                low_rank: record.low_rank.as_number(),
            })
            .collect();

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Every monster whose name occurs verbatim in `text`, in index order.
    pub fn detect_mentions(&self, text: &str) -> Vec<MonsterMention> {
        self.entries
            .iter()
            .filter(|entry| !entry.name.is_empty() && text.contains(entry.name.as_str()))
            .filter(|entry| !entry.weakness.is_blank())
            .map(|entry| MonsterMention {
                name: entry.name.clone(),
                weakness: entry.weakness.clone(),
            })
            .collect()
    }

    /// First numeric low-rank ordinal among rows named exactly `name`.
    pub fn low_rank_threshold(&self, name: &str) -> Option<i64> {
        self.entries
            .iter()
            .filter(|entry| entry.name == name)
            .find_map(|entry| entry.low_rank)
            .map(|value| value.trunc() as i64)
    }
}

/// Builds the [`MonsterIndex`] on first use. Concurrent first callers block
/// on a single build; afterwards reads take no lock.
#[derive(Debug)]
pub struct LazyMonsterIndex {
    records: Vec<MonsterRecord>,
    cell: OnceLock<MonsterIndex>,
}

impl LazyMonsterIndex {
    pub fn new(records: Vec<MonsterRecord>) -> Self {
        Self {
            records,
            cell: OnceLock::new(),
        }
    }

    pub fn get(&self) -> &MonsterIndex {
        self.cell.get_or_init(|| {
            let index = MonsterIndex::build(&self.records);
            debug!(monsters = index.len(), "built monster weakness index");
            index
        })
    }

    #[cfg(test)]
    pub fn is_built(&self) -> bool {
        self.cell.get().is_some()
    }
}
