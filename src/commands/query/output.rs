use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;

use super::advisor::{Advice, QueryRequest};
use crate::model::{
    BASE_ATTACK, CRIT_RATE, ELEMENT, ELEMENT_VALUE, LOW_RANK, PHYSICAL_ATTACK, RARITY, SHARPNESS,
    SKILL, SLOT_COUNT, TOTAL_ATTACK, WEAPON_NAME, WeaponRecord,
};

#[derive(Debug, Serialize)]
struct QueryResponse<'a> {
    query: &'a str,
    rank: &'static str,
    returned: usize,
    #[serde(flatten)]
    advice: &'a Advice,
}

pub(super) fn write_json_response(request: &QueryRequest, advice: &Advice) -> Result<()> {
    let response = QueryResponse {
        query: &request.text,
        rank: request.rank.as_str(),
        returned: advice.recommendation.records.len(),
        advice,
    };

    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, &response)
        .context("failed to serialize query json output")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

pub(super) fn write_text_response(
    request: &QueryRequest,
    advice: &Advice,
    show_low_rank: bool,
) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    let recommendation = &advice.recommendation;

    let rank = request.rank.as_str();
    writeln!(output, "Query: {} (rank={rank})", request.text)?;
    if !recommendation.message.is_empty() {
        writeln!(output, "{}", recommendation.message)?;
    }

    if recommendation.records.is_empty() {
        writeln!(output, "該当する武器が見つかりませんでした。")?;
        output.flush()?;
        return Ok(());
    }

    writeln!(output, "Results: {}", recommendation.records.len())?;
    writeln!(output, "{}", header_row(show_low_rank).join("\t"))?;
    for record in &recommendation.records {
        writeln!(output, "{}", record_row(record, show_low_rank).join("\t"))?;
    }

    output.flush()?;
    Ok(())
}

fn header_row(show_low_rank: bool) -> Vec<&'static str> {
    let mut columns = vec![
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
    if show_low_rank {
        columns.push(LOW_RANK);
    }
    columns
}

fn record_row(record: &WeaponRecord, show_low_rank: bool) -> Vec<String> {
    let mut cells = vec![
        record.name.clone(),
        record.base_attack.as_text(),
        record.crit_rate.as_text(),
        record.slot_count.as_text(),
        record.skill.clone(),
        record.total_attack.as_text(),
        record.physical_attack.as_text(),
        record.element.clone(),
        record.element_value.as_text(),
        record.sharpness.clone(),
        record.rarity.as_text(),
    ];
    if show_low_rank {
        cells.push(record.low_rank.as_text());
    }
    cells
}
