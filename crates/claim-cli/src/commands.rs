//! Command implementations, separated from terminal output.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, info};

use claim_ingest::{ingest_envelope_file, ingest_envelope_files, list_envelope_files, list_items};
use claim_model::{GroupType, ValidationResult, ValidationRule};
use claim_validate::{ValidationEngine, default_rules, load_rules};

use crate::render::{render_cell, row_columns};
use crate::report::CheckReport;

/// Rules from `path`, or the built-in rules.
pub fn load_rule_list(path: Option<&Path>) -> Result<Vec<ValidationRule>> {
    match path {
        Some(path) => {
            let rules = load_rules(path)?;
            info!(file = %path.display(), rules = rules.len(), "loaded rules");
            Ok(rules)
        }
        None => Ok(default_rules()),
    }
}

/// Expand directories into their envelope files; files are kept as given.
pub fn collect_envelope_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let found = list_envelope_files(path)
                .with_context(|| format!("list envelopes in {}", path.display()))?;
            debug!(dir = %path.display(), files = found.len(), "discovered envelopes");
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    if files.is_empty() {
        bail!("no envelope files found");
    }
    Ok(files)
}

pub fn run_check(paths: &[PathBuf], rules: Option<&Path>) -> Result<CheckReport> {
    let engine = ValidationEngine::new(load_rule_list(rules)?);
    let files = collect_envelope_paths(paths)?;
    info!(files = files.len(), "checking envelopes");
    let outcomes = ingest_envelope_files(&files);
    Ok(CheckReport::build(outcomes, &engine))
}

pub fn write_json_report(report: &CheckReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serialize report")?;
    fs::write(path, json).with_context(|| format!("write report to {}", path.display()))?;
    info!(file = %path.display(), "wrote report");
    Ok(())
}

/// One line item prepared for display.
#[derive(Debug, Clone)]
pub struct RowView {
    pub index: usize,
    pub cells: Vec<String>,
    pub results: Vec<ValidationResult>,
}

/// The line items of one group of one claim.
#[derive(Debug, Clone)]
pub struct RowsView {
    pub claim_id: String,
    pub group_type: GroupType,
    pub columns: Vec<String>,
    pub rows: Vec<RowView>,
}

pub fn run_rows(
    file: &Path,
    group: &str,
    claim: Option<&str>,
    rules: Option<&Path>,
) -> Result<RowsView> {
    let group_type: GroupType = group.parse().context("parse group type")?;
    let records = ingest_envelope_file(file)
        .with_context(|| format!("decode envelope {}", file.display()))?;
    let record = match claim {
        Some(id) => records.iter().find(|record| record.id == id),
        None => records.first(),
    }
    .ok_or_else(|| match claim {
        Some(id) => anyhow!("claim {id} not found in {}", file.display()),
        None => anyhow!("{} contains no claims", file.display()),
    })?;
    let target = record
        .group(&group_type)
        .ok_or_else(|| anyhow!("claim has no {group_type} group"))?;

    let engine = ValidationEngine::new(load_rule_list(rules)?);
    let results = engine.validate(record);
    let items = list_items(target);
    let columns = row_columns(&items);
    let rows = items
        .iter()
        .enumerate()
        .map(|(index, item)| RowView {
            index,
            cells: columns
                .iter()
                .map(|column| render_cell(column, item.get(column)))
                .collect(),
            results: results
                .iter()
                .filter(|result| result.xml_type == group_type && result.index == Some(index))
                .cloned()
                .collect(),
        })
        .collect();

    Ok(RowsView {
        claim_id: record.id.clone(),
        group_type,
        columns,
        rows,
    })
}
