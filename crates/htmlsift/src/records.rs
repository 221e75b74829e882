// ABOUTME: Record runner mapping host input records to extraction outcomes one-to-one.
// ABOUTME: Applies the caller's failure policy: halt on the first error or emit error records.

//! Batch processing of host records.
//!
//! Each [`InputRecord`] carries its own html, rules, and removal selectors and
//! produces exactly one output record. Records are independent: a failing
//! record never affects the documents or outcomes of the others.

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};
use crate::extractor::{ExtractionOutcome, Extractor};
use crate::rules::ExtractionRule;

/// One unit of work handed over by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct InputRecord {
    pub html: String,
    #[serde(default)]
    pub selectors: Vec<ExtractionRule>,
    #[serde(default)]
    pub remove_elements: String,
}

/// What to do when a record fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop and return the first error.
    #[default]
    Halt,
    /// Substitute `{"error": message}` for the failing record and keep going.
    Continue,
}

/// One output record: an outcome, or the error that replaced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputRecord {
    Outcome(ExtractionOutcome),
    Error { error: String },
}

/// Parses JSON Lines input into records. Blank lines are skipped.
pub fn parse_records(text: &str) -> Result<Vec<InputRecord>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|e| {
                let mut err =
                    ExtractError::validation(format!("malformed record on line {}", idx + 1));
                err.source = Some(e.into());
                err
            })
        })
        .collect()
}

/// Runs every record through `extractor`, producing one output per input.
pub fn run_records(
    extractor: &Extractor,
    records: &[InputRecord],
    policy: FailurePolicy,
) -> Result<Vec<OutputRecord>> {
    let mut out = Vec::with_capacity(records.len());

    for (idx, record) in records.iter().enumerate() {
        match extractor.extract(&record.html, &record.selectors, &record.remove_elements) {
            Ok(outcome) => out.push(OutputRecord::Outcome(outcome)),
            Err(err) => match policy {
                FailurePolicy::Halt => {
                    log::error!("record {} failed: {}", idx, err);
                    return Err(err);
                }
                FailurePolicy::Continue => {
                    log::warn!("record {} failed, continuing: {}", idx, err);
                    out.push(OutputRecord::Error {
                        error: err.to_string(),
                    });
                }
            },
        }
    }

    Ok(out)
}
