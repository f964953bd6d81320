//! JSON report output.

use serde::Serialize;

use crate::error::Result;
use crate::message::RecordSet;
use crate::report::{Analysis, Report};

/// Pretty-printed JSON of the report alone.
pub fn render_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[derive(Serialize)]
struct Export<'a> {
    report: &'a Report,
    records: &'a RecordSet,
}

/// Pretty-printed JSON of the report plus every parsed record.
pub fn render_json_with_records(analysis: &Analysis) -> Result<String> {
    let export = Export {
        report: &analysis.report,
        records: &analysis.records,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}
