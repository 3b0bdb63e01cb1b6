use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::invoke::RawOutput;

/// Records printed by the analysis tool, kept as opaque JSON values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult {
    records: Vec<Value>,
}

impl AnalysisResult {
    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Value> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse captured output as a top-level JSON array.
///
/// Only the shape is checked; records are not validated. Blank output and
/// any non-array document are errors, `[]` is an empty result.
pub fn decode(raw: &RawOutput) -> Result<AnalysisResult> {
    let bytes = raw.combined();
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::EmptyOutput);
    }
    let records: Vec<Value> = serde_json::from_slice(&bytes)?;
    Ok(AnalysisResult { records })
}
