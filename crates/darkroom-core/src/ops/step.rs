//! Wire-level step descriptions and their validated form.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{PipelineError, PipelineResult};

use super::kind::OperationKind;
use super::params::OpParams;

/// One step as it arrives on the wire: an operation name plus an
/// uninterpreted params payload. A step object carrying any other key is
/// malformed.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawStep {
    pub operation: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// Parse a JSON array of steps.
///
/// Anything that is not a JSON array of `{operation, params?}` objects is
/// `MalformedInput`. An empty array is valid and means "no transforms".
pub fn parse_steps(raw: &str) -> PipelineResult<Vec<RawStep>> {
    serde_json::from_str(raw).map_err(|e| PipelineError::MalformedInput(e.to_string()))
}

/// A step that passed validation: known operation, schema-checked params.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessStep {
    params: OpParams,
}

impl ProcessStep {
    pub fn new(params: OpParams) -> Self {
        Self { params }
    }

    /// Validate a raw step: resolve the operation name, then check its
    /// params against the registered schema.
    pub fn validate(raw: &RawStep) -> PipelineResult<Self> {
        let kind: OperationKind = raw.operation.parse()?;
        let params = OpParams::parse(kind, raw.params.as_ref())?;
        Ok(Self { params })
    }

    pub fn kind(&self) -> OperationKind {
        self.params.kind()
    }

    pub fn params(&self) -> &OpParams {
        &self.params
    }
}
