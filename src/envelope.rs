//! Wire-level request envelope shaping
//!
//! The vendor dispatcher accepts two envelope generations. Which one a
//! client emits is a fixed choice made once at construction via
//! [`ClientConfig::envelope`](crate::ClientConfig), not a per-call branch.
//!
//! The builder is purely a shaping step: it never validates payload
//! contents. Required business fields are checked by the remote service
//! and its error responses surface verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Envelope generation expected by the configured endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeStyle {
    /// `{"parameters": [...]}` — a positional array wrapped in a single
    /// named field; non-primitive arguments are pre-serialized to JSON
    /// strings before entering the array
    #[default]
    Positional,
    /// Flat form-field map: `{"formid": ..., "data": "<json>"}` where
    /// `data` is the JSON-serialized operation payload
    FormFields,
}

/// Builds wire envelopes for one client instance
#[derive(Debug, Clone, Copy)]
pub(crate) struct EnvelopeBuilder {
    style: EnvelopeStyle,
}

impl EnvelopeBuilder {
    pub(crate) fn new(style: EnvelopeStyle) -> Self {
        Self { style }
    }

    /// Envelope for a form-scoped operation: form id, optional operation
    /// number, and the operation payload.
    pub(crate) fn form_operation(
        &self,
        form_id: &str,
        op_number: Option<&str>,
        data: &Value,
    ) -> String {
        match self.style {
            EnvelopeStyle::Positional => {
                let mut params = vec![Value::String(form_id.to_string())];
                if let Some(op) = op_number {
                    params.push(Value::String(op.to_string()));
                }
                params.push(positional_param(data));
                self.positional(params)
            }
            EnvelopeStyle::FormFields => {
                let mut fields = json!({
                    "formid": form_id,
                    "data": data.to_string(),
                });
                if let Some(op) = op_number {
                    fields["opnumber"] = Value::String(op.to_string());
                }
                fields.to_string()
            }
        }
    }

    /// Envelope for an operation that carries only a payload (no form id)
    pub(crate) fn data_operation(&self, data: &Value) -> String {
        match self.style {
            EnvelopeStyle::Positional => self.positional(vec![positional_param(data)]),
            EnvelopeStyle::FormFields => json!({ "data": data.to_string() }).to_string(),
        }
    }

    /// Raw positional envelope. Used by the login family, whose parameter
    /// tuples are fixed by the auth service regardless of endpoint
    /// generation.
    pub(crate) fn positional(&self, params: Vec<Value>) -> String {
        json!({ "parameters": params }).to_string()
    }
}

/// Shape one positional argument: primitives pass through, everything
/// else is pre-serialized to a JSON string.
fn positional_param(value: &Value) -> Value {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => value.clone(),
        Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
    }
}
