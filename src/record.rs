//! Raw record boundary.
//!
//! All tolerance for loosely-typed input lives here: one parse function per
//! stage turns the untyped field map into a typed record with explicit
//! defaults. Downstream code never touches JSON values.

use serde_json::{Map, Value};

use crate::error::ScreenError;
use crate::features::encode_gender;

/// Untyped field-name to value mapping supplied by the caller.
///
/// Missing fields are tolerated and defaulted per stage; values that are
/// present but uncoercible produce a stage-scoped input error.
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    fields: Map<String, Value>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts any JSON object; rejects non-object payloads.
    pub fn from_value(value: Value) -> Result<Self, ScreenError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            // Stage 0: the record boundary itself, before any stage runs.
            other => Err(ScreenError::input(
                0,
                "record",
                format!("expected a JSON object, got {}", kind_name(&other)),
            )),
        }
    }

    pub fn set(&mut self, field: &str, value: Value) {
        self.fields.insert(field.to_string(), value);
    }

    fn numeric(&self, stage: u8, field: &str, default: f64) -> Result<f64, ScreenError> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::Number(n)) => n.as_f64().ok_or_else(|| {
                ScreenError::input(stage, field, "is not representable as a number")
            }),
            Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| {
                ScreenError::input(stage, field, format!("cannot coerce '{}' to a number", s))
            }),
            Some(other) => Err(ScreenError::input(
                stage,
                field,
                format!("has unsupported type {}", kind_name(other)),
            )),
        }
    }

    fn text(&self, field: &str) -> Option<&str> {
        match self.fields.get(field) {
            Some(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Stage 1 clinical inputs, defaulted to neutral values.
///
/// Defaults deliberately avoid pathological zeros: a missing age or education
/// must not read as an infant with no schooling to the downstream imputer.
#[derive(Debug, Clone, PartialEq)]
pub struct ClinicalRecord {
    pub age: f64,
    pub gender: f64,
    pub education: f64,
    pub faq: f64,
    pub ecog_mem: f64,
    pub ecog_total: f64,
}

impl ClinicalRecord {
    pub fn parse(raw: &RawRecord) -> Result<Self, ScreenError> {
        let stage = 1;
        Ok(Self {
            age: raw.numeric(stage, "age", 65.0)?,
            gender: encode_gender(raw.text("gender")),
            education: raw.numeric(stage, "education", 16.0)?,
            faq: raw.numeric(stage, "faq", 0.0)?,
            ecog_mem: raw.numeric(stage, "ecogMem", 1.0)?,
            ecog_total: raw.numeric(stage, "ecogTotal", 1.0)?,
        })
    }
}

/// Stage 2 genetic input: the APOE genotype string, if supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneticRecord {
    pub genotype: Option<String>,
}

impl GeneticRecord {
    pub fn parse(raw: &RawRecord) -> Result<Self, ScreenError> {
        let genotype = raw
            .text("genotype")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Ok(Self { genotype })
    }
}

/// Stage 3 biomarker concentrations; zero means "not provided".
#[derive(Debug, Clone, PartialEq)]
pub struct BiomarkerRecord {
    pub ptau217: f64,
    pub ab42: f64,
    pub ab40: f64,
    pub nfl: f64,
}

impl BiomarkerRecord {
    pub fn parse(raw: &RawRecord) -> Result<Self, ScreenError> {
        let stage = 3;
        Ok(Self {
            ptau217: raw.numeric(stage, "ptau217", 0.0)?,
            ab42: raw.numeric(stage, "ab42", 0.0)?,
            ab40: raw.numeric(stage, "ab40", 0.0)?,
            nfl: raw.numeric(stage, "nfl", 0.0)?,
        })
    }
}
