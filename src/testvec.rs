//! JSON test-vector loader (spec §6 "Test-vector format", an external
//! collaborator): reads the circomlib-style fixture array, decodes every scalar
//! into `F`, and hands back typed records the engine and the CLI's
//! `verify-vectors` subcommand can both run.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::engine::SmtUpdate;
use crate::error::EngineError;
use crate::field::from_decimal;

/// One record as it appears on disk: every scalar is a decimal string or integer,
/// per spec §6.
#[derive(Debug, Deserialize)]
pub struct RawVector {
    pub nlevels: usize,
    #[serde(rename = "oldRoot")]
    pub old_root: String,
    pub siblings: Vec<String>,
    #[serde(rename = "oldKey")]
    pub old_key: String,
    #[serde(rename = "oldValue")]
    pub old_value: String,
    #[serde(rename = "isOld0")]
    pub is_old0: IntOrBool,
    #[serde(rename = "newKey")]
    pub new_key: String,
    #[serde(rename = "newValue")]
    pub new_value: String,
    pub fnc: [String; 2],
    #[serde(rename = "newRoot")]
    pub new_root: String,
}

/// `isOld0` is documented as decimal-string-or-integer like everything else, but
/// circomlib's own fixtures sometimes encode it as a JSON boolean; accept both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IntOrBool {
    Int(String),
    Bool(bool),
}

impl IntOrBool {
    fn as_bool(&self) -> bool {
        match self {
            IntOrBool::Bool(b) => *b,
            IntOrBool::Int(s) => s.trim() != "0",
        }
    }
}

#[derive(Error, Debug)]
pub enum TestVectorError {
    #[error("failed to read test vector file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse test vector JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("record {index}: {source}")]
    BadScalar {
        index: usize,
        #[source]
        source: EngineError,
    },
}

/// A decoded test-vector record, ready to feed into [`crate::engine::process`].
pub struct Vector {
    pub input: SmtUpdate,
    pub expected_new_root: crate::field::F,
}

/// Loads and decodes every record in a test-vector file.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<Vector>, TestVectorError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| TestVectorError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let raw: Vec<RawVector> = serde_json::from_str(&text)?;
    raw.into_iter().enumerate().map(|(i, r)| decode(i, r)).collect()
}

fn decode_scalar(index: usize, field: &'static str, value: &str) -> Result<crate::field::F, TestVectorError> {
    from_decimal(value).ok_or_else(|| TestVectorError::BadScalar {
        index,
        source: EngineError::InputOutOfField {
            field: field.to_string(),
            value: value.to_string(),
        },
    })
}

fn decode(index: usize, raw: RawVector) -> Result<Vector, TestVectorError> {
    let old_root = decode_scalar(index, "oldRoot", &raw.old_root)?;
    let siblings = raw
        .siblings
        .iter()
        .map(|s| decode_scalar(index, "siblings[]", s))
        .collect::<Result<Vec<_>, _>>()?;
    let old_key = decode_scalar(index, "oldKey", &raw.old_key)?;
    let old_value = decode_scalar(index, "oldValue", &raw.old_value)?;
    let new_key = decode_scalar(index, "newKey", &raw.new_key)?;
    let new_value = decode_scalar(index, "newValue", &raw.new_value)?;
    let f0 = decode_scalar(index, "fnc[0]", &raw.fnc[0])?;
    let f1 = decode_scalar(index, "fnc[1]", &raw.fnc[1])?;
    let expected_new_root = decode_scalar(index, "newRoot", &raw.new_root)?;

    Ok(Vector {
        input: SmtUpdate {
            n_levels: raw.nlevels,
            old_root,
            siblings,
            old_key,
            old_value,
            is_old0: raw.is_old0.as_bool(),
            new_key,
            new_value,
            fnc: (f0, f1),
        },
        expected_new_root,
    })
}
