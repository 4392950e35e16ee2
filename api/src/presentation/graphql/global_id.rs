use std::fmt::Display;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::application::dto::apps::{AppError, AppErrorCode};

/// Relay-style node id: base64 of `Type:pk`.
pub fn to_global_id(type_name: &str, pk: impl Display) -> String {
    STANDARD.encode(format!("{type_name}:{pk}"))
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum GlobalIdError {
    #[error("Couldn't resolve id: {0}.")]
    Malformed(String),
    #[error("Must receive a {expected} id.")]
    WrongType { expected: String, found: String },
}

impl GlobalIdError {
    pub fn app_error(&self, field: &str) -> AppError {
        let code = match self {
            GlobalIdError::Malformed(_) => AppErrorCode::GraphqlError,
            GlobalIdError::WrongType { .. } => AppErrorCode::Invalid,
        };
        AppError::new(field, code, self.to_string())
    }
}

pub fn from_global_id(id: &str) -> Result<(String, String), GlobalIdError> {
    let malformed = || GlobalIdError::Malformed(id.to_string());
    let bytes = STANDARD.decode(id.trim()).map_err(|_| malformed())?;
    let decoded = String::from_utf8(bytes).map_err(|_| malformed())?;
    let (type_name, pk) = decoded.split_once(':').ok_or_else(malformed)?;
    if type_name.is_empty() || pk.is_empty() {
        return Err(malformed());
    }
    Ok((type_name.to_string(), pk.to_string()))
}

pub fn decode_pk(id: &str, expected_type: &str) -> Result<i32, GlobalIdError> {
    let (type_name, pk) = from_global_id(id)?;
    if type_name != expected_type {
        return Err(GlobalIdError::WrongType {
            expected: expected_type.to_string(),
            found: type_name,
        });
    }
    pk.parse::<i32>()
        .map_err(|_| GlobalIdError::Malformed(id.to_string()))
}
