// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OperatorError {
    #[error("Invalid options: {0}")]
    InvalidOptions(ValidationErrors),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Malformed template: {0}")]
    MalformedTemplate(String),

    #[error("Invalid secret data: {0}")]
    InvalidSecretData(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Upgrade stage '{stage}' failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<OperatorError>,
    },
}

impl OperatorError {
    /// Wrap this error with the name of the upgrade stage it happened in
    pub fn in_stage(self, stage: &'static str) -> Self {
        OperatorError::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// Whether retrying the same tick can succeed without a change to the ApiManager
    pub fn is_retryable(&self) -> bool {
        match self {
            OperatorError::StorageUnavailable(_) => true,
            OperatorError::Stage { source, .. } => source.is_retryable(),
            OperatorError::InvalidOptions(_)
            | OperatorError::MalformedTemplate(_)
            | OperatorError::InvalidSecretData(_)
            | OperatorError::Serialization(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, OperatorError>;

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

/// Every validation failure found in one pass over an Options value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, reason: impl Into<String>) {
        self.0.push(FieldError {
            field,
            reason: reason.into(),
        });
    }

    pub fn require_non_empty(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "must not be empty");
        }
    }

    pub fn require_non_negative(&mut self, field: &'static str, value: i32) {
        if value < 0 {
            self.push(field, format!("must not be negative, got {}", value));
        }
    }

    /// Empty values are reported by `require_non_empty`, so they are skipped here
    pub fn require_url(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            return;
        }
        if let Err(e) = url::Url::parse(value) {
            self.push(field, format!("'{}' is not a valid URL: {}", value, e));
        }
    }

    pub fn require_one_of(&mut self, field: &'static str, value: &str, allowed: &[&str]) {
        if !allowed.contains(&value) {
            self.push(
                field,
                format!("'{}' is not one of [{}]", value, allowed.join(", ")),
            );
        }
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|e| e.field).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ok when nothing was reported, otherwise an `InvalidOptions` carrying all failures
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(OperatorError::InvalidOptions(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invalid field(s)", self.0.len())?;
        for (i, e) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{} {}", sep, e.field, e.reason)?;
        }
        Ok(())
    }
}
