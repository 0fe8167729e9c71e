//! Validation Aggregation
//!
//! Turns raw field failures into a [`ValidationSummary`] that is safe to log
//! and to send to clients. Rejected values of sensitive fields are replaced
//! by a fixed marker before they are stored anywhere in the summary.

use std::collections::HashSet;

use kernel::error::app_error::FieldErrors;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::application::config::MaskingConfig;

// ============================================================================
// Input
// ============================================================================

/// A single failed check, as raised by a validator.
#[derive(Clone)]
pub struct RawFieldFailure {
    pub field: String,
    pub message: String,
    pub code: String,
    /// Unmasked. Consumed by the aggregator and never stored.
    pub rejected: Option<String>,
}

impl RawFieldFailure {
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
        rejected: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
            rejected: Some(rejected.into()),
        }
    }

    /// Failure with no rejected value (e.g. a missing field)
    pub fn without_value(
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
            rejected: None,
        }
    }
}

impl std::fmt::Debug for RawFieldFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawFieldFailure")
            .field("field", &self.field)
            .field("code", &self.code)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Output
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    pub field: String,
    pub message: String,
    pub code: String,
    pub masked_value: Option<String>,
}

/// Result of one validation pass.
///
/// Serializes as `{ field: [messages...] }` in first-seen field order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationSummary {
    failures: Vec<ValidationFailure>,
    failed_fields: Vec<String>,
}

impl ValidationSummary {
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Individual failures, not distinct fields
    pub fn error_count(&self) -> usize {
        self.failures.len()
    }

    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// Distinct field names in first-seen order
    pub fn failed_fields(&self) -> &[String] {
        &self.failed_fields
    }

    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.failures
            .iter()
            .filter(|f| f.field == field)
            .map(|f| f.message.as_str())
            .collect()
    }

    pub fn to_field_errors(&self) -> Vec<FieldErrors> {
        self.failed_fields
            .iter()
            .map(|field| FieldErrors {
                field: field.clone(),
                messages: self.messages_for(field).into_iter().map(String::from).collect(),
            })
            .collect()
    }
}

impl Serialize for ValidationSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.failed_fields.len()))?;
        for field in &self.failed_fields {
            map.serialize_entry(field, &self.messages_for(field))?;
        }
        map.end()
    }
}

// ============================================================================
// Masking
// ============================================================================

/// Field-name keyed classifier for rejected values.
#[derive(Debug, Clone)]
pub struct MaskingPolicy {
    sensitive: HashSet<String>,
    max_value_length: usize,
    marker: String,
}

impl MaskingPolicy {
    pub fn new(config: &MaskingConfig) -> Self {
        Self {
            sensitive: config.sensitive_fields.iter().map(|f| normalize_name(f)).collect(),
            max_value_length: config.max_value_length,
            marker: config.redaction_marker.clone(),
        }
    }

    /// Matches on the last path segment (`user.password`, `items[2].token`),
    /// ignoring case and word separators so `newPassword`, `new_password`
    /// and `New-Password` are the same name.
    pub fn is_sensitive(&self, field: &str) -> bool {
        let last = field.rsplit('.').next().unwrap_or(field);
        let last = last.split('[').next().unwrap_or(last);
        self.sensitive.contains(&normalize_name(last))
    }

    pub fn mask(&self, field: &str, value: &str) -> String {
        if self.is_sensitive(field) {
            return self.marker.clone();
        }

        let cleaned: String = value
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();

        if cleaned.chars().count() <= self.max_value_length {
            cleaned
        } else {
            let mut truncated: String = cleaned.chars().take(self.max_value_length).collect();
            truncated.push('…');
            truncated
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

impl Default for MaskingPolicy {
    fn default() -> Self {
        Self::new(&MaskingConfig::default())
    }
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

// ============================================================================
// Aggregator
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ValidationAggregator {
    masking: MaskingPolicy,
}

impl ValidationAggregator {
    pub fn new(masking: MaskingPolicy) -> Self {
        Self { masking }
    }

    pub fn masking(&self) -> &MaskingPolicy {
        &self.masking
    }

    /// Mask and group `raw` failures. `context` only labels the log event.
    pub fn process(
        &self,
        raw: impl IntoIterator<Item = RawFieldFailure>,
        context: &str,
    ) -> ValidationSummary {
        let mut summary = ValidationSummary::default();

        for failure in raw {
            let masked_value = failure
                .rejected
                .as_deref()
                .map(|value| self.masking.mask(&failure.field, value));

            if !summary.failed_fields.contains(&failure.field) {
                summary.failed_fields.push(failure.field.clone());
            }

            summary.failures.push(ValidationFailure {
                field: failure.field,
                message: failure.message,
                code: failure.code,
                masked_value,
            });
        }

        if !summary.is_valid() {
            tracing::debug!(
                context = context,
                error_count = summary.error_count(),
                failed_fields = ?summary.failed_fields,
                "Validation failed"
            );
        }

        summary
    }
}
