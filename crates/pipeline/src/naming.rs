//! Artifact naming.
//!
//! Names are `{base}_{qualifier}_{model}_{YYYYMMDDHHMMSS}`. Two names built
//! within the same UTC second from the same inputs collide.

use chrono::{DateTime, Utc};

/// Replace filesystem-hostile characters in a model identifier with `_`.
pub fn sanitize_model_id(model_id: &str) -> String {
    model_id
        .chars()
        .map(|c| match c {
            '/' | '\\' | '-' | ':' | ' ' => '_',
            other => other,
        })
        .collect()
}

/// Fixed-width UTC timestamp with no separators.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y%m%d%H%M%S").to_string()
}

/// Name for one section's artifact, without extension.
pub fn artifact_name(base: &str, qualifier: &str, model_id: &str, timestamp: &DateTime<Utc>) -> String {
    format!(
        "{base}_{qualifier}_{}_{}",
        sanitize_model_id(model_id),
        format_timestamp(timestamp)
    )
}

/// Name for the whole-digest text export, without extension.
pub fn export_name(base: &str, model_id: &str, timestamp: &DateTime<Utc>) -> String {
    format!(
        "{base}_{}_{}",
        sanitize_model_id(model_id),
        format_timestamp(timestamp)
    )
}
