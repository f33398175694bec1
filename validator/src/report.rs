//! Human and machine renderings of an error bucket.

use anyhow::{Context, Result};

use crate::core::error_bucket::ErrorBucket;

/// Render `bucket` as indented text. Keys equal to `global_key` are labelled
/// `Global`, every other key is a record handle.
pub fn render_text(bucket: &ErrorBucket, global_key: &str) -> String {
    if bucket.is_empty() {
        return "No SMBIOS compliance errors found.\n".to_string();
    }

    let mut out = String::new();
    for (key, entries) in bucket.bucket() {
        if key == global_key {
            out.push_str("Global:\n");
        } else {
            out.push_str(&format!("Handle {key}:\n"));
        }
        for entry in entries {
            push_indented(&mut out, &entry.error);
            if !entry.action.is_empty() {
                push_indented(&mut out, &entry.action);
            }
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "{} error(s) in {} bucket(s).\n",
        bucket.error_count(),
        bucket.len()
    ));
    out
}

fn push_indented(out: &mut String, text: &str) {
    for line in text.lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
}

/// Render `bucket` as pretty JSON with a trailing newline, keeping key order.
pub fn render_json(bucket: &ErrorBucket) -> Result<String> {
    let mut payload = serde_json::to_string_pretty(bucket).context("serialize report json")?;
    payload.push('\n');
    Ok(payload)
}
