//! Loose JSON reading and pretty JSON writing.
//!
//! Hand-edited config files often carry trailing commas. Strict parsing is
//! tried first; on failure the content is re-parsed as JSON5, which accepts
//! trailing commas and comments.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;

use super::atomic::atomic_write;

pub fn parse_json_loose(content: &str) -> anyhow::Result<Value> {
    match serde_json::from_str::<Value>(content) {
        Ok(value) => Ok(value),
        Err(strict_err) => match json5::from_str::<Value>(content) {
            Ok(value) => Ok(value),
            Err(_) => Err(enhance_json_error(&strict_err, content)),
        },
    }
}

/// Read and parse a JSON file. Returns `Ok(None)` when the file does not exist.
pub fn read_json_loose(path: &Path) -> anyhow::Result<Option<Value>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let value = parse_json_loose(&content)
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))?;
    Ok(Some(value))
}

/// Serialize `value` as two-space indented JSON with a trailing newline, atomically.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> anyhow::Result<()> {
    let mut bytes = serde_json::to_vec_pretty(value).context("Failed to serialize JSON")?;
    bytes.push(b'\n');
    atomic_write(path, &bytes)
}

fn enhance_json_error(error: &serde_json::Error, content: &str) -> anyhow::Error {
    let line_num = error.line();
    if line_num == 0 {
        return anyhow::anyhow!("JSON parsing error: {}", error);
    }
    anyhow::anyhow!(
        "JSON parsing error at line {}:\n{}\n\nError: {}",
        line_num,
        line_context(content, line_num),
        error
    )
}

fn line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 2).min(lines.len());
    if start >= end {
        return String::new();
    }

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
