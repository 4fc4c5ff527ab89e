//! TOML parsing for `rollout.toml` with line-context error messages.

use std::path::Path;

use anyhow::{Context, Result};

use super::Settings;

pub fn parse_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_settings_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

pub fn parse_settings_str(content: &str) -> Result<Settings> {
    let settings: Settings =
        toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;
    settings.validate()?;
    Ok(settings)
}

fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let message = error.message().to_string();
    let Some(span) = error.span() else {
        return anyhow::anyhow!("TOML parsing error: {message}");
    };

    let line_num = content[..span.start.min(content.len())]
        .bytes()
        .filter(|b| *b == b'\n')
        .count()
        + 1;
    anyhow::anyhow!(
        "TOML parsing error at line {line_num}:\n{}\n\nError: {message}",
        line_context(content, line_num)
    )
}

fn line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 1).min(lines.len());

    lines[start.min(end)..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{marker} {num:4} | {line}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
