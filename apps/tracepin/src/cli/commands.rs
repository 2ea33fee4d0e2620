//! Handlers behind each subcommand

use super::{FileArgs, SelectionArgs};
use anyhow::{anyhow, Context};
use std::fs;
use std::path::Path;
use tracepin_ast::extract_script;
use tracepin_config::TracepinConfig;
use tracepin_foundation::FileKind;
use tracepin_insert::{
    classify_selection, comment_logs, delete_logs, find_log_statements, insert_with_report,
    uncomment_logs, InsertionRequest,
};
use tracing::info;

fn file_kind(source: &FileArgs) -> anyhow::Result<FileKind> {
    match &source.kind {
        Some(hint) => FileKind::parse_hint(hint).ok_or_else(|| anyhow!("Unknown file kind '{hint}'")),
        None => FileKind::from_path(&source.file).ok_or_else(|| {
            anyhow!(
                "Cannot tell the language of {}; pass --kind",
                source.file.display()
            )
        }),
    }
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_source(path: &Path, text: &str) -> anyhow::Result<()> {
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

/// Converts a one-based command line to a zero-based pipeline line.
fn zero_based(line: u64) -> anyhow::Result<usize> {
    usize::try_from(line.saturating_sub(1)).context("Line number out of range")
}

pub fn insert(
    config: &TracepinConfig,
    selection: &SelectionArgs,
    write: bool,
    json: bool,
) -> anyhow::Result<()> {
    let path = &selection.source.file;
    let kind = file_kind(&selection.source)?;
    let document = read_source(path)?;
    let file_name = path.file_name().and_then(|name| name.to_str());

    let request = InsertionRequest {
        document: &document,
        file_kind: kind,
        selection_line: zero_based(selection.line)?,
        variable: &selection.variable,
        file_name,
        tab_size: config.insertion.tab_size,
        message: &config.message,
    };
    let report = insert_with_report(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let edited = report.outcome.apply(&document);
    if write {
        write_source(path, &edited)?;
        info!(file = %path.display(), "Wrote debug statement");
        println!(
            "{}:{}: {}",
            path.display(),
            report.outcome.statement_line() + 1,
            report.classification.log_message_type
        );
    } else {
        print!("{edited}");
    }
    Ok(())
}

pub fn classify(selection: &SelectionArgs) -> anyhow::Result<()> {
    let kind = file_kind(&selection.source)?;
    let document = read_source(&selection.source.file)?;
    let message = classify_selection(
        &document,
        kind,
        zero_based(selection.line)?,
        &selection.variable,
    )?;
    println!("{}", serde_json::to_string_pretty(&message)?);
    Ok(())
}

pub fn extract(source: &FileArgs, line: u64, json: bool) -> anyhow::Result<()> {
    let kind = file_kind(source)?;
    let document = read_source(&source.file)?;
    let extraction = extract_script(&document, kind, zero_based(line)?)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&extraction)?);
    } else {
        print!("{}", extraction.script_text);
    }
    Ok(())
}

pub fn list(config: &TracepinConfig, source: &FileArgs, json: bool) -> anyhow::Result<()> {
    let document = read_source(&source.file)?;
    let statements = find_log_statements(&document, &config.message);
    if json {
        println!("{}", serde_json::to_string_pretty(&statements)?);
        return Ok(());
    }
    for statement in statements {
        let state = if statement.commented { "commented" } else { "active" };
        if statement.start_line == statement.end_line {
            println!("{}: {state}", statement.start_line + 1);
        } else {
            println!("{}-{}: {state}", statement.start_line + 1, statement.end_line + 1);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Housekeeping {
    Comment,
    Uncomment,
    Delete,
}

pub fn housekeep(
    config: &TracepinConfig,
    source: &FileArgs,
    write: bool,
    action: Housekeeping,
) -> anyhow::Result<()> {
    let document = read_source(&source.file)?;
    let message = &config.message;
    let edited = match action {
        Housekeeping::Comment => comment_logs(&document, message),
        Housekeeping::Uncomment => uncomment_logs(&document, message),
        Housekeeping::Delete => delete_logs(&document, message),
    };

    if write {
        write_source(&source.file, &edited)?;
        info!(file = %source.file.display(), ?action, "Rewrote debug statements");
    } else {
        print!("{edited}");
    }
    Ok(())
}
