//! History command handlers for fieldhist CLI

use crate::cli::args::*;
use crate::cli::CliApp;
use crate::error::{Error, Result};
use crate::field::HistoryField;
use crate::source::{ArraySource, SuggestionSource};
use std::path::Path;
use std::rc::Rc;

pub fn handle_add(app: &mut CliApp, args: &AddArgs) -> Result<()> {
    if args.text.trim().is_empty() {
        app.verbose_println("Ignoring blank value");
        return Ok(());
    }

    match args.timestamp {
        Some(ts) => {
            let timestamp =
                chrono::DateTime::from_timestamp(ts, 0).ok_or_else(|| Error::InvalidTimestamp {
                    timestamp: ts.to_string(),
                })?;
            app.store.insert_at(&args.tag, &args.text, timestamp)?;
        }
        None => app.store.insert(&args.tag, &args.text)?,
    }

    app.verbose_println(&format!("Remembered value for {}", args.tag));
    Ok(())
}

pub fn handle_list(app: &mut CliApp, args: &ListArgs) -> Result<()> {
    let mut entries = app.store.entries_for_tag(&args.tag)?;
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() && !app.quiet {
        println!("No history for {}", args.tag);
    }

    for entry in entries {
        if args.timestamps {
            println!(
                "{} {}",
                entry.timestamp().format("%Y-%m-%d %H:%M:%S"),
                entry.text
            );
        } else {
            println!("{}", entry.text);
        }
    }

    Ok(())
}

pub fn handle_remove(app: &mut CliApp, args: &RemoveArgs) -> Result<()> {
    if args.text.trim().is_empty() {
        return Err(Error::invalid_arguments("value to remove is blank"));
    }

    if !app.store.remove(&args.tag, &args.text)? {
        return Err(Error::custom(format!(
            "'{}' is not in the history of {}",
            args.text.trim(),
            args.tag
        )));
    }

    if !app.quiet {
        println!("Removed '{}' from {}", args.text.trim(), args.tag);
    }

    Ok(())
}

pub fn handle_tags(app: &mut CliApp) -> Result<()> {
    let tags = app.store.tags()?;

    if tags.is_empty() && !app.quiet {
        println!("No history stored");
    }

    for (tag, count) in tags {
        println!("{}\t{}", tag, count);
    }

    Ok(())
}

pub fn handle_suggest(app: &mut CliApp, args: &SuggestArgs) -> Result<()> {
    let mut items = args.items.clone();
    if let Some(path) = &args.items_file {
        items.extend(load_items(path)?);
    }

    let mut field_config = app.config.field;
    if let Some(max) = args.max_history {
        field_config.max_history_values = max;
    }
    field_config.validate()?;

    let mut field = HistoryField::new(app.store.clone(), args.tag.as_str(), field_config)
        .with_primary(Rc::new(ArraySource::new(items)));

    field.on_focus_gained();
    if !args.text.is_empty() && !field.on_text_changed(&args.text) {
        app.verbose_println(&format!(
            "'{}' is shorter than the threshold of {}, showing everything",
            args.text, field_config.threshold
        ));
    }

    let suggestions = field.suggestions();
    let history_len = suggestions.history_len();
    for (position, item) in suggestions.items().into_iter().enumerate() {
        let marker = if position < history_len { "*" } else { " " };
        println!("{} {}", marker, item);
    }

    Ok(())
}

/// Read one suggestion per non-blank line of `path`
pub(crate) fn load_items(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
