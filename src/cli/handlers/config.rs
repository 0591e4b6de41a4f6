//! Configuration, statistics and clearing handlers for fieldhist CLI

use crate::cli::args::*;
use crate::cli::CliApp;
use crate::config::Config;
use crate::error::{Error, Result};
use std::io::{self, Write};

pub fn handle_config(app: &mut CliApp, args: &ConfigArgs) -> Result<()> {
    if args.show {
        let config_json = serde_json::to_string_pretty(&app.config)?;
        println!("{}", config_json);
    } else if args.init {
        let config_path = Config::default_config_path()?;
        let config = Config::default();
        config.save_to_path(&config_path)?;
        println!("Configuration initialized at {}", config_path.display());
    } else if args.validate {
        match app.config.validate() {
            Ok(_) => println!("Configuration is valid"),
            Err(e) => println!("Configuration validation failed: {}", e),
        }
    } else {
        println!("Use --show, --init, or --validate");
    }

    Ok(())
}

pub fn handle_stats(app: &mut CliApp) -> Result<()> {
    let stats = app.store.stats()?;

    println!("History Statistics");
    println!("==================");
    println!("Database: {}", app.store.path().display());
    println!("Schema version: {}", app.store.schema_version()?);
    println!("Total entries: {}", stats.total_entries);
    println!("Fields: {}", stats.total_tags);

    if let Some(oldest) = stats.oldest_entry {
        println!("Oldest entry: {}", oldest.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(newest) = stats.newest_entry {
        println!("Newest entry: {}", newest.format("%Y-%m-%d %H:%M:%S"));
    }

    Ok(())
}

pub fn handle_clear(app: &mut CliApp, args: &ClearArgs) -> Result<()> {
    if let Some(tag) = &args.tag {
        if app.store.count(tag)? == 0 {
            return Err(Error::TagNotFound { tag: tag.clone() });
        }
    }

    if !args.force {
        let scope = match &args.tag {
            Some(tag) => format!("the history of {}", tag),
            None => "all history".to_string(),
        };
        print!("Are you sure you want to clear {}? (y/N): ", scope);
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted");
            return Ok(());
        }
    }

    let removed = app.store.clear(args.tag.as_deref())?;

    if !app.quiet {
        println!("Cleared {} entries", removed);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::HistoryStore;
    use std::rc::Rc;

    #[test]
    fn test_clear_unknown_tag() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database_path: dir.path().join("history.db"),
            ..Config::default()
        };
        let store = Rc::new(HistoryStore::open(&config.database_path).unwrap());
        store.insert("city", "Paris").unwrap();
        let mut app = CliApp {
            config,
            store,
            verbose: false,
            quiet: true,
        };

        let unknown = ClearArgs {
            tag: Some("email".to_string()),
            force: true,
        };
        let err = handle_clear(&mut app, &unknown).unwrap_err();
        assert_eq!(err.category(), "history");

        let city = ClearArgs {
            tag: Some("city".to_string()),
            force: true,
        };
        handle_clear(&mut app, &city).unwrap();
        assert_eq!(app.store.count("city").unwrap(), 0);
    }
}
