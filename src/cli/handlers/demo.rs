//! Interactive demo handler

use super::basic::load_items;
use crate::cli::args::DemoArgs;
use crate::cli::CliApp;
use crate::error::Result;
use crate::field::HistoryField;
use crate::field_tui;
use crate::source::ArraySource;
use std::rc::Rc;

/// Primary suggestions used when no items file is given
const COUNTRIES: &[&str] = &[
    "Argentina",
    "Australia",
    "Austria",
    "Belgium",
    "Brazil",
    "Canada",
    "Chile",
    "Denmark",
    "Finland",
    "France",
    "Germany",
    "Greece",
    "Iceland",
    "India",
    "Ireland",
    "Italy",
    "Japan",
    "Mexico",
    "Netherlands",
    "New Zealand",
    "Norway",
    "Poland",
    "Portugal",
    "South Africa",
    "Spain",
    "Sweden",
    "Switzerland",
    "United Kingdom",
    "United States",
];

pub fn handle_demo(app: &mut CliApp, args: &DemoArgs) -> Result<()> {
    let items = match &args.items_file {
        Some(path) => load_items(path)?,
        None => COUNTRIES.iter().map(|s| s.to_string()).collect(),
    };

    app.verbose_println(&format!(
        "Starting demo field '{}' with {} suggestions",
        args.tag,
        items.len()
    ));

    let field = HistoryField::new(app.store.clone(), args.tag.as_str(), app.config.field)
        .with_primary(Rc::new(ArraySource::new(items)));

    field_tui::run_field_demo(field)
}
