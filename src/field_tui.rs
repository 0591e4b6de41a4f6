//! Interactive terminal demo of a history field
//!
//! A single input line with a suggestion dropdown underneath:
//! - Typing filters history and primary suggestions
//! - Enter commits the text to history (or picks the highlighted suggestion)
//! - Ctrl+L clears the field's history

use crate::error::Result;
use crate::field::HistoryField;
use crate::source::{DataSetObserver, SuggestionSource};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::cell::Cell;
use std::io;
use std::rc::Rc;

/// Tracks whether the suggestion list changed since it was last drawn
#[derive(Default)]
struct DropdownObserver {
    dirty: Cell<bool>,
    empty: Cell<bool>,
}

impl DataSetObserver for DropdownObserver {
    fn on_changed(&self) {
        self.dirty.set(true);
        self.empty.set(false);
    }

    fn on_invalidated(&self) {
        self.dirty.set(true);
        self.empty.set(true);
    }
}

/// Demo UI state
pub struct FieldDemoUI {
    field: HistoryField,
    observer: Rc<DropdownObserver>,
    /// Text typed so far
    input: String,
    /// Highlighted suggestion, if any
    selected: Option<usize>,
    list_state: ListState,
    dropdown_visible: bool,
    running: bool,
    show_help: bool,
    status: String,
}

impl FieldDemoUI {
    pub fn new(mut field: HistoryField) -> Self {
        let observer = Rc::new(DropdownObserver::default());
        let shell: Rc<dyn DataSetObserver> = observer.clone();
        field.set_observer(shell);
        field.on_focus_gained();

        let status = format!("Field '{}' ready", field.tag());
        Self {
            field,
            observer,
            input: String::new(),
            selected: None,
            list_state: ListState::default(),
            dropdown_visible: true,
            running: true,
            show_help: false,
            status,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_dropdown_visible(&self) -> bool {
        self.dropdown_visible && !self.observer.empty.get()
    }

    /// Visible suggestions and how many of them come from history
    pub fn visible_suggestions(&mut self) -> (Vec<String>, usize) {
        let suggestions = self.field.suggestions();
        (suggestions.items(), suggestions.history_len())
    }

    fn text_changed(&mut self) {
        self.dropdown_visible =
            self.field.on_text_changed(&self.input) || self.input.trim().is_empty();
        self.selected = None;
    }

    fn sync_selection(&mut self) {
        if self.observer.dirty.replace(false) {
            let len = self.field.suggestions().len();
            self.selected = self.selected.filter(|&i| i < len);
        }
        self.list_state.select(self.selected);
    }

    fn select_previous(&mut self) {
        self.selected = match self.selected {
            Some(0) | None => None,
            Some(i) => Some(i - 1),
        };
    }

    fn select_next(&mut self) {
        let len = self.field.suggestions().len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        });
        self.dropdown_visible = true;
    }

    fn accept_selection(&mut self) -> bool {
        let Some(position) = self.selected.filter(|_| self.is_dropdown_visible()) else {
            return false;
        };
        match self.field.select(position) {
            Some(text) => {
                self.input = text;
                self.selected = None;
                self.dropdown_visible = false;
                true
            }
            None => {
                self.status = "That suggestion is disabled".to_string();
                true
            }
        }
    }

    fn commit(&mut self) {
        let text = self.input.trim().to_string();
        match self.field.commit(&text) {
            Ok(()) if text.is_empty() => self.status = "Nothing to save".to_string(),
            Ok(()) => self.status = format!("Saved '{}'", text),
            Err(e) => self.status = format!("Could not save: {}", e),
        }
        self.input.clear();
        self.selected = None;
        self.field.on_focus_gained();
        self.dropdown_visible = true;
    }

    fn clear_history(&mut self) {
        self.status = match self.field.clear_history() {
            Ok(removed) => format!("Cleared {} entries", removed),
            Err(e) => format!("Could not clear history: {}", e),
        };
        self.selected = None;
        self.text_changed();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc if self.is_dropdown_visible() && self.selected.is_some() => {
                self.selected = None;
                self.dropdown_visible = false;
            }
            KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if ctrl => self.running = false,
            KeyCode::Char('l') if ctrl => self.clear_history(),
            KeyCode::F(1) => self.show_help = !self.show_help,
            KeyCode::Up => self.select_previous(),
            KeyCode::Down => self.select_next(),
            KeyCode::Tab => {
                self.accept_selection();
            }
            KeyCode::Enter => {
                if !self.accept_selection() {
                    self.commit();
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.text_changed();
            }
            KeyCode::Char(c) if !ctrl => {
                self.input.push(c);
                self.text_changed();
            }
            _ => {}
        }
        self.sync_selection();
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Input
                Constraint::Min(6),    // Suggestions
                Constraint::Length(if self.show_help { 9 } else { 3 }),
            ])
            .split(frame.area());

        let title = format!("History field: {}", self.field.tag());
        let input = Paragraph::new(format!("{}_", self.input))
            .block(Block::default().borders(Borders::ALL).title(title))
            .style(Style::default().fg(Color::Cyan));
        frame.render_widget(input, chunks[0]);

        let (items, history_len) = if self.is_dropdown_visible() {
            self.visible_suggestions()
        } else {
            (Vec::new(), 0)
        };

        let list_items: Vec<ListItem> = items
            .into_iter()
            .enumerate()
            .map(|(position, item)| {
                let (marker, style) = if position < history_len {
                    ("history ", Style::default().fg(Color::Yellow))
                } else {
                    ("        ", Style::default().fg(Color::White))
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::DarkGray)),
                    Span::styled(item, style),
                ]))
            })
            .collect();

        let list = List::new(list_items)
            .block(Block::default().borders(Borders::ALL).title("Suggestions"))
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ");
        frame.render_stateful_widget(list, chunks[1], &mut self.list_state);

        let footer = if self.show_help {
            [
                "Keybindings:",
                "  type       - Filter suggestions",
                "  ↑/↓        - Move through suggestions",
                "  Tab        - Take highlighted suggestion",
                "  Enter      - Take suggestion, or save the text to history",
                "  Ctrl+L     - Clear this field's history",
                "  F1         - Toggle help",
                "  Esc/Ctrl+C - Quit",
            ]
            .join("\n")
        } else {
            format!("{}  (F1 for help)", self.status)
        };
        let footer = Paragraph::new(footer)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::Green))
            .wrap(Wrap { trim: false });
        frame.render_widget(footer, chunks[2]);
    }
}

/// Run the demo field until the user quits
pub fn run_field_demo(field: HistoryField) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut ui = FieldDemoUI::new(field);

    let result = (|| -> Result<()> {
        while ui.is_running() {
            terminal.draw(|f| ui.render(f))?;

            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    ui.handle_key(key);
                }
            }
        }
        Ok(())
    })();

    // Always restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
