// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use grants_app::{
    AppCommand, AppEvent, AppMode, AppState, FilterSection, FilterSheet, Grant, GrantBrowser,
    StatusColor,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use url::Url;

const HALF_PAGE_ROWS: isize = 10;
const FULL_PAGE_ROWS: isize = 20;
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const CHECK_MARK: &str = "✓";
const CURSOR_MARK: &str = "›";
const ORANGE: Color = Color::Rgb(255, 165, 0);

pub trait AppRuntime {
    fn load_grants(&mut self) -> Result<Vec<Grant>>;
    /// Hands a link to the platform opener. `Ok` means the opener started,
    /// not that a page loaded.
    fn open_link(&mut self, url: &Url) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListCommand {
    MoveRow(isize),
    JumpFirstRow,
    JumpLastRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SheetCursor {
    section: FilterSection,
    row: usize,
}

impl Default for SheetCursor {
    fn default() -> Self {
        Self {
            section: FilterSection::Status,
            row: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
struct ViewData {
    browser: GrantBrowser,
    selected_row: usize,
    sheet_cursor: SheetCursor,
    help_visible: bool,
    status_token: u64,
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    let mut view_data = ViewData::default();
    reload_grants(runtime, &mut view_data).context("load grants")?;
    view_data.browser.apply(state.active_filters);

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = Ok(());
    loop {
        process_internal_events(state, &view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
            emit_status(state, view_data, internal_tx, "help hidden");
        }
        return false;
    }

    if state.mode == AppMode::Filter {
        handle_filter_sheet_key(state, view_data, internal_tx, key);
        return false;
    }

    if let Some(command) = list_command_for_key(key) {
        apply_list_command(view_data, command);
        return false;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => return true,
        (KeyCode::Enter, _) => open_selected_grant(state, runtime, view_data, internal_tx),
        (KeyCode::Char('f'), KeyModifiers::NONE) => {
            open_filter_sheet(state, view_data, internal_tx);
        }
        (KeyCode::Char('x'), KeyModifiers::NONE) => {
            dispatch_and_sync(state, view_data, AppCommand::ClearFilters, internal_tx);
        }
        (KeyCode::Char('r'), KeyModifiers::NONE) => match reload_grants(runtime, view_data) {
            Ok(total) => {
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    format!("reloaded {total} grants"),
                );
            }
            Err(error) => {
                tracing::warn!(error = %format!("{error:#}"), "grant reload failed");
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    format!("reload failed: {error}"),
                );
            }
        },
        (KeyCode::Char('?'), _) => {
            view_data.help_visible = true;
        }
        _ => {}
    }
    false
}

fn list_command_for_key(key: KeyEvent) -> Option<ListCommand> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('d'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ListCommand::MoveRow(HALF_PAGE_ROWS))
        }
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ListCommand::MoveRow(-HALF_PAGE_ROWS))
        }
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(ListCommand::MoveRow(1)),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(ListCommand::MoveRow(-1)),
        (KeyCode::PageDown, _) => Some(ListCommand::MoveRow(FULL_PAGE_ROWS)),
        (KeyCode::PageUp, _) => Some(ListCommand::MoveRow(-FULL_PAGE_ROWS)),
        (KeyCode::Char('g'), _) | (KeyCode::Home, _) => Some(ListCommand::JumpFirstRow),
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => Some(ListCommand::JumpLastRow),
        _ => None,
    }
}

fn apply_list_command(view_data: &mut ViewData, command: ListCommand) {
    let last = view_data.browser.len().saturating_sub(1);
    view_data.selected_row = match command {
        ListCommand::MoveRow(delta) => {
            let target = (view_data.selected_row as isize).saturating_add(delta);
            target.clamp(0, last as isize) as usize
        }
        ListCommand::JumpFirstRow => 0,
        ListCommand::JumpLastRow => last,
    };
}

fn clamp_list_cursor(view_data: &mut ViewData) {
    view_data.selected_row = view_data
        .selected_row
        .min(view_data.browser.len().saturating_sub(1));
}

fn open_selected_grant<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(grant) = view_data.browser.grant_at(view_data.selected_row) else {
        return;
    };
    let Some(url) = grant.application_url() else {
        tracing::debug!(
            grant = grant.name(),
            link = grant.application_link(),
            "ignoring grant without a usable link"
        );
        return;
    };

    let name = grant.name().to_owned();
    tracing::info!(grant = %name, %url, "opening application link");
    let message = match runtime.open_link(&url) {
        Ok(()) => format!("opening {name}"),
        Err(error) => {
            tracing::warn!(grant = %name, error = %format!("{error:#}"), "link opener failed");
            format!("open failed: {error}")
        }
    };
    emit_status(state, view_data, internal_tx, message);
}

fn open_filter_sheet(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    dispatch_and_sync(state, view_data, AppCommand::OpenFilters, internal_tx);
    let row = state
        .sheet
        .map_or(0, |sheet| sheet.selected_index(FilterSection::Status));
    view_data.sheet_cursor = SheetCursor {
        section: FilterSection::Status,
        row,
    };
}

fn handle_filter_sheet_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let cursor = view_data.sheet_cursor;
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            dispatch_and_sync(state, view_data, AppCommand::CancelFilters, internal_tx);
        }
        (KeyCode::Enter, _) => {
            dispatch_and_sync(state, view_data, AppCommand::ApplyFilters, internal_tx);
        }
        (KeyCode::Char('s'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            dispatch_and_sync(state, view_data, AppCommand::ApplyFilters, internal_tx);
        }
        (KeyCode::Char(' '), _) => {
            let command = AppCommand::SelectFilterOption {
                section: cursor.section,
                index: cursor.row,
            };
            dispatch_and_sync(state, view_data, command, internal_tx);
        }
        (KeyCode::Char(digit @ '1'..='9'), _) => {
            let index = (digit as usize) - ('1' as usize);
            if index < cursor.section.option_count() {
                view_data.sheet_cursor.row = index;
                let command = AppCommand::SelectFilterOption {
                    section: cursor.section,
                    index,
                };
                dispatch_and_sync(state, view_data, command, internal_tx);
            }
        }
        (KeyCode::Tab, _) => {
            view_data.sheet_cursor = section_cursor(state.sheet.as_ref(), cursor.section.next());
        }
        (KeyCode::BackTab, _) => {
            view_data.sheet_cursor = section_cursor(state.sheet.as_ref(), cursor.section.prev());
        }
        (KeyCode::Char('j') | KeyCode::Down, _) => {
            view_data.sheet_cursor = move_sheet_cursor(cursor, 1);
        }
        (KeyCode::Char('k') | KeyCode::Up, _) => {
            view_data.sheet_cursor = move_sheet_cursor(cursor, -1);
        }
        _ => {}
    }
}

fn section_cursor(sheet: Option<&FilterSheet>, section: FilterSection) -> SheetCursor {
    SheetCursor {
        section,
        row: sheet.map_or(0, |sheet| sheet.selected_index(section)),
    }
}

/// Moves through the sheet's options as one list, crossing section borders.
fn move_sheet_cursor(cursor: SheetCursor, delta: isize) -> SheetCursor {
    let total: usize = FilterSection::ALL
        .iter()
        .map(|section| section.option_count())
        .sum();

    let mut flat = cursor.row;
    for section in FilterSection::ALL {
        if section == cursor.section {
            break;
        }
        flat += section.option_count();
    }

    let mut remaining = (flat as isize)
        .saturating_add(delta)
        .clamp(0, total as isize - 1) as usize;
    for section in FilterSection::ALL {
        if remaining < section.option_count() {
            return SheetCursor {
                section,
                row: remaining,
            };
        }
        remaining -= section.option_count();
    }
    cursor
}

fn dispatch_and_sync(
    state: &mut AppState,
    view_data: &mut ViewData,
    command: AppCommand,
    internal_tx: &Sender<InternalEvent>,
) {
    let events = state.dispatch(command);
    for event in &events {
        if let AppEvent::FiltersApplied(criteria) = event {
            view_data.browser.apply(*criteria);
            view_data.selected_row = 0;
            tracing::info!(
                filters = %criteria.summary(),
                shown = view_data.browser.len(),
                "filters applied"
            );
        }
    }
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
}

fn reload_grants<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) -> Result<usize> {
    let grants = runtime.load_grants()?;
    view_data.browser.replace_grants(grants);
    clamp_list_cursor(view_data);
    Ok(view_data.browser.total())
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(&view_data.browser))
        .block(Block::default().title("grants").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    render_grant_table(frame, layout[1], view_data);

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if let Some(sheet) = &state.sheet {
        let area = centered_rect(56, 70, frame.area());
        frame.render_widget(Clear, area);
        let overlay = Paragraph::new(render_filter_sheet_text(sheet, view_data.sheet_cursor))
            .block(
                Block::default()
                    .title("Filter Grants")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Cyan)),
            );
        frame.render_widget(overlay, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_grant_table(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let block = Block::default()
        .title(list_title(&view_data.browser))
        .borders(Borders::ALL);

    if view_data.browser.is_empty() {
        let empty = Paragraph::new(empty_list_message(&view_data.browser)).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(["name", "status", "date", "requirements"].map(|label| {
        Cell::from(label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows = view_data.browser.rows().into_iter().map(|row| {
        Row::new(vec![
            Cell::from(row.name),
            Cell::from(row.status_label).style(Style::default().fg(status_color(row.status_color))),
            Cell::from(row.date_text),
            Cell::from(row.requirements_text),
        ])
    });
    let widths = [
        Constraint::Percentage(34),
        Constraint::Length(8),
        Constraint::Percentage(24),
        Constraint::Percentage(34),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(block)
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
    let mut table_state = TableState::default().with_selected(Some(view_data.selected_row));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn header_text(browser: &GrantBrowser) -> String {
    browser.criteria().summary()
}

fn list_title(browser: &GrantBrowser) -> String {
    format!("Grants ({}/{})", browser.len(), browser.total())
}

fn empty_list_message(browser: &GrantBrowser) -> &'static str {
    if browser.total() == 0 {
        "no grants loaded"
    } else {
        "no grants match the active filters; press x to clear them"
    }
}

const fn status_color(color: StatusColor) -> Color {
    match color {
        StatusColor::Green => Color::Green,
        StatusColor::Red => Color::Red,
        StatusColor::Orange => ORANGE,
    }
}

fn render_filter_sheet_text(sheet: &FilterSheet, cursor: SheetCursor) -> String {
    let mut lines = Vec::new();
    for section in FilterSection::ALL {
        lines.push(section.title().to_owned());
        for (index, option) in sheet.options(section).iter().enumerate() {
            let pointer = if cursor.section == section && cursor.row == index {
                CURSOR_MARK
            } else {
                " "
            };
            let check = if option.checked { CHECK_MARK } else { " " };
            lines.push(format!("{pointer} {check} {}", option.label));
        }
        lines.push(String::new());
    }
    lines.push("space select | tab section | enter done | esc cancel".to_owned());
    lines.join("\n")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if view_data.help_visible {
        return String::new();
    }

    let (mode, default) = match state.mode {
        AppMode::Browse => (
            "BROWSE",
            "j/k g/G ^d/^u | enter open | f filter | x clear | r reload | ? help | q quit"
                .to_owned(),
        ),
        AppMode::Filter => (
            "FILTER",
            format!(
                "j/k move | 1-{} choose | space select | tab section | enter done | esc cancel",
                view_data.sheet_cursor.section.option_count()
            ),
        ),
    };
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {default}"),
        None => format!("{mode} | {default}"),
    }
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | ? help\n\
list: j/k up/down | g/G first/last | ctrl+d/ctrl+u half page | pgup/pgdn page\n\
list: enter open application link | f filter | x clear filters | r reload | q quit\n\
filter: j/k move | tab/shift+tab section | space or option number choose | enter done | esc cancel"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
