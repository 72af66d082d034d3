use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row as TableRow, Table, TableState, Wrap},
    DefaultTerminal, Frame,
};
use tracing::debug;

use crate::error::Result;
use crate::filter::{self, Query};
use crate::fmt::money;
use crate::models::{Store, TxnType};
use crate::tui::{self, FOOTER_STYLE, HEADER_STYLE, NOTICE_STYLE, SELECTED_STYLE};
use crate::view::{build_rows, build_rows_in, sort_rows, Column, Row, SortState};

const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Category,
    Date,
    Amount,
    Type,
}

impl SearchField {
    fn prompt(&self) -> &'static str {
        match self {
            SearchField::Category => "Search by category",
            SearchField::Date => "Search by date (YYYY-MM-DD)",
            SearchField::Amount => "Search by amount",
            SearchField::Type => "Search by type (income/expense)",
        }
    }

    fn parse(&self, input: &str) -> Result<Query> {
        match self {
            SearchField::Category => Ok(Query::category(input)),
            SearchField::Date => Query::date(input),
            SearchField::Amount => Query::amount(input),
            SearchField::Type => Query::txn_type(input),
        }
    }
}

enum BrowseMode {
    Normal,
    Search(SearchField, String),
}

pub enum BrowseAction {
    Continue,
    Close,
}

/// Read-only table over the store or the current filtered view.
pub struct LedgerBrowser<'a> {
    store: &'a Store,
    filtered: Option<(Query, Store)>,
    rows: Vec<Row>,
    sort: SortState,
    offset: usize,
    visible_count: usize,
    selected: usize,
    mode: BrowseMode,
    notice: Option<String>,
    status_message: Option<String>,
    table_state: TableState,
}

impl<'a> LedgerBrowser<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            filtered: None,
            rows: build_rows(store),
            sort: SortState::default(),
            offset: 0,
            visible_count: PAGE_SIZE,
            selected: 0,
            mode: BrowseMode::Normal,
            notice: None,
            status_message: None,
            table_state: TableState::default(),
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        let mut terminal = tui::init_terminal()?;
        let result = self.event_loop(&mut terminal);
        ratatui::restore();
        result
    }

    /// Rebuild rows from the store or filtered view. Discards any sort order.
    fn rebuild(&mut self) {
        self.rows = match &self.filtered {
            Some((_, view)) => build_rows_in(view, self.store),
            None => build_rows(self.store),
        };
        self.sort.reset();
        self.offset = 0;
        self.selected = 0;
    }

    /// Run a search. A malformed query raises a notice and keeps the current view.
    pub fn search(&mut self, field: SearchField, input: &str) {
        let outcome = field
            .parse(input)
            .and_then(|q| filter::apply(self.store, &q).map(|view| (q, view)));
        match outcome {
            Ok((query, view)) => {
                debug!("Filtered by {}: {} rows", query.describe(), view.transaction_count());
                let empty = view.is_empty();
                self.filtered = Some((query, view));
                self.rebuild();
                if empty {
                    self.status_message = Some("No matching transactions".to_string());
                }
            }
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    pub fn clear_filter(&mut self) {
        if self.filtered.take().is_some() {
            self.rebuild();
        }
    }

    pub fn sort_by(&mut self, column: Column) {
        let dir = self.sort.toggle(column);
        sort_rows(&mut self.rows, column, dir);
        self.offset = 0;
        self.selected = 0;
    }

    /// Income minus expense over the displayed rows. Untyped rows are skipped.
    fn net(&self) -> f64 {
        self.rows
            .iter()
            .map(|r| match r.txn.txn_type() {
                Some(TxnType::Income) => r.txn.amount,
                Some(TxnType::Expense) => -r.txn.amount,
                None => 0.0,
            })
            .sum()
    }

    /// Draw the browser into the given frame.
    pub fn draw_frame(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let areas = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Fill(1),   // table
            Constraint::Length(1), // status
            Constraint::Length(1), // keys
        ])
        .split(area);
        let title_area = areas[0];
        let table_area = areas[1];
        let status_area = areas[2];
        let keys_area = areas[3];

        frame.render_widget(
            Paragraph::new("Personal Finance Tracker").style(HEADER_STYLE),
            title_area,
        );

        let header_overhead = 2u16; // header row + bottom_margin
        let available_height = table_area.height.saturating_sub(header_overhead) as usize;
        let rendered_rows: Vec<TableRow> = self
            .rows
            .iter()
            .skip(self.offset)
            .take(available_height.max(1))
            .map(|r| {
                TableRow::new(vec![
                    Cell::from(r.category.clone()),
                    Cell::from(r.index.to_string()),
                    Cell::from(r.cell(Column::Date)),
                    Cell::from(tui::amount_span(&r.txn)),
                    Cell::from(r.cell(Column::Type)),
                ])
            })
            .collect();
        self.visible_count = rendered_rows.len().max(1);

        let widths = [
            Constraint::Fill(1),
            Constraint::Length(4),
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Length(8),
        ];

        let active = self.sort.active();
        let mut header_cells = vec!["Category".to_string(), "#".to_string()];
        for column in Column::ALL {
            let label = match active {
                Some((c, dir)) if c == column => format!("{} {}", column.title(), dir.arrow()),
                _ => column.title().to_string(),
            };
            header_cells.push(label);
        }

        let selected = if self.rows.is_empty() {
            None
        } else {
            Some(self.selected)
        };
        self.table_state.select(selected);
        let table = Table::new(rendered_rows, widths)
            .header(TableRow::new(header_cells).style(HEADER_STYLE).bottom_margin(1))
            .column_spacing(1)
            .row_highlight_style(SELECTED_STYLE);
        frame.render_stateful_widget(table, table_area, &mut self.table_state);

        let end_row = (self.offset + self.visible_count).min(self.rows.len());
        let start_row = if self.rows.is_empty() { 0 } else { self.offset + 1 };
        let mut status = format!(
            "Rows {}-{} of {} | Net: {}",
            start_row,
            end_row,
            self.rows.len(),
            money(self.net()),
        );
        if let Some((query, _)) = &self.filtered {
            status.push_str(&format!(" | {}", query.describe()));
        }
        if let Some(ref msg) = self.status_message {
            status.push_str(&format!(" | {msg}"));
        }
        frame.render_widget(Paragraph::new(status).style(FOOTER_STYLE), status_area);

        let keys_widget = match &self.mode {
            BrowseMode::Normal => Paragraph::new(
                "\u{2191}/\u{2193}:select  n/p:page  c/d/a/t:search category/date/amount/type  x:clear  1/2/3:sort date/amount/type  q:close",
            )
            .style(FOOTER_STYLE),
            BrowseMode::Search(field, input) => {
                Paragraph::new(format!("{}: {input}\u{2588}", field.prompt()))
            }
        };
        frame.render_widget(keys_widget, keys_area);

        if let Some(ref notice) = self.notice {
            let popup = centered(area, 60, 5);
            frame.render_widget(Clear, popup);
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(Span::styled(notice.clone(), NOTICE_STYLE)),
                    Line::from(Span::styled("Press any key", FOOTER_STYLE)),
                ])
                .wrap(Wrap { trim: true })
                .block(Block::default().title("Error").borders(Borders::ALL)),
                popup,
            );
        }
    }

    /// Handle a key event. Returns a BrowseAction indicating what the caller should do.
    pub fn handle_key_event(&mut self, code: KeyCode) -> BrowseAction {
        // An open notice swallows the next key.
        if self.notice.take().is_some() {
            return BrowseAction::Continue;
        }
        self.status_message = None;

        match &self.mode {
            BrowseMode::Normal => match code {
                KeyCode::Char('q') | KeyCode::Esc => return BrowseAction::Close,
                KeyCode::Down => {
                    if self.selected + 1 < self.visible_count.min(self.rows.len() - self.offset) {
                        self.selected += 1;
                    } else if self.offset + self.visible_count < self.rows.len() {
                        self.offset += 1;
                    }
                }
                KeyCode::Up => {
                    if self.selected > 0 {
                        self.selected -= 1;
                    } else if self.offset > 0 {
                        self.offset -= 1;
                    }
                }
                KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => {
                    self.scroll_down();
                    self.selected = 0;
                }
                KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => {
                    self.scroll_up();
                    self.selected = 0;
                }
                KeyCode::Home => {
                    self.offset = 0;
                    self.selected = 0;
                }
                KeyCode::End => {
                    self.scroll_to_end();
                    self.selected = 0;
                }
                KeyCode::Char('c') => {
                    self.mode = BrowseMode::Search(SearchField::Category, String::new())
                }
                KeyCode::Char('d') => {
                    self.mode = BrowseMode::Search(SearchField::Date, String::new())
                }
                KeyCode::Char('a') => {
                    self.mode = BrowseMode::Search(SearchField::Amount, String::new())
                }
                KeyCode::Char('t') => {
                    self.mode = BrowseMode::Search(SearchField::Type, String::new())
                }
                KeyCode::Char('x') => self.clear_filter(),
                KeyCode::Char('1') => self.sort_by(Column::Date),
                KeyCode::Char('2') => self.sort_by(Column::Amount),
                KeyCode::Char('3') => self.sort_by(Column::Type),
                _ => {}
            },
            BrowseMode::Search(..) => match code {
                KeyCode::Esc => self.mode = BrowseMode::Normal,
                KeyCode::Enter => self.submit_input(),
                KeyCode::Backspace => {
                    if let BrowseMode::Search(_, s) = &mut self.mode {
                        s.pop();
                    }
                }
                KeyCode::Char(c) => {
                    if let BrowseMode::Search(_, s) = &mut self.mode {
                        s.push(c);
                    }
                }
                _ => {}
            },
        }
        BrowseAction::Continue
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        loop {
            terminal.draw(|frame| self.draw_frame(frame))?;

            if let Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) = event::read()?
            {
                if kind != KeyEventKind::Press {
                    continue;
                }

                if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
                    break;
                }

                match self.handle_key_event(code) {
                    BrowseAction::Close => break,
                    BrowseAction::Continue => {}
                }
            }
        }
        Ok(())
    }

    fn submit_input(&mut self) {
        let mode = std::mem::replace(&mut self.mode, BrowseMode::Normal);
        if let BrowseMode::Search(field, input) = mode {
            self.search(field, &input);
        }
    }

    fn scroll_down(&mut self) {
        let new_offset = self.offset + self.visible_count;
        if new_offset < self.rows.len() {
            self.offset = new_offset;
        }
    }

    fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(self.visible_count);
    }

    fn scroll_to_end(&mut self) {
        self.offset = self.rows.len().saturating_sub(PAGE_SIZE);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}
