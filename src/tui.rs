use std::io;
use std::sync::Once;

use crossterm::execute;
use crossterm::terminal::{enable_raw_mode, EnterAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::{DefaultTerminal, Terminal};

use crate::fmt::amount_repr;
use crate::models::{Transaction, TxnType};

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const NOTICE_STYLE: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);

pub const INCOME_STYLE: Style = Style::new().fg(Color::Rgb(80, 220, 100));
pub const EXPENSE_STYLE: Style = Style::new().fg(Color::Red);

pub const SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(40, 40, 60))
    .add_modifier(Modifier::BOLD);

/// Amount as displayed in the table, green for income and red for expense.
/// Untyped records are left unstyled.
pub fn amount_span(txn: &Transaction) -> Span<'static> {
    let text = amount_repr(txn.amount);
    match txn.txn_type() {
        Some(TxnType::Income) => Span::styled(text, INCOME_STYLE),
        Some(TxnType::Expense) => Span::styled(text, EXPENSE_STYLE),
        None => Span::raw(text),
    }
}

static PANIC_HOOK: Once = Once::new();

/// Restore the terminal before the previous panic hook runs. Installed at most
/// once per process, however many times the browser is opened.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            ratatui::restore();
            hook(info);
        }));
    });
}

/// Raw mode on the alternate screen. Unlike `ratatui::init` this adds no panic
/// hook of its own; pair with `ratatui::restore`.
pub fn init_terminal() -> io::Result<DefaultTerminal> {
    install_panic_hook();
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(io::stdout()))
}
