pub mod input;
pub mod renderers;
pub mod terminal;
pub mod utils;
pub mod widgets;

use std::io;

use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame, Terminal,
};

use crate::types::{App, InputMode, NotificationKind, Screen};
use utils::accent_color;

pub use terminal::{restore_terminal, setup_terminal, Tui};

/// Draw one frame.
pub fn render_ui<B: Backend>(app: &App, terminal: &mut Terminal<B>) -> Result<(), io::Error> {
    terminal.draw(|f| draw(f, app))?;
    Ok(())
}

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Screen tabs
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(f.size());

    render_tabs(f, app, chunks[0]);
    match app.screen {
        Screen::Reports => renderers::reports::render(f, app, chunks[1]),
        Screen::Settings => renderers::settings::render(f, app, chunks[1]),
        _ => renderers::list::render(f, app, chunks[1]),
    }
    render_footer(f, app, chunks[2]);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Screen::ALL
        .iter()
        .map(|s| Line::from(format!("{} {}", s.index() + 1, s.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().title("MC GYM").borders(Borders::ALL))
        .select(app.screen.index())
        .highlight_style(
            Style::default()
                .fg(accent_color(app.accent()))
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn help_text(app: &App) -> &'static str {
    match (&app.mode, app.screen) {
        (InputMode::Search(_), _) => "Enter: buscar | Esc: cancelar",
        (InputMode::ConfirmDelete { .. }, _) => "y: confirmar | n/Esc: cancelar",
        (_, Screen::Settings) => "↑/↓: ajuste | ←/→: valor | w: guardar | r: reiniciar | Tab: pantalla | q: salir",
        (_, Screen::Reports) => "F5: actualizar | Tab: pantalla | q: salir",
        (_, Screen::Students) => {
            "←/→: página | /: buscar | s/o: orden | espacio/a/n: selección | t: alta/baja | d: borrar | q: salir"
        }
        _ => "←/→: página | /: buscar | s/o: orden | espacio/a/n: selección | d: borrar | q: salir",
    }
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let line = match &app.notification {
        Some(notification) => {
            let color = match notification.kind {
                NotificationKind::Info => Color::Cyan,
                NotificationKind::Success => Color::Green,
                NotificationKind::Error => Color::Red,
            };
            Line::from(Span::styled(notification.message.clone(), Style::default().fg(color)))
        }
        None => Line::from(Span::styled(help_text(app), Style::default().fg(Color::DarkGray))),
    };
    f.render_widget(Paragraph::new(line), area);
}
