use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::api::{Measurement, NutritionPlan, Payment, Product, Student};
use crate::types::{App, InputMode, Screen};
use crate::ui::utils::accent_color;
use crate::ui::widgets::{render_table, TableOptions};

fn student_actions(s: &Student) -> Vec<&'static str> {
    vec![if s.active { "[t] baja" } else { "[t] alta" }, "[d] borrar"]
}

fn delete_only<T>(_: &T) -> Vec<&'static str> {
    vec!["[d] borrar"]
}

/// Render one of the list screens.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let accent = accent_color(app.accent());
    let search_input = match &app.mode {
        InputMode::Search(term) => Some(term.as_str()),
        _ => None,
    };
    let title = app.screen.title();

    macro_rules! options {
        ($row:ty, $actions:expr) => {{
            let mut options: TableOptions<$row> = TableOptions::new(title, accent);
            options.searchable = true;
            options.selectable = true;
            options.actions = Some($actions);
            options.search_input = search_input;
            options
        }};
    }

    match app.screen {
        Screen::Students => render_table(f, area, &app.students, &options!(Student, &student_actions)),
        Screen::Payments => render_table(f, area, &app.payments, &options!(Payment, &delete_only::<Payment>)),
        Screen::Products => render_table(f, area, &app.products, &options!(Product, &delete_only::<Product>)),
        Screen::Nutrition => render_table(f, area, &app.nutrition, &options!(NutritionPlan, &delete_only::<NutritionPlan>)),
        Screen::Measurements => render_table(f, area, &app.measurements, &options!(Measurement, &delete_only::<Measurement>)),
        Screen::Reports | Screen::Settings => {}
    }

    if let InputMode::ConfirmDelete { ids, .. } = &app.mode {
        render_confirm_delete(f, ids.len(), area);
    }
}

/// Centered y/n prompt over the table.
fn render_confirm_delete(f: &mut Frame, count: usize, area: Rect) {
    let popup = centered_rect(50, 5, area);
    let text = vec![
        Line::from(format!("¿Eliminar {} registro(s)? Esta acción no se puede deshacer.", count)),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(": confirmar   "),
            Span::styled("n/Esc", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(": cancelar"),
        ]),
    ];
    let prompt = Paragraph::new(text)
        .wrap(ratatui::widgets::Wrap { trim: true })
        .block(Block::default().title("Confirmar").borders(Borders::ALL).style(Style::default().bg(Color::DarkGray)));
    f.render_widget(Clear, popup);
    f.render_widget(prompt, popup);
}

pub fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x.min(100)) / 2),
            Constraint::Percentage(percent_x.min(100)),
            Constraint::Percentage((100 - percent_x.min(100)) / 2),
        ])
        .split(vertical[1])[1]
}
