use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::config::config_path;
use crate::types::App;
use crate::ui::utils::accent_color;

/// Render the personalization settings screen.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50), // Current configuration
            Constraint::Percentage(50), // Available actions
        ])
        .split(area);

    render_current_config(f, app, chunks[0]);
    render_available_actions(f, app, chunks[1]);
}

fn option_line(app: &App, index: usize, label: &str, value: String) -> Line<'static> {
    let style = if app.settings_selected == index {
        Style::default().fg(accent_color(app.accent())).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let marker = if app.settings_selected == index { "> " } else { "  " };
    Line::from(vec![
        Span::styled(format!("{}{}: ", marker, label), style),
        Span::styled(value, style),
    ])
}

fn render_current_config(f: &mut Frame, app: &App, area: Rect) {
    let config = &app.config;
    let mut lines = vec![
        Line::from(vec![
            Span::styled("API: ", Style::default().fg(Color::Cyan)),
            Span::raw(app.api_url.clone()),
        ]),
        Line::from(vec![
            Span::styled("Archivo: ", Style::default().fg(Color::Cyan)),
            Span::raw(
                config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]),
        Line::from(""),
        option_line(app, 0, "Filas por página", config.page_size.to_string()),
        option_line(app, 1, "Color de acento", config.accent.name().to_string()),
        option_line(
            app,
            2,
            "Paginación local",
            format!("{} (al reiniciar)", if config.force_client_side { "Sí" } else { "No" }),
        ),
        option_line(app, 3, "Pantalla inicial", config.start_screen.title().to_string()),
    ];

    if !app.has_saved_config {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Sin configuración guardada",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        )));
    }

    let widget = Paragraph::new(lines)
        .block(Block::default().title("Configuración actual").borders(Borders::ALL))
        .alignment(Alignment::Left);
    f.render_widget(widget, area);
}

fn render_available_actions(f: &mut Frame, app: &App, area: Rect) {
    let key = Style::default().fg(accent_color(app.accent())).add_modifier(Modifier::BOLD);
    let actions = vec![
        Line::from(vec![Span::styled("↑/↓", key), Span::raw(" - Elegir ajuste")]),
        Line::from(vec![Span::styled("←/→", key), Span::raw(" - Cambiar valor")]),
        Line::from(""),
        Line::from(vec![Span::styled("w", key), Span::raw(" - Guardar ajustes")]),
        Line::from("    Se guardan en disco y en el servidor"),
        Line::from(vec![Span::styled("r", key), Span::raw(" - Borrar configuración guardada")]),
        Line::from(""),
        Line::from(vec![Span::styled("Tab", key), Span::raw(" - Cambiar de pantalla")]),
    ];

    let widget = Paragraph::new(actions)
        .block(Block::default().title("Acciones").borders(Borders::ALL))
        .alignment(Alignment::Left);
    f.render_widget(widget, area);
}
