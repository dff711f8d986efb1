use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::api::ReportSummary;
use crate::types::App;
use crate::ui::utils::{accent_color, format_currency};

/// Render the reports dashboard: KPI cards plus a payment health gauge.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let accent = accent_color(app.accent());

    let summary = match (&app.report, app.report_loading) {
        (_, true) => {
            render_message(f, area, "Cargando reportes...");
            return;
        }
        (Some(summary), false) => summary,
        (None, false) => {
            render_message(f, area, "Sin datos. Pulsa F5 para cargar los reportes.");
            return;
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // KPI cards
            Constraint::Length(5), // Second row
            Constraint::Length(3), // Payment gauge
            Constraint::Min(0),
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(chunks[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(chunks[1]);

    kpi_card(f, top[0], "Alumnos activos", summary.active_members.to_string(), accent);
    kpi_card(f, top[1], "Altas del mes", summary.new_members_month.to_string(), accent);
    kpi_card(f, top[2], "Ingresos del mes", format_currency(summary.revenue_month), Color::Green);
    kpi_card(f, bottom[0], "Pagos pendientes", summary.pending_payments.to_string(), Color::Yellow);
    kpi_card(f, bottom[1], "Pagos vencidos", summary.overdue_payments.to_string(), Color::Red);
    kpi_card(f, bottom[2], "Productos con stock bajo", summary.low_stock_products.to_string(), Color::Magenta);

    render_payment_gauge(f, summary, chunks[2]);
}

fn kpi_card(f: &mut Frame, area: Rect, title: &str, value: String, color: Color) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD))),
    ];
    let card = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    f.render_widget(card, area);
}

/// Share of members without outstanding payments.
pub fn payments_up_to_date(summary: &ReportSummary) -> f64 {
    if summary.active_members == 0 {
        return 1.0;
    }
    let behind = (summary.pending_payments + summary.overdue_payments).min(summary.active_members);
    1.0 - behind as f64 / summary.active_members as f64
}

fn render_payment_gauge(f: &mut Frame, summary: &ReportSummary, area: Rect) {
    let ratio = payments_up_to_date(summary);
    let color = if ratio >= 0.9 {
        Color::Green
    } else if ratio >= 0.7 {
        Color::Yellow
    } else {
        Color::Red
    };
    let gauge = Gauge::default()
        .block(Block::default().title("Alumnos al corriente").borders(Borders::ALL))
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("{:.0}%", ratio * 100.0));
    f.render_widget(gauge, area);
}

fn render_message(f: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().title("Reportes").borders(Borders::ALL));
    f.render_widget(paragraph, area);
}
