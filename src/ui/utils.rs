use chrono::NaiveDate;
use ratatui::style::Color;

use crate::config::Accent;

/// Format an amount as pesos with thousands separators, e.g. `$1,234.50`.
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}${}.{:02}", if negative { "-" } else { "" }, grouped, fraction)
}

/// Dates are shown day first, as the front desk reads them.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_decimal(value: f64, unit: &str) -> String {
    format!("{:.1} {}", value, unit)
}

pub fn accent_color(accent: Accent) -> Color {
    match accent {
        Accent::Cyan => Color::Cyan,
        Accent::Green => Color::Green,
        Accent::Magenta => Color::Magenta,
        Accent::Yellow => Color::Yellow,
        Accent::Blue => Color::Blue,
        Accent::Red => Color::Red,
    }
}
