//! Column layouts for each list screen.

use crate::api::{Measurement, NutritionPlan, Payment, Product, Student};
use crate::table::{Column, Value};
use crate::ui::utils::{format_currency, format_date, format_decimal};

/// Stock at or below this is flagged on the products screen.
pub const LOW_STOCK: i64 = 5;

fn currency(value: &Value) -> String {
    match value {
        Value::Float(n) => format_currency(*n),
        Value::Int(n) => format_currency(*n as f64),
        other => other.to_string(),
    }
}

fn date(value: &Value) -> String {
    match value {
        Value::Date(d) => format_date(*d),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

pub fn student_columns() -> Vec<Column<Student>> {
    vec![
        Column::new("id", "ID", |s: &Student| (s.id as i64).into()).sortable().width(6),
        Column::new("name", "Nombre", |s: &Student| s.name.as_str().into()).sortable().width(22),
        Column::new("email", "Email", |s: &Student| s.email.clone().into()).width(24),
        Column::new("phone", "Teléfono", |s: &Student| s.phone.clone().into()).width(12),
        Column::new("plan", "Plan", |s: &Student| s.plan.clone().into()).sortable().width(12),
        Column::new("active", "Estado", |s: &Student| s.active.into())
            .sortable()
            .width(9)
            .render(|_, s| if s.active { "Activo" } else { "Inactivo" }.to_string()),
        Column::new("joinedAt", "Alta", |s: &Student| s.joined_at.into())
            .sortable()
            .width(11)
            .render(|v, _| date(v)),
    ]
}

pub fn payment_columns() -> Vec<Column<Payment>> {
    vec![
        Column::new("id", "ID", |p: &Payment| (p.id as i64).into()).sortable().width(6),
        Column::new("studentName", "Alumno", |p: &Payment| p.student_name.as_str().into()).sortable().width(24),
        Column::new("amount", "Monto", |p: &Payment| p.amount.into())
            .sortable()
            .width(14)
            .render(|v, _| currency(v)),
        Column::new("method", "Método", |p: &Payment| p.method.as_str().into()).width(14),
        Column::new("paidAt", "Fecha", |p: &Payment| p.paid_at.into())
            .sortable()
            .width(12)
            .render(|v, _| date(v)),
        Column::new("status", "Estado", |p: &Payment| p.status.label().into()).sortable().width(12),
    ]
}

pub fn product_columns() -> Vec<Column<Product>> {
    vec![
        Column::new("id", "ID", |p: &Product| (p.id as i64).into()).sortable().width(6),
        Column::new("name", "Producto", |p: &Product| p.name.as_str().into()).sortable().width(30),
        Column::new("category", "Categoría", |p: &Product| p.category.clone().into()).sortable().width(18),
        Column::new("price", "Precio", |p: &Product| p.price.into())
            .sortable()
            .width(14)
            .render(|v, _| currency(v)),
        Column::new("stock", "Stock", |p: &Product| p.stock.into())
            .sortable()
            .width(10)
            .render(|v, p| {
                if p.stock <= LOW_STOCK {
                    format!("{} (bajo)", v)
                } else {
                    v.to_string()
                }
            }),
    ]
}

pub fn nutrition_columns() -> Vec<Column<NutritionPlan>> {
    vec![
        Column::new("id", "ID", |n: &NutritionPlan| (n.id as i64).into()).sortable().width(6),
        Column::new("studentName", "Alumno", |n: &NutritionPlan| n.student_name.as_str().into())
            .sortable()
            .width(24),
        Column::new("goal", "Objetivo", |n: &NutritionPlan| n.goal.as_str().into()).sortable().width(22),
        Column::new("calories", "Kcal", |n: &NutritionPlan| n.calories.into()).sortable().width(8),
        Column::new("startDate", "Inicio", |n: &NutritionPlan| n.start_date.into())
            .sortable()
            .width(12)
            .render(|v, _| date(v)),
        Column::new("endDate", "Fin", |n: &NutritionPlan| n.end_date.into())
            .sortable()
            .width(12)
            .render(|v, _| date(v)),
    ]
}

pub fn measurement_columns() -> Vec<Column<Measurement>> {
    vec![
        Column::new("id", "ID", |m: &Measurement| (m.id as i64).into()).sortable().width(6),
        Column::new("studentName", "Alumno", |m: &Measurement| m.student_name.as_str().into())
            .sortable()
            .width(24),
        Column::new("measuredAt", "Fecha", |m: &Measurement| m.measured_at.into())
            .sortable()
            .width(12)
            .render(|v, _| date(v)),
        Column::new("weightKg", "Peso", |m: &Measurement| m.weight_kg.into())
            .sortable()
            .width(10)
            .render(|_, m| format_decimal(m.weight_kg, "kg")),
        Column::new("bodyFatPct", "Grasa", |m: &Measurement| m.body_fat_pct.into())
            .sortable()
            .width(10)
            .render(|_, m| m.body_fat_pct.map(|v| format_decimal(v, "%")).unwrap_or_else(|| "-".into())),
        Column::new("waistCm", "Cintura", |m: &Measurement| m.waist_cm.into())
            .sortable()
            .width(10)
            .render(|_, m| m.waist_cm.map(|v| format_decimal(v, "cm")).unwrap_or_else(|| "-".into())),
    ]
}
