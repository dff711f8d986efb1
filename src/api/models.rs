//! Entities returned by the backend, as JSON with camelCase keys.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::table::TableRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub joined_at: Option<NaiveDate>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Overdue,
}

impl PaymentStatus {
    pub fn label(self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Pagado",
            PaymentStatus::Pending => "Pendiente",
            PaymentStatus::Overdue => "Vencido",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: u64,
    pub student_id: u64,
    #[serde(default)]
    pub student_name: String,
    pub amount: f64,
    #[serde(default)]
    pub method: String,
    pub paid_at: NaiveDate,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionPlan {
    pub id: u64,
    #[serde(default)]
    pub student_name: String,
    pub goal: String,
    #[serde(default)]
    pub calories: u32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub id: u64,
    #[serde(default)]
    pub student_name: String,
    pub measured_at: NaiveDate,
    pub weight_kg: f64,
    #[serde(default)]
    pub body_fat_pct: Option<f64>,
    #[serde(default)]
    pub waist_cm: Option<f64>,
}

/// Dashboard figures from `reports/summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportSummary {
    pub active_members: u64,
    pub new_members_month: u64,
    pub revenue_month: f64,
    pub pending_payments: u64,
    pub overdue_payments: u64,
    pub low_stock_products: u64,
}

/// Personalization stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSettings {
    pub accent: String,
    pub page_size: usize,
}

macro_rules! impl_table_row {
    ($($ty:ty),*) => {
        $(
            impl TableRow for $ty {
                type Id = u64;

                fn id(&self) -> Option<u64> {
                    Some(self.id)
                }
            }
        )*
    };
}

impl_table_row!(Student, Payment, Product, NutritionPlan, Measurement);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_defaults_missing_fields() {
        let student: Student = serde_json::from_str(r#"{"id": 7, "name": "Ana"}"#).unwrap();
        assert!(student.active);
        assert_eq!(student.email, None);
        assert_eq!(student.id(), Some(7));
    }

    #[test]
    fn payment_uses_camel_case() {
        let json = r#"{
            "id": 1, "studentId": 7, "studentName": "Ana", "amount": 450.0,
            "method": "efectivo", "paidAt": "2024-03-01", "status": "overdue"
        }"#;
        let payment: Payment = serde_json::from_str(json).unwrap();
        assert_eq!(payment.status, PaymentStatus::Overdue);
        assert_eq!(payment.paid_at, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn summary_tolerates_partial_payloads() {
        let summary: ReportSummary = serde_json::from_str(r#"{"activeMembers": 120}"#).unwrap();
        assert_eq!(summary.active_members, 120);
        assert_eq!(summary.revenue_month, 0.0);
    }
}
