pub mod client;
pub mod models;
pub mod query;

pub use client::GymClient;
pub use models::{Measurement, NutritionPlan, Payment, PaymentStatus, Product, ReportSummary, Student, UiSettings};
pub use query::{ListPage, ListQuery, Resource};
