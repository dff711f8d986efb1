//! Background task that talks to the backend so the UI loop never waits on
//! the network.

use log::{debug, error};
use tokio::sync::mpsc::{Receiver, Sender};

use crate::api::{GymClient, ListQuery, Measurement, NutritionPlan, Payment, Product, ReportSummary, Resource, Student, UiSettings};
use crate::error::ApiError;
use crate::types::Screen;

#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    List { screen: Screen, seq: u64, query: ListQuery },
    Delete { screen: Screen, ids: Vec<u64> },
    SetActive { id: u64, active: bool },
    Report,
    LoadSettings,
    SaveSettings(UiSettings),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rows {
    Students(Vec<Student>),
    Payments(Vec<Payment>),
    Products(Vec<Product>),
    Nutrition(Vec<NutritionPlan>),
    Measurements(Vec<Measurement>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Listed { screen: Screen, seq: u64, rows: Rows, total: usize },
    /// `deleted` holds the ids removed before `error`, if any, stopped the batch.
    Deleted { screen: Screen, deleted: Vec<u64>, error: Option<String> },
    ActiveChanged { id: u64, active: bool },
    Report(ReportSummary),
    RemoteSettings(UiSettings),
    SettingsSaved,
    /// `seq` is set when a list request failed, so stale failures can be told apart.
    Failed { screen: Option<Screen>, seq: Option<u64>, message: String },
}

/// Serve requests until the UI drops its sender. Each request runs on its
/// own task so a slow list does not hold up the others.
pub async fn run(client: GymClient, mut requests: Receiver<FetchRequest>, outcomes: Sender<FetchOutcome>) {
    while let Some(request) = requests.recv().await {
        let client = client.clone();
        let outcomes = outcomes.clone();
        tokio::spawn(async move {
            let outcome = handle(&client, request).await;
            if outcomes.send(outcome).await.is_err() {
                debug!("UI is gone, dropping outcome");
            }
        });
    }
    debug!("request channel closed, worker exiting");
}

pub async fn handle(client: &GymClient, request: FetchRequest) -> FetchOutcome {
    match request {
        FetchRequest::List { screen, seq, query } => match list(client, screen, &query).await {
            Ok((rows, total)) => FetchOutcome::Listed { screen, seq, rows, total },
            Err(e) => failed(Some(screen), Some(seq), e),
        },
        FetchRequest::Delete { screen, ids } => {
            let Some(resource) = screen.resource() else {
                return FetchOutcome::Failed {
                    screen: Some(screen),
                    seq: None,
                    message: "Nada que eliminar aquí".into(),
                };
            };
            let mut deleted = Vec::with_capacity(ids.len());
            for id in ids {
                if let Err(e) = client.delete(resource, id).await {
                    error!("delete {:?} {} failed: {}", resource, id, e);
                    return FetchOutcome::Deleted { screen, deleted, error: Some(e.user_message()) };
                }
                deleted.push(id);
            }
            FetchOutcome::Deleted { screen, deleted, error: None }
        }
        FetchRequest::SetActive { id, active } => match client.set_student_active(id, active).await {
            Ok(()) => FetchOutcome::ActiveChanged { id, active },
            Err(e) => failed(Some(Screen::Students), None, e),
        },
        FetchRequest::Report => match client.report_summary().await {
            Ok(summary) => FetchOutcome::Report(summary),
            Err(e) => failed(Some(Screen::Reports), None, e),
        },
        FetchRequest::LoadSettings => match client.settings().await {
            Ok(settings) => FetchOutcome::RemoteSettings(settings),
            Err(e) => failed(None, None, e),
        },
        FetchRequest::SaveSettings(settings) => match client.update_settings(&settings).await {
            Ok(()) => FetchOutcome::SettingsSaved,
            Err(e) => failed(Some(Screen::Settings), None, e),
        },
    }
}

async fn list(client: &GymClient, screen: Screen, query: &ListQuery) -> Result<(Rows, usize), ApiError> {
    let resource = screen
        .resource()
        .ok_or_else(|| ApiError::InvalidUrl(format!("{:?} has no collection", screen)))?;
    let (rows, total) = match resource {
        Resource::Students => {
            let page = client.list(resource, query).await?;
            (Rows::Students(page.rows), page.total)
        }
        Resource::Payments => {
            let page = client.list(resource, query).await?;
            (Rows::Payments(page.rows), page.total)
        }
        Resource::Products => {
            let page = client.list(resource, query).await?;
            (Rows::Products(page.rows), page.total)
        }
        Resource::NutritionPlans => {
            let page = client.list(resource, query).await?;
            (Rows::Nutrition(page.rows), page.total)
        }
        Resource::Measurements => {
            let page = client.list(resource, query).await?;
            (Rows::Measurements(page.rows), page.total)
        }
    };
    Ok((rows, total))
}

fn failed(screen: Option<Screen>, seq: Option<u64>, e: ApiError) -> FetchOutcome {
    error!("{:?}: {}", screen, e);
    if let Some(body) = e.body() {
        debug!("offending response body: {}", body);
    }
    FetchOutcome::Failed { screen, seq, message: e.user_message() }
}
