use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::api::{ListQuery, Measurement, NutritionPlan, Payment, Product, ReportSummary, Resource, Student, UiSettings};
use crate::columns::{measurement_columns, nutrition_columns, payment_columns, product_columns, student_columns};
use crate::config::{clamp_page_size, Accent, SavedConfig, Settings, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use crate::table::{PaginationMode, TableAction, TableEvent, TableRow, TableState};
use crate::worker::{FetchOutcome, FetchRequest, Rows};

/// How long a notification stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// Number of editable options on the settings screen.
pub const SETTINGS_OPTIONS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Students,
    Payments,
    Products,
    Nutrition,
    Measurements,
    Reports,
    Settings,
}

impl Screen {
    pub const ALL: [Screen; 7] = [
        Screen::Students,
        Screen::Payments,
        Screen::Products,
        Screen::Nutrition,
        Screen::Measurements,
        Screen::Reports,
        Screen::Settings,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Students => "Alumnos",
            Screen::Payments => "Pagos",
            Screen::Products => "Productos",
            Screen::Nutrition => "Nutrición",
            Screen::Measurements => "Medidas",
            Screen::Reports => "Reportes",
            Screen::Settings => "Ajustes",
        }
    }

    pub fn index(self) -> usize {
        Screen::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Screen> {
        Screen::ALL.get(index).copied()
    }

    pub fn next(self) -> Screen {
        Screen::ALL[(self.index() + 1) % Screen::ALL.len()]
    }

    pub fn prev(self) -> Screen {
        Screen::ALL[(self.index() + Screen::ALL.len() - 1) % Screen::ALL.len()]
    }

    pub fn resource(self) -> Option<Resource> {
        match self {
            Screen::Students => Some(Resource::Students),
            Screen::Payments => Some(Resource::Payments),
            Screen::Products => Some(Resource::Products),
            Screen::Nutrition => Some(Resource::NutritionPlans),
            Screen::Measurements => Some(Resource::Measurements),
            Screen::Reports | Screen::Settings => None,
        }
    }

    /// Large, growing collections are paginated by the backend.
    pub fn default_mode(self) -> PaginationMode {
        match self {
            Screen::Students | Screen::Payments => PaginationMode::Server,
            _ => PaginationMode::Client,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    /// Editing the search term; the table keeps its previous term until Enter.
    Search(String),
    ConfirmDelete { screen: Screen, ids: Vec<u64> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub at: Instant,
}

/// The table operations the UI needs, independent of the row type.
pub trait ListControl {
    fn apply(&mut self, action: TableAction<u64>) -> Vec<TableEvent<u64>>;
    fn query(&self) -> ListQuery;
    fn mark_loading(&mut self, loading: bool);
    fn highlighted_id(&self) -> Option<u64>;
    fn selected_ids(&self) -> Vec<u64>;
    fn sortable_keys(&self) -> Vec<&'static str>;
    fn sort_field(&self) -> Option<String>;
    fn search_term(&self) -> String;
    fn resize(&mut self, page_size: usize);
}

impl<T: TableRow<Id = u64>> ListControl for TableState<T> {
    fn apply(&mut self, action: TableAction<u64>) -> Vec<TableEvent<u64>> {
        self.dispatch(action)
    }

    fn query(&self) -> ListQuery {
        ListQuery::for_table(self)
    }

    fn mark_loading(&mut self, loading: bool) {
        self.set_loading(loading);
    }

    fn highlighted_id(&self) -> Option<u64> {
        self.highlighted().and_then(|row| row.id())
    }

    fn selected_ids(&self) -> Vec<u64> {
        self.selection().to_vec()
    }

    fn sortable_keys(&self) -> Vec<&'static str> {
        self.columns().iter().filter(|c| c.sortable).map(|c| c.key).collect()
    }

    fn sort_field(&self) -> Option<String> {
        self.sort().map(|s| s.field.clone())
    }

    fn search_term(&self) -> String {
        self.search().to_string()
    }

    fn resize(&mut self, page_size: usize) {
        self.set_page_size(page_size);
    }
}

pub struct App {
    pub screen: Screen,
    pub mode: InputMode,
    pub students: TableState<Student>,
    pub payments: TableState<Payment>,
    pub products: TableState<Product>,
    pub nutrition: TableState<NutritionPlan>,
    pub measurements: TableState<Measurement>,
    pub report: Option<ReportSummary>,
    pub report_loading: bool,
    /// Working copy edited on the settings screen.
    pub config: SavedConfig,
    pub has_saved_config: bool,
    pub settings_selected: usize,
    pub api_url: String,
    pub notification: Option<Notification>,
    /// Ids reported by the last selection change, per screen. Bulk actions use these.
    pub bulk_targets: HashMap<Screen, Vec<u64>>,
    outbox: Vec<FetchRequest>,
    latest_seq: HashMap<Screen, u64>,
    next_seq: u64,
    visited: HashSet<Screen>,
}

impl App {
    pub fn new(settings: &Settings, saved: Option<SavedConfig>) -> Self {
        let mode = |screen: Screen| {
            if settings.force_client_side {
                PaginationMode::Client
            } else {
                screen.default_mode()
            }
        };
        let page_size = settings.page_size;
        let has_saved_config = saved.is_some();
        let mut config = saved.unwrap_or_default();
        config.page_size = page_size;
        config.accent = settings.accent;

        App {
            screen: settings.start_screen,
            mode: InputMode::Normal,
            students: TableState::new(student_columns(), mode(Screen::Students), page_size),
            payments: TableState::new(payment_columns(), mode(Screen::Payments), page_size),
            products: TableState::new(product_columns(), mode(Screen::Products), page_size),
            nutrition: TableState::new(nutrition_columns(), mode(Screen::Nutrition), page_size),
            measurements: TableState::new(measurement_columns(), mode(Screen::Measurements), page_size),
            report: None,
            report_loading: false,
            config,
            has_saved_config,
            settings_selected: 0,
            api_url: settings.api_url.clone(),
            notification: None,
            bulk_targets: HashMap::new(),
            outbox: Vec::new(),
            latest_seq: HashMap::new(),
            next_seq: 0,
            visited: HashSet::new(),
        }
    }

    pub fn accent(&self) -> Accent {
        self.config.accent
    }

    pub fn table(&self, screen: Screen) -> Option<&dyn ListControl> {
        match screen {
            Screen::Students => Some(&self.students),
            Screen::Payments => Some(&self.payments),
            Screen::Products => Some(&self.products),
            Screen::Nutrition => Some(&self.nutrition),
            Screen::Measurements => Some(&self.measurements),
            Screen::Reports | Screen::Settings => None,
        }
    }

    pub fn table_mut(&mut self, screen: Screen) -> Option<&mut dyn ListControl> {
        match screen {
            Screen::Students => Some(&mut self.students),
            Screen::Payments => Some(&mut self.payments),
            Screen::Products => Some(&mut self.products),
            Screen::Nutrition => Some(&mut self.nutrition),
            Screen::Measurements => Some(&mut self.measurements),
            Screen::Reports | Screen::Settings => None,
        }
    }

    /// Requests queued since the last call.
    pub fn take_requests(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.outbox)
    }

    pub fn start(&mut self) {
        self.outbox.push(FetchRequest::LoadSettings);
        self.switch_screen(self.screen);
    }

    /// Show `screen`, fetching it the first time it is opened.
    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.mode = InputMode::Normal;
        if self.visited.insert(screen) {
            self.refresh(screen);
        }
    }

    /// Refetch whatever `screen` shows.
    pub fn refresh(&mut self, screen: Screen) {
        match screen {
            Screen::Reports => {
                self.report_loading = true;
                self.outbox.push(FetchRequest::Report);
            }
            Screen::Settings => {}
            _ => {
                self.next_seq += 1;
                let seq = self.next_seq;
                self.latest_seq.insert(screen, seq);
                if let Some(table) = self.table_mut(screen) {
                    table.mark_loading(true);
                    let query = table.query();
                    self.outbox.push(FetchRequest::List { screen, seq, query });
                }
            }
        }
    }

    /// Dispatch a table action on the current screen and react to its events.
    pub fn dispatch(&mut self, action: TableAction<u64>) {
        let screen = self.screen;
        let events = match self.table_mut(screen) {
            Some(table) => table.apply(action),
            None => return,
        };
        self.handle_table_events(screen, events);
    }

    pub fn handle_table_events(&mut self, screen: Screen, events: Vec<TableEvent<u64>>) {
        let mut refetch = false;
        for event in events {
            match event {
                TableEvent::PageChanged(page) => {
                    debug!("{:?}: page {}", screen, page);
                    refetch = true;
                }
                TableEvent::SortChanged { field, direction } => {
                    debug!("{:?}: sort {} {}", screen, field, direction.as_str());
                    refetch = true;
                }
                TableEvent::SearchChanged(term) => {
                    debug!("{:?}: search {:?}", screen, term);
                    refetch = true;
                }
                TableEvent::SelectionChanged(ids) => {
                    self.bulk_targets.insert(screen, ids);
                }
            }
        }
        if refetch {
            self.refresh(screen);
        }
    }

    /// Cycle the sort to the next sortable column.
    pub fn cycle_sort(&mut self) {
        let Some(table) = self.table(self.screen) else { return };
        let keys = table.sortable_keys();
        if keys.is_empty() {
            return;
        }
        let next = match table.sort_field() {
            Some(field) => {
                let pos = keys.iter().position(|k| *k == field).map(|p| p + 1).unwrap_or(0);
                keys[pos % keys.len()]
            }
            None => keys[0],
        };
        self.dispatch(TableAction::SetSort(next.to_string()));
    }

    /// Flip the direction of the current sort.
    pub fn flip_sort(&mut self) {
        let Some(table) = self.table(self.screen) else { return };
        let field = table
            .sort_field()
            .or_else(|| table.sortable_keys().first().map(|k| k.to_string()));
        if let Some(field) = field {
            self.dispatch(TableAction::SetSort(field));
        }
    }

    pub fn begin_search(&mut self) {
        if let Some(table) = self.table(self.screen) {
            self.mode = InputMode::Search(table.search_term());
        }
    }

    pub fn apply_search(&mut self, term: String) {
        self.mode = InputMode::Normal;
        self.dispatch(TableAction::SetSearch(term));
    }

    /// Ask to delete the selection, or the highlighted row if nothing is selected.
    pub fn request_delete(&mut self) {
        let screen = self.screen;
        let Some(table) = self.table(screen) else { return };
        let mut ids = self.bulk_targets.get(&screen).cloned().unwrap_or_default();
        if ids.is_empty() {
            ids.extend(table.highlighted_id());
        }
        if ids.is_empty() {
            self.notify(NotificationKind::Info, "Nada seleccionado");
            return;
        }
        self.mode = InputMode::ConfirmDelete { screen, ids };
    }

    pub fn confirm_delete(&mut self) {
        if let InputMode::ConfirmDelete { screen, ids } = std::mem::replace(&mut self.mode, InputMode::Normal) {
            info!("deleting {} rows from {:?}", ids.len(), screen);
            self.outbox.push(FetchRequest::Delete { screen, ids });
        }
    }

    pub fn cancel_prompt(&mut self) {
        self.mode = InputMode::Normal;
    }

    /// Flip the highlighted student between active and inactive.
    pub fn toggle_student_active(&mut self) {
        if self.screen != Screen::Students {
            return;
        }
        if let Some(student) = self.students.highlighted() {
            let request = FetchRequest::SetActive { id: student.id, active: !student.active };
            self.outbox.push(request);
        }
    }

    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.notification = Some(Notification { message: message.into(), kind, at: Instant::now() });
    }

    pub fn expire_notification(&mut self, now: Instant) {
        if let Some(n) = &self.notification {
            if now.duration_since(n.at) > NOTIFICATION_TTL {
                self.notification = None;
            }
        }
    }

    pub fn apply_outcome(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Listed { screen, seq, rows, total } => {
                if self.latest_seq.get(&screen) != Some(&seq) {
                    debug!("dropping stale response {} for {:?}", seq, screen);
                    return;
                }
                let moved = match rows {
                    Rows::Students(rows) => self.students.set_data(rows, total),
                    Rows::Payments(rows) => self.payments.set_data(rows, total),
                    Rows::Products(rows) => self.products.set_data(rows, total),
                    Rows::Nutrition(rows) => self.nutrition.set_data(rows, total),
                    Rows::Measurements(rows) => self.measurements.set_data(rows, total),
                };
                if let Some(table) = self.table_mut(screen) {
                    table.mark_loading(false);
                }
                // The page shrank away under us, fetch the one we landed on.
                if let Some(event) = moved {
                    self.handle_table_events(screen, vec![event]);
                }
            }
            FetchOutcome::Deleted { screen, deleted, error } => {
                if !deleted.is_empty() {
                    self.notify(NotificationKind::Success, format!("{} registro(s) eliminados", deleted.len()));
                    let remaining: Vec<u64> = self
                        .table(screen)
                        .map(|t| t.selected_ids())
                        .unwrap_or_default()
                        .into_iter()
                        .filter(|id| !deleted.contains(id))
                        .collect();
                    if let Some(table) = self.table_mut(screen) {
                        let events = table.apply(TableAction::ReplaceSelection(remaining));
                        self.handle_table_events(screen, events);
                    }
                    self.refresh(screen);
                }
                if let Some(message) = error {
                    self.notify(NotificationKind::Error, message);
                }
            }
            FetchOutcome::ActiveChanged { id, active } => {
                let label = if active { "activado" } else { "desactivado" };
                self.notify(NotificationKind::Success, format!("Alumno {} {}", id, label));
                self.refresh(Screen::Students);
            }
            FetchOutcome::Report(summary) => {
                self.report = Some(summary);
                self.report_loading = false;
            }
            FetchOutcome::RemoteSettings(remote) => {
                if self.has_saved_config {
                    debug!("keeping local settings over backend settings");
                } else {
                    self.apply_ui_settings(&remote);
                }
            }
            FetchOutcome::SettingsSaved => {
                self.notify(NotificationKind::Success, "Ajustes guardados");
            }
            FetchOutcome::Failed { screen, seq, message } => {
                warn!("request failed for {:?}: {}", screen, message);
                if let (Some(screen), Some(seq)) = (screen, seq) {
                    if self.latest_seq.get(&screen) != Some(&seq) {
                        debug!("ignoring failure of stale request {} for {:?}", seq, screen);
                        return;
                    }
                }
                match screen {
                    Some(Screen::Reports) => self.report_loading = false,
                    Some(screen) => {
                        if let Some(table) = self.table_mut(screen) {
                            table.mark_loading(false);
                        }
                    }
                    None => {}
                }
                self.notify(NotificationKind::Error, message);
            }
        }
    }

    /// Undo the loading state of a request that never reached the worker.
    pub fn request_dropped(&mut self, request: &FetchRequest) {
        match request {
            FetchRequest::List { screen, seq, .. } => {
                if self.latest_seq.get(screen) == Some(seq) {
                    if let Some(table) = self.table_mut(*screen) {
                        table.mark_loading(false);
                    }
                }
            }
            FetchRequest::Report => self.report_loading = false,
            _ => {}
        }
    }

    fn apply_ui_settings(&mut self, remote: &UiSettings) {
        if let Some(accent) = Accent::from_name(&remote.accent) {
            self.config.accent = accent;
        }
        let page_size = clamp_page_size(remote.page_size);
        if page_size != self.config.page_size {
            self.set_page_size(page_size);
        }
    }

    /// Resize every table and refetch the ones already shown.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.config.page_size = page_size;
        let visited: Vec<Screen> = Screen::ALL.into_iter().filter(|s| self.visited.contains(s)).collect();
        for screen in Screen::ALL {
            if let Some(table) = self.table_mut(screen) {
                table.resize(page_size);
            }
        }
        for screen in visited {
            if screen.resource().is_some() {
                self.refresh(screen);
            }
        }
    }

    pub fn settings_up(&mut self) {
        self.settings_selected = self.settings_selected.saturating_sub(1);
    }

    pub fn settings_down(&mut self) {
        if self.settings_selected + 1 < SETTINGS_OPTIONS {
            self.settings_selected += 1;
        }
    }

    /// Adjust the selected setting one step forward (`true`) or back.
    pub fn settings_adjust(&mut self, forward: bool) {
        match self.settings_selected {
            0 => {
                let size = self.config.page_size;
                let size = if forward {
                    (size + 5).min(MAX_PAGE_SIZE)
                } else {
                    size.saturating_sub(5).max(MIN_PAGE_SIZE)
                };
                if size != self.config.page_size {
                    self.set_page_size(size);
                }
            }
            1 => {
                self.config.accent = if forward { self.config.accent.next() } else { self.config.accent.prev() };
            }
            2 => {
                self.config.force_client_side = !self.config.force_client_side;
            }
            3 => {
                let current = self.config.start_screen;
                self.config.start_screen = if forward { current.next() } else { current.prev() };
            }
            _ => {}
        }
    }

    pub fn ui_settings(&self) -> UiSettings {
        UiSettings { accent: self.config.accent.name().to_string(), page_size: self.config.page_size }
    }

    /// Queue the backend copy of the settings after a local save.
    pub fn settings_saved_locally(&mut self) {
        self.has_saved_config = true;
        let settings = self.ui_settings();
        self.outbox.push(FetchRequest::SaveSettings(settings));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Cli;

    fn app() -> App {
        let settings = Settings::resolve(&Cli::default(), None);
        App::new(&settings, None)
    }

    fn student(id: u64, name: &str) -> Student {
        Student {
            id,
            name: name.into(),
            email: None,
            phone: None,
            plan: None,
            active: true,
            joined_at: None,
        }
    }

    fn list_seq(requests: &[FetchRequest], screen: Screen) -> Option<u64> {
        requests.iter().find_map(|r| match r {
            FetchRequest::List { screen: s, seq, .. } if *s == screen => Some(*seq),
            _ => None,
        })
    }

    #[test]
    fn start_fetches_settings_and_first_screen() {
        let mut app = app();
        app.start();
        let requests = app.take_requests();
        assert!(matches!(requests[0], FetchRequest::LoadSettings));
        assert!(list_seq(&requests, Screen::Students).is_some());
        assert!(app.students.is_loading());
        assert!(app.take_requests().is_empty());
    }

    #[test]
    fn screens_are_fetched_once_on_first_visit() {
        let mut app = app();
        app.switch_screen(Screen::Products);
        assert_eq!(app.take_requests().len(), 1);
        app.switch_screen(Screen::Students);
        app.switch_screen(Screen::Products);
        assert_eq!(app.take_requests().len(), 1);
    }

    #[test]
    fn server_page_change_refetches_and_stale_responses_are_dropped() {
        let mut app = app();
        app.start();
        let first = list_seq(&app.take_requests(), Screen::Students).unwrap();

        app.apply_outcome(FetchOutcome::Listed {
            screen: Screen::Students,
            seq: first,
            rows: Rows::Students((1..=10).map(|i| student(i, "A")).collect()),
            total: 35,
        });
        assert!(!app.students.is_loading());

        app.dispatch(TableAction::NextPage);
        let requests = app.take_requests();
        let second = list_seq(&requests, Screen::Students).unwrap();
        match &requests[0] {
            FetchRequest::List { query, .. } => assert_eq!(query.page, Some(2)),
            other => panic!("unexpected request {:?}", other),
        }

        // A late answer to the first request must not overwrite page two.
        app.apply_outcome(FetchOutcome::Listed {
            screen: Screen::Students,
            seq: first,
            rows: Rows::Students(vec![student(99, "Viejo")]),
            total: 1,
        });
        assert!(app.students.is_loading());
        assert_eq!(app.students.data().len(), 10);

        app.apply_outcome(FetchOutcome::Listed {
            screen: Screen::Students,
            seq: second,
            rows: Rows::Students((11..=20).map(|i| student(i, "B")).collect()),
            total: 35,
        });
        assert_eq!(app.students.data()[0].id, 11);
    }

    #[test]
    fn client_side_interactions_do_not_refetch() {
        let mut app = app();
        app.switch_screen(Screen::Products);
        app.take_requests();
        app.dispatch(TableAction::SetSearch("whey".into()));
        app.dispatch(TableAction::NextPage);
        assert!(app.take_requests().is_empty());
    }

    #[test]
    fn delete_prefers_selection_then_highlight() {
        let mut app = app();
        app.start();
        let seq = list_seq(&app.take_requests(), Screen::Students).unwrap();
        app.apply_outcome(FetchOutcome::Listed {
            screen: Screen::Students,
            seq,
            rows: Rows::Students(vec![student(1, "Ana"), student(2, "Beto")]),
            total: 2,
        });

        app.request_delete();
        assert_eq!(app.mode, InputMode::ConfirmDelete { screen: Screen::Students, ids: vec![1] });
        app.cancel_prompt();

        app.dispatch(TableAction::ToggleAll);
        app.request_delete();
        assert_eq!(app.mode, InputMode::ConfirmDelete { screen: Screen::Students, ids: vec![1, 2] });

        app.confirm_delete();
        let requests = app.take_requests();
        assert!(matches!(&requests[0], FetchRequest::Delete { ids, .. } if ids == &vec![1, 2]));
    }

    #[test]
    fn successful_delete_prunes_selection_and_refetches() {
        let mut app = app();
        app.start();
        app.take_requests();
        app.dispatch(TableAction::ToggleRow(1));
        app.dispatch(TableAction::ToggleRow(2));

        app.apply_outcome(FetchOutcome::Deleted { screen: Screen::Students, deleted: vec![1], error: None });
        assert_eq!(app.students.selection(), &[2]);
        assert_eq!(app.bulk_targets.get(&Screen::Students), Some(&vec![2]));
        assert!(list_seq(&app.take_requests(), Screen::Students).is_some());
    }

    #[test]
    fn failures_clear_loading_and_notify() {
        let mut app = app();
        app.start();
        app.take_requests();
        app.apply_outcome(FetchOutcome::Failed {
            screen: Some(Screen::Students),
            seq: None,
            message: "No se pudo conectar con el servidor".into(),
        });
        assert!(!app.students.is_loading());
        let notification = app.notification.as_ref().unwrap();
        assert_eq!(notification.kind, NotificationKind::Error);
    }

    #[test]
    fn failure_of_superseded_list_keeps_loading() {
        let mut app = app();
        app.start();
        let first = list_seq(&app.take_requests(), Screen::Students).unwrap();
        app.refresh(Screen::Students);
        let second = list_seq(&app.take_requests(), Screen::Students).unwrap();

        app.apply_outcome(FetchOutcome::Failed {
            screen: Some(Screen::Students),
            seq: Some(first),
            message: "timeout".into(),
        });
        assert!(app.students.is_loading());
        assert!(app.notification.is_none());

        app.apply_outcome(FetchOutcome::Failed {
            screen: Some(Screen::Students),
            seq: Some(second),
            message: "timeout".into(),
        });
        assert!(!app.students.is_loading());
    }

    #[test]
    fn dropped_request_clears_loading() {
        let mut app = app();
        app.start();
        let requests = app.take_requests();
        assert!(app.students.is_loading());
        for request in &requests {
            app.request_dropped(request);
        }
        assert!(!app.students.is_loading());

        app.switch_screen(Screen::Reports);
        assert!(app.report_loading);
        for request in &app.take_requests() {
            app.request_dropped(request);
        }
        assert!(!app.report_loading);
    }

    #[test]
    fn shrunk_server_total_fetches_the_clamped_page() {
        let mut app = app();
        app.start();
        let seq = list_seq(&app.take_requests(), Screen::Students).unwrap();
        let page: Vec<Student> = (1..=10).map(|id| student(id, "Ana")).collect();
        app.apply_outcome(FetchOutcome::Listed { screen: Screen::Students, seq, rows: Rows::Students(page), total: 21 });

        app.dispatch(TableAction::LastPage);
        let seq = list_seq(&app.take_requests(), Screen::Students).unwrap();
        assert_eq!(app.students.current_page(), 3);

        app.apply_outcome(FetchOutcome::Listed {
            screen: Screen::Students,
            seq,
            rows: Rows::Students(Vec::new()),
            total: 20,
        });
        assert_eq!(app.students.current_page(), 2);
        assert!(app.students.is_loading());
        let requests = app.take_requests();
        match &requests[..] {
            [FetchRequest::List { screen: Screen::Students, query, .. }] => assert_eq!(query.page, Some(2)),
            other => panic!("expected a refetch of page 2, got {:?}", other),
        }
    }

    #[test]
    fn notifications_expire() {
        let mut app = app();
        app.notify(NotificationKind::Info, "hola");
        let at = app.notification.as_ref().unwrap().at;
        app.expire_notification(at + Duration::from_secs(1));
        assert!(app.notification.is_some());
        app.expire_notification(at + NOTIFICATION_TTL + Duration::from_millis(1));
        assert!(app.notification.is_none());
    }

    #[test]
    fn sort_cycles_through_sortable_columns() {
        let mut app = app();
        app.start();
        app.take_requests();
        app.cycle_sort();
        assert_eq!(app.students.sort().map(|s| s.field.as_str()), Some("id"));
        app.cycle_sort();
        assert_eq!(app.students.sort().map(|s| s.field.as_str()), Some("name"));
        app.flip_sort();
        assert_eq!(app.students.sort().map(|s| s.direction.as_str()), Some("desc"));
        assert_eq!(app.take_requests().len(), 3);
    }

    #[test]
    fn page_size_setting_resizes_tables() {
        let mut app = app();
        app.start();
        app.take_requests();
        app.settings_adjust(true);
        assert_eq!(app.config.page_size, 15);
        assert_eq!(app.products.page_size(), 15);
        // Only the visited screen is refetched.
        let requests = app.take_requests();
        assert_eq!(requests.len(), 1);
        assert!(list_seq(&requests, Screen::Students).is_some());
    }

    #[test]
    fn remote_settings_apply_only_without_local_config() {
        let mut app = app();
        app.apply_outcome(FetchOutcome::RemoteSettings(UiSettings { accent: "green".into(), page_size: 20 }));
        assert_eq!(app.accent(), Accent::Green);
        assert_eq!(app.config.page_size, 20);

        let settings = Settings::resolve(&Cli::default(), None);
        let mut app = App::new(&settings, Some(SavedConfig::default()));
        app.apply_outcome(FetchOutcome::RemoteSettings(UiSettings { accent: "green".into(), page_size: 20 }));
        assert_eq!(app.accent(), Accent::Cyan);
    }

    #[test]
    fn forced_client_side_applies_to_every_table() {
        let cli = Cli { client_side: true, ..Cli::default() };
        let app = App::new(&Settings::resolve(&cli, None), None);
        assert_eq!(app.students.mode(), PaginationMode::Client);
        assert_eq!(app.payments.mode(), PaginationMode::Client);
    }
}
