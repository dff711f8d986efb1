use crossterm::event::KeyCode;
use log::warn;

use crate::config::{reset_config, save_config};
use crate::table::TableAction;
use crate::types::{App, InputMode, NotificationKind, Screen};

/// Handle a key press. Returns `true` when the application should quit.
pub fn handle_key_event(app: &mut App, key: KeyCode) -> bool {
    match app.mode {
        InputMode::Search(_) => {
            handle_search_keys(app, key);
            false
        }
        InputMode::ConfirmDelete { .. } => {
            handle_confirm_keys(app, key);
            false
        }
        InputMode::Normal => match app.screen {
            Screen::Settings => handle_settings_keys(app, key),
            Screen::Reports => handle_global_keys(app, key),
            _ => handle_list_keys(app, key),
        },
    }
}

/// Keys shared by every screen in normal mode.
fn handle_global_keys(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') => return true,
        KeyCode::Tab => app.switch_screen(app.screen.next()),
        KeyCode::BackTab => app.switch_screen(app.screen.prev()),
        KeyCode::Char(c @ '1'..='7') => {
            let index = c as usize - '1' as usize;
            if let Some(screen) = Screen::from_index(index) {
                app.switch_screen(screen);
            }
        }
        KeyCode::F(5) | KeyCode::Char('R') => app.refresh(app.screen),
        KeyCode::Esc => app.notification = None,
        _ => {}
    }
    false
}

fn handle_list_keys(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.dispatch(TableAction::CursorUp),
        KeyCode::Down | KeyCode::Char('j') => app.dispatch(TableAction::CursorDown),
        KeyCode::Left | KeyCode::Char('h') => app.dispatch(TableAction::PrevPage),
        KeyCode::Right | KeyCode::Char('l') => app.dispatch(TableAction::NextPage),
        KeyCode::Home => app.dispatch(TableAction::FirstPage),
        KeyCode::End => app.dispatch(TableAction::LastPage),
        KeyCode::Char('/') => app.begin_search(),
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char('o') => app.flip_sort(),
        KeyCode::Char(' ') => {
            let id = app.table(app.screen).and_then(|t| t.highlighted_id());
            if let Some(id) = id {
                app.dispatch(TableAction::ToggleRow(id));
            }
        }
        KeyCode::Char('a') => app.dispatch(TableAction::ToggleAll),
        KeyCode::Char('n') => app.dispatch(TableAction::SelectNone),
        KeyCode::Char('d') => app.request_delete(),
        KeyCode::Char('t') => app.toggle_student_active(),
        _ => return handle_global_keys(app, key),
    }
    false
}

fn handle_search_keys(app: &mut App, key: KeyCode) {
    let InputMode::Search(term) = &mut app.mode else { return };
    match key {
        KeyCode::Char(c) => term.push(c),
        KeyCode::Backspace => {
            term.pop();
        }
        KeyCode::Enter => {
            let term = std::mem::take(term);
            app.apply_search(term.trim().to_string());
        }
        KeyCode::Esc => app.cancel_prompt(),
        _ => {}
    }
}

fn handle_confirm_keys(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('y') | KeyCode::Char('s') | KeyCode::Enter => app.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Esc => app.cancel_prompt(),
        _ => {}
    }
}

fn handle_settings_keys(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Up => app.settings_up(),
        KeyCode::Down => app.settings_down(),
        KeyCode::Left => app.settings_adjust(false),
        KeyCode::Right => app.settings_adjust(true),
        KeyCode::Char('w') => match save_config(&app.config) {
            Ok(()) => {
                app.settings_saved_locally();
                app.notify(NotificationKind::Success, "✅ Ajustes guardados.");
            }
            Err(e) => {
                warn!("could not save config: {}", e);
                app.notify(NotificationKind::Error, format!("❌ No se pudo guardar: {}", e));
            }
        },
        KeyCode::Char('r') => match reset_config() {
            Ok(true) => {
                app.has_saved_config = false;
                app.notify(
                    NotificationKind::Success,
                    "✅ Configuración eliminada. Se usarán los valores por defecto al reiniciar.",
                );
            }
            Ok(false) => app.notify(NotificationKind::Info, "ℹ️ No hay configuración guardada."),
            Err(e) => app.notify(NotificationKind::Error, format!("❌ No se pudo eliminar: {}", e)),
        },
        _ => return handle_global_keys(app, key),
    }
    false
}
