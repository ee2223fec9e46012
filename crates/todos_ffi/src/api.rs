//! FFI use-case API for the mobile shell.
//!
//! # Responsibility
//! - Expose list read and add/edit/delete calls to Dart via FRB.
//! - Own the process-wide `TodoApp` the shell renders from.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Ignored mutations are reported as `ok=true, changed=false`.
//! - `ok=false` only when the app itself could not be opened.

use log::error;
use std::sync::{Mutex, OnceLock};
use todos_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppConfig, Change, IgnoreReason, Item, TodoApp, ABOUT_URL,
};

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();
static APP: Mutex<Option<TodoApp>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// External link the footer opens. The shell performs the navigation.
#[flutter_rust_bridge::frb(sync)]
pub fn about_url() -> String {
    ABOUT_URL.to_owned()
}

/// One row of the rendered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItemView {
    pub id: i64,
    pub text: String,
}

/// Full list snapshot for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListResponse {
    /// Items in display order.
    pub items: Vec<TodoItemView>,
    /// Empty on success, diagnostic text otherwise.
    pub message: String,
}

/// Result envelope for one list mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoActionResponse {
    /// Whether the call reached the list.
    pub ok: bool,
    /// Whether the list was mutated.
    pub changed: bool,
    /// Id of the added/edited/deleted item.
    pub item_id: Option<i64>,
    /// Human-readable outcome for diagnostics/UI.
    pub message: String,
}

impl TodoActionResponse {
    fn from_change(change: &Change) -> Self {
        let message = match change {
            Change::Added(_) => "Todo added.".to_string(),
            Change::Edited(_) => "Todo updated.".to_string(),
            Change::Deleted(_) => "Todo deleted.".to_string(),
            Change::Replaced { count } => format!("List replaced with {count} todo(s)."),
            Change::Ignored(IgnoreReason::EmptyText) => "Nothing to add: text is empty.".to_string(),
            Change::Ignored(IgnoreReason::UnknownId(id)) => format!("No todo with id {id}."),
        };
        Self {
            ok: true,
            changed: change.is_applied(),
            item_id: change.item_id(),
            message,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed: false,
            item_id: None,
            message: message.into(),
        }
    }
}

/// Returns the current list.
///
/// # FFI contract
/// - Sync call; opens the app on first use.
/// - Never panics; returns an empty list plus message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_list() -> TodoListResponse {
    match with_app(|app| app.items().iter().map(to_item_view).collect::<Vec<_>>()) {
        Ok(items) => TodoListResponse {
            items,
            message: String::new(),
        },
        Err(err) => TodoListResponse {
            items: Vec::new(),
            message: format!("todo_list failed: {err}"),
        },
    }
}

/// Appends a todo. Exactly-empty text is ignored.
///
/// The shell clears its input field after calling this, whatever the result.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_add(text: String) -> TodoActionResponse {
    mutate("todo_add", |app| app.add(text))
}

/// Replaces the text of one todo. Empty text is accepted.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_edit(id: i64, text: String) -> TodoActionResponse {
    mutate("todo_edit", |app| app.edit(id, text))
}

/// Removes one todo.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_delete(id: i64) -> TodoActionResponse {
    mutate("todo_delete", |app| app.delete(id))
}

/// Blocks until pending snapshot writes finish.
///
/// Intended for app-pause/background lifecycle callbacks.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_flush() -> bool {
    with_app(|app| app.flush()).unwrap_or(false)
}

fn mutate(operation: &str, f: impl FnOnce(&mut TodoApp) -> Change) -> TodoActionResponse {
    match with_app(f) {
        Ok(change) => TodoActionResponse::from_change(&change),
        Err(err) => TodoActionResponse::failure(format!("{operation} failed: {err}")),
    }
}

fn app_config() -> &'static AppConfig {
    APP_CONFIG.get_or_init(AppConfig::from_env)
}

fn with_app<R>(f: impl FnOnce(&mut TodoApp) -> R) -> Result<R, String> {
    let mut guard = APP
        .lock()
        .map_err(|_| "todo app state is poisoned".to_string())?;

    if guard.is_none() {
        let config = app_config();
        let app = TodoApp::open_at(&config.db_path).map_err(|err| {
            error!(
                "event=ffi_app_open module=ffi status=error db_path={} error={}",
                config.db_path.display(),
                err
            );
            format!("todo app open failed: {err}")
        })?;
        *guard = Some(app);
    }

    match guard.as_mut() {
        Some(app) => Ok(f(app)),
        None => Err("todo app is not available".to_string()),
    }
}

fn to_item_view(item: &Item) -> TodoItemView {
    TodoItemView {
        id: item.id,
        text: item.text.clone(),
    }
}
