//! Graph editor boundary
//!
//! The controller never draws anything itself. It hands marshalled
//! scenarios and status changes to an [`EditorAdapter`], which owns the
//! actual presentation (the console front end, or a recorder in tests).

pub mod console;
pub mod marshal;
pub mod recording;

pub use console::ConsoleEditor;
pub use marshal::{marshal_scenario, EditorScenario, EditorVertex};
pub use recording::{EditorEvent, RecordingEditor};

use crate::session::StepBounds;

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Transient message for the user (toast, status line)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Presentation side of the debugger
///
/// Methods take `&self`; implementations keep their own interior state so
/// the controller can share one adapter across overlapping operations.
pub trait EditorAdapter: Send + Sync {
    /// Lock or unlock graph editing
    fn set_readonly(&self, readonly: bool);

    /// Debug session ended: go back to the editable graph view
    fn enter_edit_mode(&self);

    /// The session moved to `bounds.current`
    fn superstep_changed(&self, bounds: StepBounds);

    /// Replace the displayed graph with `scenario`
    fn build_graph(&self, scenario: &EditorScenario);

    /// Add new vertices from `scenario` and refresh the data of existing ones
    fn apply_scenario(&self, scenario: &EditorScenario);

    fn show_preloader(&self);

    fn hide_preloader(&self);

    fn notify(&self, notice: Notice);
}
