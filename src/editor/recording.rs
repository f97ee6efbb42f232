//! Editor adapter that records every call, for assertions in tests

use std::sync::Arc;

use parking_lot::Mutex;

use crate::editor::{EditorAdapter, EditorScenario, Notice, NoticeLevel};
use crate::session::StepBounds;

/// Call received by a [`RecordingEditor`]
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    Readonly(bool),
    EditMode,
    SuperstepChanged(StepBounds),
    BuildGraph(EditorScenario),
    ApplyScenario(EditorScenario),
    ShowPreloader,
    HidePreloader,
    Notice(Notice),
}

/// [`EditorAdapter`] capturing calls instead of rendering them
#[derive(Clone, Default)]
pub struct RecordingEditor {
    events: Arc<Mutex<Vec<EditorEvent>>>,
}

impl RecordingEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all captured events
    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.lock().clone()
    }

    /// Drop captured events
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Last scenario handed over, whether built or applied
    pub fn last_scenario(&self) -> Option<EditorScenario> {
        self.events.lock().iter().rev().find_map(|event| match event {
            EditorEvent::BuildGraph(scenario) | EditorEvent::ApplyScenario(scenario) => {
                Some(scenario.clone())
            }
            _ => None,
        })
    }

    /// Notices of the given level, in order
    pub fn notices(&self, level: NoticeLevel) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                EditorEvent::Notice(notice) if notice.level == level => Some(notice.text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Whether the preloader is currently shown, going by the last
    /// show or hide call
    pub fn preloader_visible(&self) -> bool {
        self.events
            .lock()
            .iter()
            .rev()
            .find_map(|event| match event {
                EditorEvent::ShowPreloader => Some(true),
                EditorEvent::HidePreloader => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Whether editing is currently locked
    pub fn is_readonly(&self) -> bool {
        self.events
            .lock()
            .iter()
            .rev()
            .find_map(|event| match event {
                EditorEvent::Readonly(readonly) => Some(*readonly),
                _ => None,
            })
            .unwrap_or(false)
    }

    fn record(&self, event: EditorEvent) {
        self.events.lock().push(event);
    }
}

impl EditorAdapter for RecordingEditor {
    fn set_readonly(&self, readonly: bool) {
        self.record(EditorEvent::Readonly(readonly));
    }

    fn enter_edit_mode(&self) {
        self.record(EditorEvent::EditMode);
    }

    fn superstep_changed(&self, bounds: StepBounds) {
        self.record(EditorEvent::SuperstepChanged(bounds));
    }

    fn build_graph(&self, scenario: &EditorScenario) {
        self.record(EditorEvent::BuildGraph(scenario.clone()));
    }

    fn apply_scenario(&self, scenario: &EditorScenario) {
        self.record(EditorEvent::ApplyScenario(scenario.clone()));
    }

    fn show_preloader(&self) {
        self.record(EditorEvent::ShowPreloader);
    }

    fn hide_preloader(&self) {
        self.record(EditorEvent::HidePreloader);
    }

    fn notify(&self, notice: Notice) {
        self.record(EditorEvent::Notice(notice));
    }
}
