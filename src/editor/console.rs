//! Plain-text editor adapter for the interactive console

use std::io::{self, Write};

use parking_lot::Mutex;
use serde_json::Value;

use crate::editor::{EditorAdapter, EditorScenario, EditorVertex, Notice, NoticeLevel};
use crate::session::StepBounds;

/// Writes the debugger state to a terminal (or any writer)
pub struct ConsoleEditor<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleEditor<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleEditor<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Consume the editor and return its writer
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn line(&self, text: &str) {
        let mut out = self.out.lock();
        // A closed terminal is not worth failing a debug step over
        if let Err(e) = writeln!(out, "{text}").and_then(|_| out.flush()) {
            tracing::debug!(error = %e, "Failed to write console output");
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One row per vertex: id, traced marker, value and message/edge counts
pub fn render_table(scenario: &EditorScenario) -> String {
    if scenario.is_empty() {
        return "(no vertices)".to_string();
    }

    let header = ["VERTEX", "TRACED", "VALUE", "SENT", "RECEIVED", "EDGES"];
    let rows: Vec<[String; 6]> = scenario
        .vertices
        .iter()
        .map(|vertex| {
            [
                vertex.id.clone(),
                if vertex.enabled { "*" } else { "" }.to_string(),
                vertex
                    .vertex_values
                    .iter()
                    .map(format_value)
                    .collect::<Vec<_>>()
                    .join(","),
                vertex.messages_sent.len().to_string(),
                vertex.messages_received.len().to_string(),
                vertex.edge_values.len().to_string(),
            ]
        })
        .collect();

    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let format_row = |cells: &[String]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(&header.map(String::from)[..])];
    lines.extend(rows.iter().map(|row| format_row(&row[..])));
    lines.join("\n")
}

/// Messages and edge values of one vertex
pub fn render_vertex(vertex: &EditorVertex) -> String {
    let mut lines = vec![format!(
        "Vertex {} ({})",
        vertex.id,
        if vertex.enabled { "traced" } else { "not traced" }
    )];
    let values: Vec<String> = vertex.vertex_values.iter().map(format_value).collect();
    lines.push(format!("  value: {}", values.join(", ")));

    let sections = [
        ("sent", &vertex.messages_sent),
        ("received", &vertex.messages_received),
        ("edge values", &vertex.edge_values),
    ];
    for (title, entries) in sections {
        lines.push(format!("  {title}:"));
        if entries.is_empty() {
            lines.push("    -".to_string());
        }
        for (peer, value) in entries {
            lines.push(format!("    {peer}: {}", format_value(value)));
        }
    }
    lines.join("\n")
}

impl<W: Write + Send> EditorAdapter for ConsoleEditor<W> {
    fn set_readonly(&self, readonly: bool) {
        if readonly {
            self.line("Graph is read-only while debugging");
        }
    }

    fn enter_edit_mode(&self) {
        self.line("Back in edit mode");
    }

    fn superstep_changed(&self, bounds: StepBounds) {
        let flag = |enabled: bool| if enabled { "on" } else { "off" };
        self.line(&format!(
            "Superstep {} of {} [prev: {}, next: {}]",
            bounds.current,
            bounds.max,
            flag(bounds.can_step_backward()),
            flag(bounds.can_step_forward())
        ));
    }

    fn build_graph(&self, scenario: &EditorScenario) {
        self.line(&render_table(scenario));
    }

    fn apply_scenario(&self, scenario: &EditorScenario) {
        self.line(&render_table(scenario));
    }

    fn show_preloader(&self) {
        self.line("Loading...");
    }

    fn hide_preloader(&self) {}

    fn notify(&self, notice: Notice) {
        let prefix = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warn",
            NoticeLevel::Error => "error",
        };
        self.line(&format!("[{prefix}] {}", notice.text));
    }
}
