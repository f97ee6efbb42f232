//! Conversion from cached scenarios to what the graph editor displays
//!
//! The editor supports several values per vertex while the debugger server
//! reports a single `vertexValue`, so each value is wrapped into a
//! one-element list (empty when the server sent none).

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::scenario::{Scenario, VertexRecord};

/// One vertex as the editor displays it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorVertex {
    pub id: String,
    pub vertex_values: Vec<Value>,
    /// False for vertices carried over from an earlier superstep
    pub enabled: bool,
    pub messages_sent: BTreeMap<String, Value>,
    pub messages_received: BTreeMap<String, Value>,
    pub edge_values: BTreeMap<String, Value>,
}

impl EditorVertex {
    fn from_record(id: &str, record: &VertexRecord) -> Self {
        Self {
            id: id.to_string(),
            vertex_values: record.vertex_value.iter().cloned().collect(),
            enabled: record.is_traced(),
            messages_sent: record.messages_sent.clone(),
            messages_received: record.messages_received.clone(),
            edge_values: record.edge_values.clone(),
        }
    }
}

/// Scenario in editor form, vertices ordered by id
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditorScenario {
    pub vertices: Vec<EditorVertex>,
}

impl EditorScenario {
    pub fn get(&self, vertex_id: &str) -> Option<&EditorVertex> {
        self.vertices.iter().find(|vertex| vertex.id == vertex_id)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

pub fn marshal_scenario(scenario: &Scenario) -> EditorScenario {
    EditorScenario {
        vertices: scenario
            .iter()
            .map(|(id, record)| EditorVertex::from_record(id, record))
            .collect(),
    }
}
