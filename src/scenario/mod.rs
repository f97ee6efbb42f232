//! Graph state snapshots
//!
//! A `Scenario` is the full per-vertex state of the job at one superstep.
//! The debugger server only returns the vertices traced during a superstep,
//! so full scenarios are rebuilt by merging those sparse deltas on top of
//! the previous superstep (see [`merge`]).

mod merge;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use merge::merge;

/// State of a single vertex at one superstep
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexRecord {
    /// Vertex value, if the trace recorded one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertex_value: Option<Value>,
    /// Messages sent by this vertex, keyed by destination vertex id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub messages_sent: BTreeMap<String, Value>,
    /// Messages received by this vertex, keyed by source vertex id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub messages_received: BTreeMap<String, Value>,
    /// Outgoing edge values, keyed by neighbor vertex id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub edge_values: BTreeMap<String, Value>,
    /// Whether this vertex was traced in the superstep that produced the record.
    ///
    /// `None` means the record came straight from the server and was never
    /// merged; such vertices count as traced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debugged: Option<bool>,
    /// Fields the server sent that this crate does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VertexRecord {
    /// Record carrying only a vertex value
    pub fn with_value(value: impl Into<Value>) -> Self {
        Self {
            vertex_value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Whether the vertex should be shown as active for this superstep
    pub fn is_traced(&self) -> bool {
        self.debugged != Some(false)
    }

    /// Copy of this record with the debugged flag forced to `debugged`
    pub fn marked(&self, debugged: bool) -> Self {
        Self {
            debugged: Some(debugged),
            ..self.clone()
        }
    }
}

/// Full reconstructed graph state at one superstep, keyed by vertex id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scenario(BTreeMap<String, VertexRecord>);

/// Sparse per-superstep state as returned by the debugger server.
///
/// Same shape as a [`Scenario`] but only covers traced vertices.
pub type Delta = Scenario;

impl Scenario {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, vertex_id: &str) -> Option<&VertexRecord> {
        self.0.get(vertex_id)
    }

    pub fn contains(&self, vertex_id: &str) -> bool {
        self.0.contains_key(vertex_id)
    }

    /// Insert or replace the record for `vertex_id`
    pub fn insert(&mut self, vertex_id: impl Into<String>, record: VertexRecord) {
        self.0.insert(vertex_id.into(), record);
    }

    /// Builder-style [`Scenario::insert`]
    pub fn with_vertex(mut self, vertex_id: impl Into<String>, record: VertexRecord) -> Self {
        self.insert(vertex_id, record);
        self
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VertexRecord)> {
        self.0.iter().map(|(id, record)| (id.as_str(), record))
    }

    /// Number of vertices traced in this superstep
    pub fn traced_count(&self) -> usize {
        self.0.values().filter(|record| record.is_traced()).count()
    }
}

impl FromIterator<(String, VertexRecord)> for Scenario {
    fn from_iter<I: IntoIterator<Item = (String, VertexRecord)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Scenario {
    type Item = (String, VertexRecord);
    type IntoIter = std::collections::btree_map::IntoIter<String, VertexRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
