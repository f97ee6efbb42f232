use super::{Delta, Scenario};

/// Combine a full scenario with the delta traced in the next superstep.
///
/// Every vertex of `base` is carried over with `debugged = false`. Every
/// vertex of `delta` replaces the carried-over record wholesale (no
/// field-level merge) and is marked `debugged = true`. Vertices that only
/// appear in `delta` are new to the graph.
pub fn merge(base: &Scenario, delta: &Delta) -> Scenario {
    let mut merged: Scenario = base
        .iter()
        .map(|(id, record)| (id.to_string(), record.marked(false)))
        .collect();

    for (id, record) in delta.iter() {
        merged.insert(id, record.marked(true));
    }

    merged
}
