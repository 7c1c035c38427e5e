//! Built-in demo dataset.

use serde_json::{json, Value};

/// A small project in the widget's two-collection shape: four nested tasks
/// with text dates, and two links.
pub fn demo_seed() -> Value {
    json!({
        "tasks": [
            { "id": 1, "parentId": 0, "title": "Project", "start": "2025-10-01", "end": "2025-10-30", "progress": 30 },
            { "id": 2, "parentId": 1, "title": "Analysis", "start": "2025-10-01", "end": "2025-10-05", "progress": 100 },
            { "id": 3, "parentId": 1, "title": "Implementation", "start": "2025-10-06", "end": "2025-10-25", "progress": 40 },
            { "id": 4, "parentId": 3, "title": "Component A", "start": "2025-10-06", "end": "2025-10-15", "progress": 80 }
        ],
        "links": [
            { "id": 1, "predecessorId": 2, "successorId": 3, "type": 0 },
            { "id": 2, "predecessorId": 4, "successorId": 3, "type": 1 }
        ]
    })
}
