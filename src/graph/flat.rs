use serde::{Deserialize, Serialize};

use super::{Document, DocumentGraph};

/// Storage form of a [`Document`]: every link replaced by the target's URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatRecord {
    pub url: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub parent_url: Option<String>,
    #[serde(default)]
    pub previous_url: Option<String>,
    #[serde(default)]
    pub next_url: Option<String>,
}

/// Projects every document to a [`FlatRecord`], in graph order
pub fn to_flat_records(graph: &DocumentGraph) -> Vec<FlatRecord> {
    let url_of = |id| graph.get(id).map(|document: &Document| document.url.clone());

    graph
        .documents()
        .iter()
        .map(|document| FlatRecord {
            url: document.url.clone(),
            title: document.title.clone(),
            content: document.content.clone(),
            parent_url: document.parent.and_then(url_of),
            previous_url: document.previous.and_then(url_of),
            next_url: document.next.and_then(url_of),
        })
        .collect()
}

/// Rebuilds a graph from records; URLs missing from `records` become no link
pub fn from_flat_records(records: Vec<FlatRecord>) -> DocumentGraph {
    DocumentGraph::from_records(records)
}
