//! Document graph
//!
//! Documents reference each other (parent, previous, next) by [`DocId`], an
//! index into the graph's document list. The graph owns every document; a
//! link is only a position, so shared neighbours stay shared and cycles cost
//! nothing. Crossing a storage boundary goes through [`FlatRecord`], which
//! replaces each link with the target's URL.

mod flat;

pub use flat::{from_flat_records, to_flat_records, FlatRecord};

use std::collections::HashMap;

/// Position of a document inside its [`DocumentGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocId(usize);

impl DocId {
    /// The index into [`DocumentGraph::documents`]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// One crawled documentation page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    url: String,
    title: String,
    content: String,
    parent: Option<DocId>,
    previous: Option<DocId>,
    next: Option<DocId>,
}

impl Document {
    /// Absolute URL, the document's identity
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Markdown body
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn parent(&self) -> Option<DocId> {
        self.parent
    }

    pub fn previous(&self) -> Option<DocId> {
        self.previous
    }

    pub fn next(&self) -> Option<DocId> {
        self.next
    }

    /// ATX heading texts in the body, outside fenced code blocks
    pub fn headings(&self) -> Vec<&str> {
        let mut in_fence = false;
        let mut headings = Vec::new();

        for line in self.content.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                continue;
            }

            let level = trimmed.chars().take_while(|c| *c == '#').count();
            if (1..=6).contains(&level) {
                let rest = &trimmed[level..];
                if rest.is_empty() || rest.starts_with(' ') {
                    let text = rest.trim().trim_end_matches('#').trim();
                    if !text.is_empty() {
                        headings.push(text);
                    }
                }
            }
        }

        headings
    }
}

/// All documents of one crawl, in crawl order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentGraph {
    documents: Vec<Document>,
    index: HashMap<String, DocId>,
}

impl DocumentGraph {
    /// Builds a graph from URL-linked records
    ///
    /// One document is created per record, in order. Each `parent_url`,
    /// `previous_url` and `next_url` is then looked up among the new
    /// documents; URLs that are not present become no link. When URLs repeat,
    /// links resolve to the last document with that URL.
    pub fn from_records(records: Vec<FlatRecord>) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            index.insert(record.url.clone(), DocId(position));
        }

        let resolve = |url: Option<&str>| url.and_then(|url| index.get(url).copied());

        let documents = records
            .into_iter()
            .map(|record| Document {
                parent: resolve(record.parent_url.as_deref()),
                previous: resolve(record.previous_url.as_deref()),
                next: resolve(record.next_url.as_deref()),
                url: record.url,
                title: record.title,
                content: record.content,
            })
            .collect();

        Self { documents, index }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents in crawl order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Iterates documents with their ids, in crawl order
    pub fn iter(&self) -> impl Iterator<Item = (DocId, &Document)> {
        self.documents
            .iter()
            .enumerate()
            .map(|(position, document)| (DocId(position), document))
    }

    pub fn get(&self, id: DocId) -> Option<&Document> {
        self.documents.get(id.0)
    }

    /// Looks a document up by URL
    pub fn find(&self, url: &str) -> Option<DocId> {
        self.index.get(url).copied()
    }

    pub fn parent_of(&self, id: DocId) -> Option<&Document> {
        self.get(id)?.parent.and_then(|parent| self.get(parent))
    }

    pub fn previous_of(&self, id: DocId) -> Option<&Document> {
        self.get(id)?.previous.and_then(|previous| self.get(previous))
    }

    pub fn next_of(&self, id: DocId) -> Option<&Document> {
        self.get(id)?.next.and_then(|next| self.get(next))
    }

    /// Documents whose parent is `id`, in crawl order
    pub fn children_of(&self, id: DocId) -> impl Iterator<Item = (DocId, &Document)> {
        self.iter()
            .filter(move |(_, document)| document.parent == Some(id))
    }

    /// Number of parent hops from `id` to a document without a parent
    ///
    /// Parent chains are expected to be acyclic; a cycle stops counting after
    /// visiting every document once.
    pub fn depth_of(&self, id: DocId) -> usize {
        let mut depth = 0;
        let mut current = self.get(id).and_then(Document::parent);

        while let Some(parent) = current {
            if depth >= self.documents.len() {
                break;
            }
            depth += 1;
            current = self.get(parent).and_then(Document::parent);
        }

        depth
    }
}
