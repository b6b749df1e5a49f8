//! Help-center document viewer state.
//!
//! Document loads are cancellable by replacement: every [`DocViewer::select`]
//! hands out a fresh [`RequestTicket`], and [`DocViewer::resolve`] only
//! accepts the result for the ticket that is still active. A slow response
//! for a document the user already navigated away from is dropped.

use crate::error::DocError;
use crate::outline::{self, OutlineEntry, OutlineNode};
use crate::source::DocSource;

/// Identity of one in-flight request. Later tickets compare greater.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Hands out monotonically increasing tickets and remembers the active one.
#[derive(Debug, Default)]
pub struct TicketCounter {
    last: u64,
    active: Option<RequestTicket>,
}

impl TicketCounter {
    /// Issue a ticket and make it the active one.
    pub fn issue(&mut self) -> RequestTicket {
        self.last += 1;
        let ticket = RequestTicket(self.last);
        self.active = Some(ticket);
        ticket
    }

    pub fn active(&self) -> Option<RequestTicket> {
        self.active
    }

    /// Whether `ticket` is the active one. Settling clears it.
    pub fn settle(&mut self, ticket: RequestTicket) -> bool {
        if self.active == Some(ticket) {
            self.active = None;
            true
        } else {
            false
        }
    }

    /// Forget the active ticket so any outstanding response is dropped.
    pub fn cancel(&mut self) {
        self.active = None;
    }
}

#[derive(Debug, Default)]
pub struct DocViewer {
    entries: Vec<OutlineEntry>,
    forest: Vec<OutlineNode>,
    active: Option<OutlineEntry>,
    content: String,
    search: String,
    tickets: TicketCounter,
}

impl DocViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the outline with one parsed from index markdown.
    ///
    /// When no document is active yet, the first document is selected and
    /// its ticket returned.
    pub fn load_index(&mut self, markdown: &str) -> Option<(RequestTicket, OutlineEntry)> {
        self.entries = outline::parse(markdown);
        self.forest = outline::build(&self.entries);
        tracing::debug!(
            target: "wp_docs::viewer",
            entries = self.entries.len(),
            roots = self.forest.len(),
            "outline loaded"
        );
        if self.active.is_some() {
            return None;
        }
        let first = outline::first_document(&self.entries)?.clone();
        let ticket = self.select_entry(first.clone());
        Some((ticket, first))
    }

    /// Show an index load failure in the content area.
    pub fn index_failed(&mut self, err: &DocError) {
        tracing::warn!(target: "wp_docs::viewer", error = %err, "index load failed");
        self.content = format!("failed to load document index: {err}");
    }

    /// Select an entry by id. Returns `None` for unknown ids.
    pub fn select(&mut self, id: &str) -> Option<(RequestTicket, OutlineEntry)> {
        let entry = self.entries.iter().find(|entry| entry.id == id)?.clone();
        let ticket = self.select_entry(entry.clone());
        Some((ticket, entry))
    }

    fn select_entry(&mut self, entry: OutlineEntry) -> RequestTicket {
        self.active = Some(entry);
        self.tickets.issue()
    }

    /// Apply a finished load. Returns false when the ticket is stale.
    pub fn resolve(&mut self, ticket: RequestTicket, result: Result<String, DocError>) -> bool {
        if !self.tickets.settle(ticket) {
            tracing::debug!(
                target: "wp_docs::viewer",
                ticket = ticket.id(),
                "stale document response ignored"
            );
            return false;
        }
        self.content = match result {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(target: "wp_docs::viewer", error = %err, "document load failed");
                err.content_message()
            }
        };
        true
    }

    /// Load the index and the first document from `source`.
    pub async fn refresh(&mut self, source: &impl DocSource) {
        match source.fetch_index().await {
            Ok(markdown) => {
                if let Some((ticket, entry)) = self.load_index(&markdown) {
                    let result = source.fetch(&entry.path).await;
                    self.resolve(ticket, result);
                }
            }
            Err(err) => self.index_failed(&err),
        }
    }

    /// Select `id` and load it from `source`.
    pub async fn open(&mut self, source: &impl DocSource, id: &str) -> bool {
        let Some((ticket, entry)) = self.select(id) else {
            return false;
        };
        let result = source.fetch(&entry.path).await;
        self.resolve(ticket, result)
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// The outline filtered by the current search text.
    pub fn visible_forest(&self) -> Vec<OutlineNode> {
        outline::filter_forest(&self.forest, &self.search)
    }

    pub fn entries(&self) -> &[OutlineEntry] {
        &self.entries
    }

    pub fn forest(&self) -> &[OutlineNode] {
        &self.forest
    }

    pub fn active(&self) -> Option<&OutlineEntry> {
        self.active.as_ref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_loading(&self) -> bool {
        self.tickets.active().is_some()
    }
}
