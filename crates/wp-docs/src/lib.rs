//! Help-center documents: the `SUMMARY.md` outline and the viewer that
//! loads documents from it.

pub mod error;
pub mod outline;
pub mod source;
pub mod viewer;

pub use error::DocError;
pub use outline::{
    OutlineEntry, OutlineNode, build, filter_forest, first_document, parse, render_outline,
};
pub use source::{DocSource, HttpDocSource, INDEX_PATH};
pub use viewer::{DocViewer, RequestTicket, TicketCounter};

/// Parse and build in one step.
pub fn outline_from_markdown(markdown: &str) -> Vec<OutlineNode> {
    build(&parse(markdown))
}
