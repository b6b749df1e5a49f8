//! wp-workbench: a debugging session for log parse rules and OML transform
//! scripts, run against a remote engine.
//!
//! - [`api`]: wire types and failure decoding
//! - [`remote`]: the [`RemoteEngine`] trait and its HTTP client
//! - [`session`]: the [`Workbench`] state behind the parse, convert and
//!   help-center pages
//! - [`connection`]: process-wide connection/user display state
//! - [`config`] and [`telemetry`]: environment configuration and tracing

pub mod api;
pub mod config;
pub mod connection;
pub mod error;
pub mod remote;
pub mod sample;
pub mod session;
pub mod telemetry;

pub use api::{
    Operation, ParseRequest, ParsedField, RecordResponse, RemoteFailure, TransformRequest,
    VersionInfo,
};
pub use config::WorkbenchConfig;
pub use connection::{ConnectionInfo, ConnectionState};
pub use error::WorkbenchError;
pub use remote::{HttpRemoteEngine, RemoteEngine};
pub use session::{
    Panel, ParseJob, ResultPanel, ResultView, Tab, TransformJob, ViewMode, Workbench,
};
