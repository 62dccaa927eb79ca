//! AppEnlight — Rust client
//!
//! Collects log lines and error reports in memory and ships them as JSON
//! batches to the AppEnlight API whenever the application flushes a
//! category. The service acknowledges a batch with an `OK…` body; anything
//! else is handed back to the caller as a diagnostic value.

mod client;
mod context;
mod entry;
mod ids;
mod queue;
mod response;
mod settings;
mod transport;

pub use client::AppEnlightClient;
pub use context::{ConsoleContext, HostContext};
pub use entry::{Entry, Frame, Log, LogLevel, Report};
pub use ids::{IdGenerator, RandomIds};
pub use queue::{Category, EndpointQueue};
pub use response::{interpret, SendOutcome};
pub use settings::{ConfigError, Scheme, Settings};
pub use transport::{HttpTransport, OutgoingRequest, Transport, TransportError};
