//! NZBGet JSON-RPC client library.
//!
//! This library provides a typed async client for the NZBGet download
//! manager's JSON-RPC API:
//!
//! - `rpc` - request envelopes, HTTP transport and error classification
//! - `methods` - typed wrappers for the remote operations
//! - `models` - records returned by the server
//! - `status` - open-world status enumerations
//! - `time` - epoch-second timestamps
//! - `config` - connection settings, config file and environment loading
//!
//! # Example
//!
//! ```ignore
//! use nzbget_rpc::{Config, NzbGet};
//!
//! let config = Config::new("http://localhost:6789").with_credentials("nzbget", "tegbzn6789");
//! let client = NzbGet::new(&config)?;
//!
//! for group in client.list_groups(0).await? {
//!     println!("{} {}", group.nzb_name, group.status);
//! }
//! ```

pub mod config;
pub mod methods;
pub mod models;
pub mod rpc;
pub mod status;
pub mod time;

pub use config::{Config, ConfigError};
pub use models::{
    AppendInput, BytesPer, ConfigTemplate, File, Group, History, LogEntry, NewsServer, Parameter,
    PerScriptStatus, ServerStats, ServerVolume, Status,
};
pub use rpc::{NzbGet, RpcError, TransportError};
pub use time::Timestamp;
