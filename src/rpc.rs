//! JSON-RPC transport for the NZBGet control API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐        HTTP(S) POST          ┌─────────────────────┐
//! │   Rust caller   │  ───────────────────────────►│       NZBGet        │
//! │    (NzbGet)     │  ◄─────────────────────────── │   /jsonrpc handler  │
//! └─────────────────┘    JSON-RPC (positional)     └─────────────────────┘
//! ```
//!
//! # Protocol
//!
//! One request per HTTP exchange, with positional parameters:
//!
//! ```text
//! POST /jsonrpc
//! Accept: application/json
//! Content-Type: application/json
//! Authorization: Basic <base64(user:pass)>
//!
//! {"method":"log","params":[0,50],"id":1}
//! ```
//!
//! The response carries either `result` or `error`.
//!
//! # Usage
//!
//! ```ignore
//! use nzbget_rpc::rpc::NzbGet;
//!
//! let client = NzbGet::new(&config)?;
//! let version: String = client.call("version", ()).await?;
//! ```

mod client;
mod envelope;

pub use client::{decode_response, NzbGet, RpcError, TransportError};
pub use envelope::{truncate_body, JsonRpcError, JsonRpcRequest, JsonRpcResponse, MAX_ERROR_BODY_CHARS};
