//! Queue client extension which transparently offloads oversized message
//! payloads to an object store.
//!
//! Messages over the queue's size limit are written to the store under a
//! fresh key, and a compact pointer travels in a reserved message attribute.
//! On receive the pointer is resolved, the original body is restored and the
//! pointer is embedded into the addressing token, so delete and visibility
//! calls can clean up or pass through with no extra bookkeeping on the caller
//! side.
mod dev;
pub use dev::setup_logger;

pub mod client_api;
pub use client_api::{ClientConfig, ExtendedClient};

pub mod error;

pub mod inbound;

pub mod mem;

pub mod message;

pub mod services;

pub mod transform;
