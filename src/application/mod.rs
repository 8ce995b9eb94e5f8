//! Application layer - the client facade.
//!
//! Orchestrates domain payload construction and gateway calls. Callers
//! depend on [`ConektaClient`] and branch on [`ClientError`].

mod client;
mod error;

pub use client::{ConektaClient, OrderDetails};
pub use error::ClientError;
