//! Fault-tolerant facade over a native credential backend
//!
//! This module provides:
//! - The facade that dispatches reads and writes
//! - A staging store giving read-your-writes before commits land
//! - An ordered deferred-write queue
//! - A sliding-expiry cache of access denials

mod denied;
mod facade;
mod queue;
mod staging;

pub use denied::DenialCache;
pub use facade::CredentialStoreFacade;
pub use queue::WriteQueue;
pub use staging::StagingStore;
