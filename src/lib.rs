//! Issue Labeler - decides when a GitHub `issues` webhook should trigger
//! automated label prediction.
//!
//! Each notification envelope is decoded, dispatched on its event type and
//! checked against the repository's trigger label. Matches are handed to an
//! external [`labeler::Labeler`] along with the [`labeler::select`] decision
//! function.

pub mod config;
pub mod envelope;
pub mod labeler;
pub mod processor;
pub mod server;
pub mod trigger;
pub mod types;
pub mod webhooks;

#[cfg(test)]
pub mod test_utils;
