//! Scoring and protocol-progression engine for the longevity programme.
//!
//! The quiz answers feed [`workflows::diagnosis`], which produces domain scores,
//! the weakest-domain accelerator and its action plan. Daily check-ins live in
//! [`workflows::protocol`], and [`workflows::engine::ProtocolEngine`] ties both to
//! an injected [`storage::KeyValueStore`].

pub mod config;
pub mod error;
pub mod storage;
pub mod telemetry;
pub mod workflows;
