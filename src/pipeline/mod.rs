//! Request orchestration: planning, the bounded regeneration loop, and the caller-facing result.

pub mod opts;
pub mod orchestrator;
pub mod result;
