//! Shared test helpers for `sunquote-core` integration tests.
//!
//! In-memory repository mocks and fixture builders so the lifecycle and
//! regeneration tests can focus on behaviour instead of boilerplate.

pub mod fixtures;
pub mod repositories;
