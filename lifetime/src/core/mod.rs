//! Deterministic, pure logic shared by the engine.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod blocker;
pub mod definition;
pub mod edge;
pub mod facts;
pub mod invariants;
pub mod selector;
pub mod types;
