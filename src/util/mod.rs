//! Utility helpers shared across pages and components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Browser glue (timers, clipboard, scroll, storage) lives here behind the
//! `csr` feature so pages stay declarative and the decision logic stays
//! testable natively.

pub mod auth;
pub mod clipboard;
pub mod scroll;
pub mod timer;
pub mod ui_persistence;
