//! Data-access operations used by pages.
//!
//! DESIGN
//! ======
//! Every operation is a plain async function over a [`backend::Backend`],
//! optionally taking a [`crate::state::StateCell`] for the client state it
//! updates. Pages own the UI reactions (toasts, navigation); services own
//! the query shapes and the state transitions, which keeps them testable
//! against a scripted transport without a browser.

pub mod analytics;
pub mod categories;
pub mod credits;
pub mod favorites;
pub mod featured;
pub mod images;
pub mod interactions;
pub mod profile;
pub mod prompts;
pub mod session;
