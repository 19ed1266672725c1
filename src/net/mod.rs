//! Browser implementations of the backend's I/O seams.
//!
//! DESIGN
//! ======
//! The `backend` crate only knows the [`backend::Transport`] and
//! [`backend::SessionStore`] traits. This module supplies the `fetch` and
//! `localStorage` versions; tests use the in-memory ones from
//! `backend::testing` instead.

pub mod session_store;
pub mod transport;
