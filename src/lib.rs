//! # prompt-studio
//!
//! Leptos + WASM front-end for the prompt library. Users browse, search,
//! favorite and unlock prompts; administrators curate prompts, categories
//! and featured collections and read analytics.
//!
//! All persistence, auth and business rules live in the hosted backend,
//! reached through the `backend` crate. This crate holds the route table,
//! pages and components, client-side state, and the service layer that turns
//! page intents into backend calls.

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod net;
pub mod pages;
pub mod services;
pub mod state;
pub mod util;

/// Browser entry point: install logging and the panic hook, then mount.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(config::log_level());
    leptos::mount::mount_to_body(app::App);
}
