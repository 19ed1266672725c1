//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by concern (`auth`, `toast`, `cache`, `browse`, `credits`)
//! so pages depend on small focused models. Each model is a plain struct
//! held in an `RwSignal` context; services mutate it through [`StateCell`]
//! so the same code runs against a signal in the browser and a `RefCell`
//! in tests.

pub mod auth;
pub mod browse;
pub mod cache;
pub mod credits;
pub mod toast;

use std::cell::RefCell;

use leptos::prelude::*;

/// Shared mutable access to a state model.
pub trait StateCell<T> {
    /// Mutate the model. Returns `None` when the cell is gone (an unmounted
    /// signal), in which case nothing ran.
    fn modify<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R>;

    /// Read the model without subscribing.
    fn inspect<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R>;
}

impl<T: Send + Sync + 'static> StateCell<T> for RwSignal<T> {
    fn modify<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.try_update(f)
    }

    fn inspect<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.try_with_untracked(f)
    }
}

impl<T> StateCell<T> for RefCell<T> {
    fn modify<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }

    fn inspect<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        Some(f(&self.borrow()))
    }
}
