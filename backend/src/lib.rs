//! Typed boundary to the managed backend-as-a-service.
//!
//! This crate owns everything the web client knows about the hosted backend:
//! the row schema, the row-level query API, remote procedures, the auth
//! session client and object storage. It never touches the network itself;
//! every request goes through a [`Transport`] supplied by the caller, so the
//! browser build plugs in `fetch` and tests plug in [`testing::MockTransport`].

pub mod auth;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod query;
pub mod rpc;
pub mod schema;
pub mod storage;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use auth::{
    AuthChange, AuthClient, AuthEvent, AuthSubscription, AuthUser, MemorySessionStore, Session, SessionStore, SignUp,
};
pub use client::Backend;
pub use config::BackendConfig;
pub use error::BackendError;
pub use query::{Delete, Direction, Insert, Select, Update};
pub use storage::{StoredObject, UploadOptions};
pub use transport::{Body, HttpRequest, HttpResponse, Method, Transport};
