//! Session and view logic between `gatectl-api` and a front end.
//!
//! - **[`SessionController`]**: the login/logout and active-view state
//!   machine. Its two durable flags live behind the injected
//!   [`SessionStore`] capability ([`MemoryStore`] for tests,
//!   [`FileStore`] for the CLI).
//!
//! - **[`FormView<R>`]**: fetch-on-open / submit-on-save form state for
//!   one device resource, with a loading gate and a generation counter so a
//!   stale fetch never overwrites newer data or a closed view.
//!
//! - **[`CommandConsole`]** and **[`AdminPanel`]**: the serial console and
//!   the administration actions.
//!
//! Nothing here renders anything; front ends read the state and draw it.

pub mod config;
pub mod error;
pub mod session;
pub mod store;
pub mod view;

pub use config::{GatewayConfig, TlsVerification};
pub use error::CoreError;
pub use session::{SessionController, SessionState, View};
pub use store::{FileStore, MemoryStore, SessionStore};
pub use view::{
    AdminPanel, CommandConsole, ConfigResource, ConsoleEntry, FormView, NetworkForm, NetworkTab,
    Resource, StaticField, Ticket,
};
