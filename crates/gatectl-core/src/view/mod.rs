// Per-view state: forms for the config resources, the serial console, and
// the admin panel. Each holds its own lifecycle; nothing is shared between
// views, so opening a view always starts from a fresh fetch.

mod admin;
mod console;
mod form;
mod general;
mod lifecycle;
mod network;

pub use admin::AdminPanel;
pub use console::{CommandConsole, ConsoleEntry};
pub use form::{ConfigResource, FormView, Resource};
pub use lifecycle::Ticket;
pub use network::{NetworkForm, NetworkTab, StaticField};
