//! Command handlers, one module per view plus the session and utility
//! commands.

pub mod admin;
pub mod config_cmd;
pub mod console;
pub mod device;
pub mod general;
pub mod network;
pub mod raw;
pub mod server;
pub mod session;
pub mod status;
pub mod util;

use gatectl_api::DeviceClient;
use gatectl_core::{FileStore, SessionController, View};

use crate::cli::{Command, GlobalOpts, ViewName};
use crate::config::Config;
use crate::error::CliError;
use crate::output::Printer;

/// Everything a device-facing handler needs.
pub struct Ctx<'a> {
    pub client: &'a DeviceClient,
    pub session: SessionController<FileStore>,
    pub global: &'a GlobalOpts,
    pub config: &'a Config,
    pub out: Printer,
}

/// Route a device-facing command to its handler.
pub async fn dispatch(cmd: Command, ctx: &mut Ctx<'_>) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => session::login(args, ctx).await,
        Command::Open { view } => session::open(view.map(View::from), ctx).await,
        Command::Status => status::handle(ctx).await,
        Command::General(args) => general::handle(args, ctx).await,
        Command::Network(args) => network::handle(args, ctx).await,
        Command::Server(args) => server::handle(args, ctx).await,
        Command::Device(args) => device::handle(args, ctx).await,
        Command::Cmd(args) => console::handle(args, ctx).await,
        Command::Admin(args) => admin::handle(args, ctx).await,
        Command::Raw(args) => raw::handle(args, ctx).await,
        Command::Logout | Command::Whoami | Command::Config(_) | Command::Completions(_) => {
            unreachable!("handled in main")
        }
    }
}

impl From<ViewName> for View {
    fn from(name: ViewName) -> Self {
        match name {
            ViewName::Command => Self::Command,
            ViewName::Status => Self::Status,
            ViewName::General => Self::General,
            ViewName::Network => Self::Network,
            ViewName::Server => Self::Server,
            ViewName::DeviceConfig => Self::DeviceConfig,
            ViewName::Admin => Self::Admin,
        }
    }
}
