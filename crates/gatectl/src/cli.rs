//! Clap derive structures for the `gatectl` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// gatectl -- administration console for cellular/WiFi gateways
#[derive(Debug, Parser)]
#[command(
    name = "gatectl",
    version,
    about = "Configure cellular/WiFi gateway devices from the command line",
    long_about = "Log in to a gateway device, inspect its status, and edit its general,\n\
        network, server, and device settings over the device's HTTP API.\n\n\
        The session (logged in, last view) persists between invocations.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device profile to use
    #[arg(long, short = 'p', env = "GATECTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Device URL (overrides profile)
    #[arg(long, short = 'd', env = "GATECTL_DEVICE", global = true)]
    pub device: Option<String>,

    /// Admin username (overrides profile)
    #[arg(long, short = 'u', env = "GATECTL_USERNAME", global = true, hide_env = true)]
    pub username: Option<String>,

    /// Session file (defaults to the platform data directory)
    #[arg(long, env = "GATECTL_STATE_FILE", global = true)]
    pub state_file: Option<PathBuf>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "GATECTL_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "GATECTL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (unbounded when unset)
    #[arg(long, env = "GATECTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// An on/off switch for 0/1 device fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

/// One of the seven console views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewName {
    /// Serial command console
    #[value(alias = "cmd")]
    Command,
    /// Device identity and status
    Status,
    /// Hostname, site, location, logging
    General,
    /// WiFi / 4G uplink and addressing
    Network,
    /// Reporting server endpoint
    Server,
    /// Update rate, Modbus address, log interval
    #[value(name = "device", alias = "device-config")]
    DeviceConfig,
    /// Password, telnet, backup, firmware
    Admin,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in to the device
    Login(LoginArgs),

    /// End the session
    Logout,

    /// Show session state and the active view
    Whoami,

    /// Switch to a view and show it
    Open {
        /// View to open (defaults to the current view)
        view: Option<ViewName>,
    },

    /// Device identity and status
    #[command(alias = "st")]
    Status,

    /// General settings
    #[command(alias = "gen")]
    General(GeneralArgs),

    /// Network settings (WiFi / 4G)
    #[command(alias = "net")]
    Network(NetworkArgs),

    /// Reporting server settings
    Server(ServerArgs),

    /// Device tuning parameters
    #[command(alias = "dev")]
    Device(DeviceArgs),

    /// Send a command to the device's serial console
    Cmd(CmdArgs),

    /// Administration actions
    Admin(AdminArgs),

    /// Send a raw request to any device endpoint
    Raw(RawArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SESSION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Read the password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  GENERAL
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GeneralArgs {
    #[command(subcommand)]
    pub command: GeneralCommand,
}

#[derive(Debug, Subcommand)]
pub enum GeneralCommand {
    /// Show general settings
    Show,

    /// Change general settings (unspecified fields keep their values)
    Set {
        #[arg(long)]
        hostname: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        latitude: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        longitude: Option<String>,
        #[arg(long)]
        site_name: Option<String>,
        #[arg(long)]
        client_name: Option<String>,
        /// Store logs on the device
        #[arg(long)]
        log_storage: Option<Toggle>,
        /// Send logs to the server
        #[arg(long)]
        log_send: Option<Toggle>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NETWORK
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NetworkArgs {
    #[command(subcommand)]
    pub command: NetworkCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UplinkArg {
    Wifi,
    #[value(name = "4g", alias = "cellular")]
    Cellular,
}

#[derive(Debug, Subcommand)]
pub enum NetworkCommand {
    /// Show network settings
    Show,

    /// Change network settings (unspecified fields keep their values)
    Set {
        /// Active uplink
        #[arg(long)]
        mode: Option<UplinkArg>,
        #[arg(long)]
        ssid: Option<String>,
        /// WiFi passphrase
        #[arg(long)]
        wifi_password: Option<String>,
        /// DHCP on the uplink; static fields are only accepted when off
        #[arg(long)]
        dhcp: Option<Toggle>,
        #[arg(long)]
        static_ip: Option<String>,
        #[arg(long)]
        gateway_ip: Option<String>,
        #[arg(long)]
        subnet_mask: Option<String>,
        #[arg(long)]
        primary_dns: Option<String>,
        #[arg(long)]
        secondary_dns: Option<String>,
        /// Automatic APN selection
        #[arg(long)]
        auto_apn: Option<Toggle>,
        /// SIM 1 APN; only accepted when automatic APN is off
        #[arg(long)]
        apn: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SERVER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ServerArgs {
    #[command(subcommand)]
    pub command: ServerCommand,
}

#[derive(Debug, Subcommand)]
pub enum ServerCommand {
    /// Show server settings
    Show,

    /// Change server settings (unspecified fields keep their values)
    Set {
        #[arg(long)]
        server_ip: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        token: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DeviceArgs {
    #[command(subcommand)]
    pub command: DeviceCommand,
}

#[derive(Debug, Subcommand)]
pub enum DeviceCommand {
    /// Show device tuning parameters
    Show,

    /// Change device tuning parameters (unspecified fields keep their values)
    Set {
        /// Update rate
        #[arg(long)]
        update_rate: Option<u32>,
        /// Modbus slave address
        #[arg(long)]
        modbus_address: Option<u32>,
        /// Log storage interval
        #[arg(long)]
        log_interval: Option<u32>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SERIAL CONSOLE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CmdArgs {
    /// Command text; multiple words are joined with spaces
    #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ADMIN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Change the device admin password (prompts for new + confirmation)
    Password {
        /// Also send the current password
        #[arg(long)]
        with_old: bool,
    },

    /// Enable, disable, or query telnet access
    Telnet {
        #[command(subcommand)]
        action: TelnetAction,
    },

    /// Download the backup record, or upload one with --upload
    Backup {
        /// Write the record to this file instead of stdout
        #[arg(long, short = 'f', conflicts_with = "upload")]
        file: Option<PathBuf>,

        /// Upload a backup record from a JSON file
        #[arg(long)]
        upload: Option<PathBuf>,
    },

    /// Restore the device from its backup
    Restore {
        /// JSON record to send (defaults to an empty object)
        #[arg(long, short = 'F')]
        from_file: Option<PathBuf>,
    },

    /// Reset the device to factory defaults
    FactoryReset {
        /// JSON record to send (defaults to an empty object)
        #[arg(long, short = 'F')]
        from_file: Option<PathBuf>,
    },

    /// Upload a firmware image
    Firmware {
        /// Firmware file
        file: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum TelnetAction {
    /// Enable telnet
    Enable {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Disable telnet
    Disable,
    /// Show telnet state
    Status,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RAW
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RawArgs {
    /// HTTP method (GET, POST, PUT, DELETE, ...)
    pub method: String,

    /// Path relative to the device URL (e.g. /reboot)
    pub path: String,

    /// JSON request body
    #[arg(long, conflicts_with = "data_file")]
    pub data: Option<String>,

    /// Read the JSON request body from a file
    #[arg(long)]
    pub data_file: Option<PathBuf>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Store the active profile's password in the system keyring
    SetPassword,

    /// Print the config and session file paths
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
