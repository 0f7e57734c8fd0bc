//! CLI configuration: a thin wrapper around `gatectl_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--device, --username, --insecure, --timeout, --state-file).

use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use clap::ValueEnum;
use dialoguer::Input;
use secrecy::SecretString;

use gatectl_api::Credentials;
use gatectl_core::GatewayConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use gatectl_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// The profile to use with every flag override applied.
///
/// An explicitly named profile must exist. Without one, `--device` alone
/// is enough to build an ad-hoc profile.
pub fn effective_profile(global: &GlobalOpts, config: &Config) -> Result<Profile, CliError> {
    let name = active_profile_name(global, config);
    let mut profile = match config.profiles.get(&name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            let mut names: Vec<_> = config.profiles.keys().cloned().collect();
            names.sort();
            return Err(CliError::ProfileNotFound {
                name,
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            });
        }
        None => Profile::default(),
    };

    if let Some(ref device) = global.device {
        profile.device.clone_from(device);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if global.insecure || (profile.insecure.is_none() && config.defaults.insecure) {
        profile.insecure = Some(true);
    }
    profile.timeout = global
        .timeout
        .or(profile.timeout)
        .or(Some(config.defaults.timeout).filter(|secs| *secs > 0));

    if profile.device.trim().is_empty() {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    }
    Ok(profile)
}

/// Build the core `GatewayConfig` for this invocation.
pub fn resolve_gateway_config(
    global: &GlobalOpts,
    config: &Config,
) -> Result<GatewayConfig, CliError> {
    let profile = effective_profile(global, config)?;
    Ok(gatectl_config::profile_to_gateway_config(&profile)?)
}

/// Resolve login credentials: flags and profile first, then the password
/// chain, then interactive prompts when a terminal is attached.
pub fn resolve_credentials(
    global: &GlobalOpts,
    config: &Config,
    password_stdin: bool,
) -> Result<Credentials, CliError> {
    let name = active_profile_name(global, config);
    let profile = effective_profile(global, config)?;
    let interactive = std::io::stdin().is_terminal();

    let username = match gatectl_config::resolve_username(&profile, &name) {
        Ok(username) => username,
        Err(_) if interactive => Input::new()
            .with_prompt("Username")
            .default("admin".into())
            .interact_text()
            .map_err(|e| CliError::Io(std::io::Error::other(e)))?,
        Err(e) => return Err(e.into()),
    };

    let password = if password_stdin {
        read_password_stdin()?
    } else {
        match gatectl_config::resolve_password(&profile, &name) {
            Ok(password) => password,
            Err(_) if interactive => {
                SecretString::from(rpassword::prompt_password("Password: ")?)
            }
            Err(e) => return Err(e.into()),
        }
    };

    Ok(Credentials::new(username, password))
}

fn read_password_stdin() -> Result<SecretString, CliError> {
    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;
    let password = raw.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "nothing was read from stdin".into(),
        });
    }
    Ok(SecretString::from(password.to_owned()))
}

/// Session file: `--state-file` / `GATECTL_STATE_FILE`, else the data dir.
pub fn state_path(global: &GlobalOpts) -> PathBuf {
    global
        .state_file
        .clone()
        .unwrap_or_else(gatectl_config::state_path)
}

/// Output format: flag, then `[defaults] output`, then table.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&config.defaults.output, true).unwrap_or(OutputFormat::Table)
    })
}

/// Color mode: flag, then `[defaults] color`, then auto.
pub fn color_mode(global: &GlobalOpts, config: &Config) -> ColorMode {
    global.color.unwrap_or_else(|| {
        ColorMode::from_str(&config.defaults.color, true).unwrap_or(ColorMode::Auto)
    })
}
