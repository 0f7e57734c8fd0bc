//! Administration: password, telnet, backup/restore, factory reset,
//! firmware upgrade.

use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use gatectl_api::FirmwareImage;
use gatectl_core::{AdminPanel, CoreError, View};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

use super::{Ctx, util};
use crate::cli::{AdminArgs, AdminCommand, TelnetAction};
use crate::error::CliError;
use crate::output;

/// Turn a panel result into a CLI result, reporting the panel's notice
/// on success and its error text on failure.
fn finish<T>(ctx: &Ctx<'_>, panel: &AdminPanel, result: Result<T, CoreError>) -> Result<T, CliError> {
    match result {
        Ok(value) => {
            if let Some(notice) = panel.notice() {
                ctx.out.notice(notice);
            }
            Ok(value)
        }
        Err(e) => Err(CliError::from(e).shown_as(panel.error())),
    }
}

fn prompt_secret(prompt: &str) -> Result<String, CliError> {
    Ok(rpassword::prompt_password(prompt)?)
}

fn load_firmware(path: &Path) -> Result<FirmwareImage, CliError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map_or_else(|| "firmware.bin".to_owned(), |n| n.to_string_lossy().into_owned());
    Ok(FirmwareImage { file_name, bytes })
}

fn upload_spinner(quiet: bool, file_name: &str) -> ProgressBar {
    if quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        bar.set_style(style);
    }
    bar.set_message(format!("Uploading {file_name}"));
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

#[allow(clippy::too_many_lines)]
pub async fn handle(args: AdminArgs, ctx: &mut Ctx<'_>) -> Result<(), CliError> {
    util::enter_view(ctx, View::Admin)?;
    let mut panel = AdminPanel::new();

    match args.command {
        AdminCommand::Password { with_old } => {
            let old = if with_old {
                Some(prompt_secret("Current password: ")?)
            } else {
                None
            };
            let new = prompt_secret("New password: ")?;
            let confirmation = prompt_secret("Confirm new password: ")?;
            let result = panel
                .change_password(ctx.client, old.as_deref(), &new, &confirmation)
                .await;
            finish(ctx, &panel, result)
        }

        AdminCommand::Telnet { action } => match action {
            TelnetAction::Enable { port } => {
                let result = panel.set_telnet(ctx.client, true, port).await;
                finish(ctx, &panel, result)
            }
            TelnetAction::Disable => {
                let result = panel.set_telnet(ctx.client, false, None).await;
                finish(ctx, &panel, result)
            }
            TelnetAction::Status => {
                let result = panel.telnet_state(ctx.client).await;
                let state = finish(ctx, &panel, result)?;
                ctx.out.value(&state)
            }
        },

        AdminCommand::Backup {
            upload: Some(source),
            ..
        } => {
            let record = util::read_json_file(&source)?;
            let result = panel.upload_backup(ctx.client, &record).await;
            finish(ctx, &panel, result)
        }

        AdminCommand::Backup { file, upload: None } => {
            let result = panel.backup(ctx.client).await;
            let record = finish(ctx, &panel, result)?;
            match file {
                Some(path) => {
                    std::fs::write(&path, output::render_json(&record, false)?)?;
                    ctx.out
                        .notice(&format!("Backup written to {}", path.display()));
                    Ok(())
                }
                None => ctx.out.value(&record),
            }
        }

        AdminCommand::Restore { from_file } => {
            let record = match from_file {
                Some(path) => util::read_json_file(&path)?,
                None => Value::Object(serde_json::Map::new()),
            };
            if !util::confirm("Restore the device from its backup?", "restore", ctx.global.yes)? {
                return Ok(());
            }
            let result = panel.restore(ctx.client, &record).await;
            finish(ctx, &panel, result)
        }

        AdminCommand::FactoryReset { from_file } => {
            let record = from_file.as_deref().map(util::read_json_file).transpose()?;
            let confirmed = util::confirm(
                "Reset the device to factory defaults? All settings will be lost.",
                "factory-reset",
                ctx.global.yes,
            )?;
            let result = panel
                .factory_reset(ctx.client, confirmed, record.as_ref())
                .await;
            finish(ctx, &panel, result)
        }

        AdminCommand::Firmware { file } => {
            let image = load_firmware(&file)?;
            let prompt = format!(
                "Upload {} ({} bytes) and start the firmware upgrade?",
                image.file_name,
                image.bytes.len()
            );
            if !util::confirm(&prompt, "firmware", ctx.global.yes)? {
                return Ok(());
            }
            let spinner = upload_spinner(ctx.out.quiet, &image.file_name);
            let result = panel.upgrade_firmware(ctx.client, Some(image)).await;
            spinner.finish_and_clear();
            finish(ctx, &panel, result)
        }
    }
}
