//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use gatectl_core::{ConfigResource, CoreError, FormView, Resource, View};

use super::Ctx;
use crate::error::CliError;

/// Require a logged-in session, switch to `view`, and persist the choice.
pub fn enter_view(ctx: &mut Ctx<'_>, view: View) -> Result<(), CliError> {
    ctx.session.select_view(view)?;
    Ok(())
}

/// Enter `view` and fetch its record fresh from the device.
pub async fn open_form<R: Resource>(ctx: &mut Ctx<'_>, view: View) -> Result<FormView<R>, CliError> {
    enter_view(ctx, view)?;
    let mut form = FormView::<R>::new();
    if let Err(e) = form.load(ctx.client).await {
        return Err(CliError::from(e).shown_as(form.error()));
    }
    Ok(form)
}

/// Submit the edited record and report the outcome.
pub async fn save_form<R: ConfigResource>(
    ctx: &Ctx<'_>,
    form: &mut FormView<R>,
) -> Result<(), CliError> {
    match form.save(ctx.client).await {
        Ok(()) => {
            if let Some(notice) = form.notice() {
                ctx.out.notice(notice);
            }
            Ok(())
        }
        Err(e) => Err(CliError::from(e).shown_as(form.error())),
    }
}

/// Fail a `set` that names no fields, instead of resubmitting unchanged data.
pub fn require_changes(changed: bool) -> Result<(), CliError> {
    if changed {
        Ok(())
    } else {
        Err(CliError::Validation {
            field: "set".into(),
            reason: "no settings given; pass at least one --<field> option".into(),
        })
    }
}

/// Apply an edit closure when `value` is present; report whether it was.
pub fn apply<T>(
    value: Option<T>,
    edit: impl FnOnce(T) -> Result<(), CoreError>,
) -> Result<bool, CliError> {
    match value {
        Some(value) => {
            edit(value)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` style flags.
pub fn read_json_file(path: &Path) -> Result<serde_json::Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("{}: invalid JSON: {e}", path.display()),
    })
}

/// Mask a secret for table display.
pub fn masked(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "****".into()
    }
}
