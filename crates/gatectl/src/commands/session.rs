//! Session command handlers: login, logout, whoami, open.

use gatectl_core::{FileStore, SessionController, SessionState, View};
use serde::Serialize;

use super::{Ctx, status, util};
use crate::cli::LoginArgs;
use crate::config;
use crate::error::CliError;
use crate::output::Printer;

#[derive(Serialize)]
struct SessionReport {
    session: SessionState,
    state_file: String,
}

pub async fn login(args: LoginArgs, ctx: &mut Ctx<'_>) -> Result<(), CliError> {
    let credentials = config::resolve_credentials(ctx.global, ctx.config, args.password_stdin)?;
    let view = match ctx.session.login(ctx.client, &credentials).await {
        Ok(view) => view,
        Err(e) => {
            let profile = config::active_profile_name(ctx.global, ctx.config);
            return Err(match CliError::from(e) {
                CliError::AuthFailed { message, .. } => CliError::AuthFailed { message, profile },
                other => other,
            });
        }
    };
    ctx.out.notice(&format!(
        "Logged in to {} as {} (view: {view})",
        ctx.client.base_url(),
        credentials.username
    ));
    Ok(())
}

pub fn logout(session: &mut SessionController<FileStore>, out: Printer) -> Result<(), CliError> {
    let was_logged_in = session.is_authenticated();
    session.logout()?;
    if was_logged_in {
        out.notice("Logged out.");
    } else {
        out.notice("No active session.");
    }
    Ok(())
}

pub fn whoami(session: &SessionController<FileStore>, out: Printer) -> Result<(), CliError> {
    let report = SessionReport {
        session: session.state(),
        state_file: session.store().path().display().to_string(),
    };
    out.record(
        &report,
        |r| {
            let mut rows = vec![(
                "Session",
                match r.session {
                    SessionState::LoggedOut => "logged out".to_owned(),
                    SessionState::LoggedIn(_) => "logged in".to_owned(),
                },
            )];
            if let SessionState::LoggedIn(view) = r.session {
                rows.push(("View", view.to_string()));
            }
            rows.push(("State file", r.state_file.clone()));
            rows
        },
        |r| match r.session {
            SessionState::LoggedOut => "logged-out".to_owned(),
            SessionState::LoggedIn(view) => view.to_string(),
        },
    )
}

/// Switch to `view` (or stay on the current one) and render it.
pub async fn open(view: Option<View>, ctx: &mut Ctx<'_>) -> Result<(), CliError> {
    let view = match view {
        Some(view) => view,
        None => ctx.session.active_view()?,
    };

    match view {
        View::Status => status::handle(ctx).await,
        View::General => super::general::show(ctx).await,
        View::Network => super::network::show(ctx).await,
        View::Server => super::server::show(ctx).await,
        View::DeviceConfig => super::device::show(ctx).await,
        View::Command => {
            util::enter_view(ctx, view)?;
            ctx.out
                .notice("Command console ready. Send with: gatectl cmd <text>");
            Ok(())
        }
        View::Admin => {
            util::enter_view(ctx, view)?;
            ctx.out.notice(
                "Admin actions: gatectl admin password | telnet | backup | restore | \
                 factory-reset | firmware",
            );
            Ok(())
        }
    }
}
