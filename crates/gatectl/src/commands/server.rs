//! Reporting server settings.

use gatectl_api::ServerConfig;
use gatectl_core::View;

use super::{Ctx, util};
use crate::cli::{ServerArgs, ServerCommand};
use crate::error::CliError;

fn detail(c: &ServerConfig) -> Vec<(&'static str, String)> {
    vec![
        ("Server IP", c.server_ip.clone()),
        ("Port", c.port.to_string()),
        ("Server URL", c.server_url.clone()),
        ("Token", util::masked(&c.token)),
    ]
}

fn endpoint(c: &ServerConfig) -> String {
    format!("{}:{}", c.server_ip, c.port)
}

pub async fn show(ctx: &mut Ctx<'_>) -> Result<(), CliError> {
    let form = util::open_form::<ServerConfig>(ctx, View::Server).await?;
    ctx.out.record(form.record(), detail, endpoint)
}

pub async fn handle(args: ServerArgs, ctx: &mut Ctx<'_>) -> Result<(), CliError> {
    match args.command {
        ServerCommand::Show => show(ctx).await,
        ServerCommand::Set {
            server_ip,
            port,
            url,
            token,
        } => {
            util::require_changes(
                server_ip.is_some() || port.is_some() || url.is_some() || token.is_some(),
            )?;
            let mut form = util::open_form::<ServerConfig>(ctx, View::Server).await?;
            let record = form.edit()?;
            if let Some(server_ip) = server_ip {
                record.server_ip = server_ip;
            }
            if let Some(port) = port {
                record.port = port;
            }
            if let Some(url) = url {
                record.server_url = url;
            }
            if let Some(token) = token {
                record.token = token;
            }

            util::save_form(ctx, &mut form).await?;
            ctx.out.record(form.record(), detail, endpoint)
        }
    }
}
