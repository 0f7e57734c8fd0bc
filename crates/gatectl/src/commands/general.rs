//! General settings: hostname, site, location, and log switches.

use gatectl_api::GeneralConfig;
use gatectl_core::View;

use super::{Ctx, util};
use crate::cli::{GeneralArgs, GeneralCommand};
use crate::error::CliError;

fn detail(c: &GeneralConfig) -> Vec<(&'static str, String)> {
    vec![
        ("Hostname", c.hostname.clone()),
        ("Latitude", c.latitude.clone()),
        ("Longitude", c.longitude.clone()),
        ("Site Name", c.site_name.clone()),
        ("Client Name", c.client_name.clone()),
        ("Log Storage", c.log_storage.to_string()),
        ("Log Send", c.log_send.to_string()),
    ]
}

pub async fn show(ctx: &mut Ctx<'_>) -> Result<(), CliError> {
    let form = util::open_form::<GeneralConfig>(ctx, View::General).await?;
    ctx.out.record(form.record(), detail, |c| c.hostname.clone())
}

pub async fn handle(args: GeneralArgs, ctx: &mut Ctx<'_>) -> Result<(), CliError> {
    match args.command {
        GeneralCommand::Show => show(ctx).await,
        GeneralCommand::Set {
            hostname,
            latitude,
            longitude,
            site_name,
            client_name,
            log_storage,
            log_send,
        } => {
            let mut form = util::open_form::<GeneralConfig>(ctx, View::General).await?;

            let mut changed = false;
            if latitude.is_some() || longitude.is_some() {
                let lat = latitude.unwrap_or_else(|| form.record().latitude.clone());
                let lon = longitude.unwrap_or_else(|| form.record().longitude.clone());
                form.set_coordinates(&lat, &lon)?;
                changed = true;
            }
            changed |= util::apply(hostname, |v| {
                form.edit()?.hostname = v;
                Ok(())
            })?;
            changed |= util::apply(site_name, |v| {
                form.edit()?.site_name = v;
                Ok(())
            })?;
            changed |= util::apply(client_name, |v| {
                form.edit()?.client_name = v;
                Ok(())
            })?;
            changed |= util::apply(log_storage, |t| form.set_log_storage(t.is_on()))?;
            changed |= util::apply(log_send, |t| form.set_log_send(t.is_on()))?;
            util::require_changes(changed)?;

            util::save_form(ctx, &mut form).await?;
            ctx.out.record(form.record(), detail, |c| c.hostname.clone())
        }
    }
}
