//! Device tuning parameters.

use gatectl_api::DeviceTuningConfig;
use gatectl_core::View;

use super::{Ctx, util};
use crate::cli::{DeviceArgs, DeviceCommand};
use crate::error::CliError;

fn detail(c: &DeviceTuningConfig) -> Vec<(&'static str, String)> {
    vec![
        ("Update Rate", c.update_rate.to_string()),
        ("Modbus Address", c.modbus_address.to_string()),
        ("Log Interval", c.log_interval.to_string()),
    ]
}

pub async fn show(ctx: &mut Ctx<'_>) -> Result<(), CliError> {
    let form = util::open_form::<DeviceTuningConfig>(ctx, View::DeviceConfig).await?;
    ctx.out
        .record(form.record(), detail, |c| c.modbus_address.to_string())
}

pub async fn handle(args: DeviceArgs, ctx: &mut Ctx<'_>) -> Result<(), CliError> {
    match args.command {
        DeviceCommand::Show => show(ctx).await,
        DeviceCommand::Set {
            update_rate,
            modbus_address,
            log_interval,
        } => {
            util::require_changes(
                update_rate.is_some() || modbus_address.is_some() || log_interval.is_some(),
            )?;
            let mut form = util::open_form::<DeviceTuningConfig>(ctx, View::DeviceConfig).await?;
            let record = form.edit()?;
            if let Some(rate) = update_rate {
                record.update_rate = rate;
            }
            if let Some(address) = modbus_address {
                record.modbus_address = address;
            }
            if let Some(interval) = log_interval {
                record.log_interval = interval;
            }

            util::save_form(ctx, &mut form).await?;
            ctx.out
                .record(form.record(), detail, |c| c.modbus_address.to_string())
        }
    }
}
