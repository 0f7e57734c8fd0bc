//! Network settings: WiFi / 4G uplink, DHCP or static addressing, APN.
//!
//! Edits go through the form's gated setters, so a static address is
//! refused while DHCP stays on and the APN while automatic APN stays on.
//! Toggles are applied before the fields they unlock.

use gatectl_api::NetworkConfig;
use gatectl_core::{NetworkForm, NetworkTab, StaticField, View};

use super::{Ctx, util};
use crate::cli::{NetworkArgs, NetworkCommand, UplinkArg};
use crate::error::CliError;

impl From<UplinkArg> for NetworkTab {
    fn from(arg: UplinkArg) -> Self {
        match arg {
            UplinkArg::Wifi => Self::Wifi,
            UplinkArg::Cellular => Self::Cellular,
        }
    }
}

fn detail(c: &NetworkConfig) -> Vec<(&'static str, String)> {
    let tab = NetworkTab::from(c.connection_mode);
    let mut rows = vec![("Uplink", tab.to_string())];
    match tab {
        NetworkTab::Wifi => {
            rows.push(("SSID", c.ssid.clone()));
            rows.push(("Password", util::masked(&c.password)));
        }
        NetworkTab::Cellular => {
            rows.push(("Auto APN", c.auto_apn.to_string()));
            rows.push(("SIM1 APN", c.sim1_apn.clone()));
        }
    }
    rows.push(("DHCP", c.dhcp.to_string()));
    rows.push(("Static IP", c.static_ip.clone()));
    rows.push(("Gateway IP", c.gateway_ip.clone()));
    rows.push(("Subnet Mask", c.subnet_mask.clone()));
    rows.push(("Primary DNS", c.primary_dns.clone()));
    rows.push(("Secondary DNS", c.secondary_dns.clone()));
    rows
}

pub async fn show(ctx: &mut Ctx<'_>) -> Result<(), CliError> {
    let form = util::open_form::<NetworkConfig>(ctx, View::Network).await?;
    ctx.out
        .record(form.record(), detail, |c| c.connection_mode.to_string())
}

pub async fn handle(args: NetworkArgs, ctx: &mut Ctx<'_>) -> Result<(), CliError> {
    let NetworkCommand::Set {
        mode,
        ssid,
        wifi_password,
        dhcp,
        static_ip,
        gateway_ip,
        subnet_mask,
        primary_dns,
        secondary_dns,
        auto_apn,
        apn,
    } = args.command
    else {
        return show(ctx).await;
    };

    let mut form: NetworkForm = util::open_form(ctx, View::Network).await?;
    let mut changed = util::apply(mode, |m| form.select_tab(m.into()))?;

    if ssid.is_some() || wifi_password.is_some() {
        let ssid = ssid.unwrap_or_else(|| form.record().ssid.clone());
        let password = wifi_password.unwrap_or_else(|| form.record().password.clone());
        form.set_wifi_credentials(&ssid, &password)?;
        changed = true;
    }

    changed |= util::apply(dhcp, |t| form.set_dhcp(t.is_on()))?;
    for (field, value) in [
        (StaticField::StaticIp, static_ip),
        (StaticField::GatewayIp, gateway_ip),
        (StaticField::SubnetMask, subnet_mask),
        (StaticField::PrimaryDns, primary_dns),
        (StaticField::SecondaryDns, secondary_dns),
    ] {
        changed |= util::apply(value, |v| form.set_static_field(field, &v))?;
    }

    changed |= util::apply(auto_apn, |t| form.set_auto_apn(t.is_on()))?;
    changed |= util::apply(apn, |v| form.set_sim1_apn(&v))?;
    util::require_changes(changed)?;

    util::save_form(ctx, &mut form).await?;
    ctx.out
        .record(form.record(), detail, |c| c.connection_mode.to_string())
}
