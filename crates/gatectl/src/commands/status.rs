//! Status view: device identity, firmware, and WiFi uplink.

use gatectl_api::DeviceStatus;
use gatectl_core::View;

use super::{Ctx, util};
use crate::error::CliError;

fn detail(s: &DeviceStatus) -> Vec<(&'static str, String)> {
    vec![
        ("Manufacturer", s.manufacturer.clone()),
        ("Device", s.device_model.clone()),
        ("Device ID", s.device_id.clone()),
        ("IMEI", s.imei.clone()),
        ("WiFi MAC", s.wifi_mac.clone()),
        ("SDK Version", s.sdk_version.clone()),
        ("Firmware", s.firmware_name.clone()),
        ("Firmware Version", s.firmware_version.clone()),
        ("Build Date", s.firmware_build_date.clone()),
        ("Network", s.network_ssid.clone()),
        ("WiFi IP", s.wifi_ip.clone()),
    ]
}

pub async fn handle(ctx: &mut Ctx<'_>) -> Result<(), CliError> {
    let form = util::open_form::<DeviceStatus>(ctx, View::Status).await?;
    ctx.out
        .record(form.record(), detail, |s| s.device_id.clone())
}
