// ── Network form ──
//
// The WiFi/4G tab is not stored separately: it is always read from
// `connection_mode`, and selecting a tab writes `connection_mode`, so the
// two cannot drift apart. Static addressing fields are read-only while
// DHCP is on; the SIM APN is read-only while automatic APN is on.

use std::net::Ipv4Addr;

use gatectl_api::{ConnectionMode, Flag, NetworkConfig};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::CoreError;
use crate::view::form::FormView;

/// Network view form state.
pub type NetworkForm = FormView<NetworkConfig>;

/// The uplink tab shown in the network view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum NetworkTab {
    #[strum(to_string = "wifi")]
    Wifi,
    #[strum(to_string = "4g", serialize = "cellular", serialize = "lte")]
    Cellular,
}

impl From<ConnectionMode> for NetworkTab {
    fn from(mode: ConnectionMode) -> Self {
        match mode {
            ConnectionMode::Wifi => Self::Wifi,
            ConnectionMode::Cellular => Self::Cellular,
        }
    }
}

impl From<NetworkTab> for ConnectionMode {
    fn from(tab: NetworkTab) -> Self {
        match tab {
            NetworkTab::Wifi => Self::Wifi,
            NetworkTab::Cellular => Self::Cellular,
        }
    }
}

/// Static addressing fields gated by DHCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum StaticField {
    #[strum(to_string = "staticIP")]
    StaticIp,
    #[strum(to_string = "gatewayIP")]
    GatewayIp,
    SubnetMask,
    #[strum(to_string = "pdns")]
    PrimaryDns,
    #[strum(to_string = "sdns")]
    SecondaryDns,
}

impl StaticField {
    fn slot(self, record: &mut NetworkConfig) -> &mut String {
        match self {
            Self::StaticIp => &mut record.static_ip,
            Self::GatewayIp => &mut record.gateway_ip,
            Self::SubnetMask => &mut record.subnet_mask,
            Self::PrimaryDns => &mut record.primary_dns,
            Self::SecondaryDns => &mut record.secondary_dns,
        }
    }

    pub fn value(self, record: &NetworkConfig) -> &str {
        match self {
            Self::StaticIp => &record.static_ip,
            Self::GatewayIp => &record.gateway_ip,
            Self::SubnetMask => &record.subnet_mask,
            Self::PrimaryDns => &record.primary_dns,
            Self::SecondaryDns => &record.secondary_dns,
        }
    }
}

impl FormView<NetworkConfig> {
    /// The tab matching the record's `conn` value.
    pub fn active_tab(&self) -> NetworkTab {
        self.record().connection_mode.into()
    }

    pub fn select_tab(&mut self, tab: NetworkTab) -> Result<(), CoreError> {
        self.edit()?.connection_mode = tab.into();
        Ok(())
    }

    pub fn set_wifi_credentials(&mut self, ssid: &str, password: &str) -> Result<(), CoreError> {
        let record = self.edit()?;
        ssid.clone_into(&mut record.ssid);
        password.clone_into(&mut record.password);
        Ok(())
    }

    // ── DHCP gating ──────────────────────────────────────────────────

    /// Static fields accept input only when idle and DHCP is off.
    pub fn static_fields_editable(&self) -> bool {
        self.inputs_enabled() && !self.record().dhcp.is_on()
    }

    pub fn set_dhcp(&mut self, enabled: bool) -> Result<(), CoreError> {
        self.edit()?.dhcp = Flag::from(enabled);
        Ok(())
    }

    /// Edit one static field. Values must be dotted-quad IPv4 addresses
    /// (subnet masks contiguous); empty clears the field.
    pub fn set_static_field(&mut self, field: StaticField, value: &str) -> Result<(), CoreError> {
        let name: &'static str = field.into();
        if self.record().dhcp.is_on() {
            return Err(CoreError::validation(name, "read-only while DHCP is enabled"));
        }
        let value = value.trim();
        if !value.is_empty() {
            let addr: Ipv4Addr = value
                .parse()
                .map_err(|_| CoreError::validation(name, format!("'{value}' is not an IPv4 address")))?;
            if field == StaticField::SubnetMask && !is_contiguous_mask(addr) {
                return Err(CoreError::validation(name, format!("{value} is not a valid netmask")));
            }
        }
        value.clone_into(field.slot(self.edit()?));
        Ok(())
    }

    // ── APN ──────────────────────────────────────────────────────────

    pub fn sim1_apn_editable(&self) -> bool {
        self.inputs_enabled() && !self.record().auto_apn.is_on()
    }

    pub fn set_auto_apn(&mut self, enabled: bool) -> Result<(), CoreError> {
        self.edit()?.auto_apn = Flag::from(enabled);
        Ok(())
    }

    pub fn set_sim1_apn(&mut self, apn: &str) -> Result<(), CoreError> {
        if self.record().auto_apn.is_on() {
            return Err(CoreError::validation("sim1Apn", "read-only while automatic APN is enabled"));
        }
        apn.trim().clone_into(&mut self.edit()?.sim1_apn);
        Ok(())
    }
}

fn is_contiguous_mask(mask: Ipv4Addr) -> bool {
    let bits = u32::from(mask);
    bits.leading_ones() + bits.trailing_zeros() == 32
}
