// General settings helpers: the two 0/1 switches and coordinate checks.

use gatectl_api::{Flag, GeneralConfig};

use crate::error::CoreError;
use crate::view::form::FormView;

impl FormView<GeneralConfig> {
    pub fn set_log_storage(&mut self, enabled: bool) -> Result<(), CoreError> {
        self.edit()?.log_storage = Flag::from(enabled);
        Ok(())
    }

    pub fn set_log_send(&mut self, enabled: bool) -> Result<(), CoreError> {
        self.edit()?.log_send = Flag::from(enabled);
        Ok(())
    }

    /// Set latitude and longitude. Values stay strings on the wire; they
    /// must parse as decimal degrees within range. Empty clears the field.
    pub fn set_coordinates(&mut self, latitude: &str, longitude: &str) -> Result<(), CoreError> {
        let latitude = checked_degrees("latitude", latitude, 90.0)?;
        let longitude = checked_degrees("longitude", longitude, 180.0)?;
        let record = self.edit()?;
        record.latitude = latitude;
        record.longitude = longitude;
        Ok(())
    }
}

fn checked_degrees(field: &str, raw: &str, limit: f64) -> Result<String, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(String::new());
    }
    let value: f64 = raw
        .parse()
        .map_err(|_| CoreError::validation(field, format!("'{raw}' is not a number")))?;
    if !value.is_finite() || value.abs() > limit {
        return Err(CoreError::validation(
            field,
            format!("{raw} is outside -{limit}..{limit}"),
        ));
    }
    Ok(raw.to_owned())
}
