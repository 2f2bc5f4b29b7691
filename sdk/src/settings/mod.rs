// Copyright 2025 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

//! Settings for the validation engine.
//!
//! Settings are plain values passed to the components that need them. They
//! are built from defaults and overlaid with JSON or TOML using the `config`
//! crate:
//!
//! ```
//! # use pkd_trust::settings::Settings;
//! # fn main() -> pkd_trust::Result<()> {
//! let settings = Settings::new().with_toml(
//!     r#"
//!         [validation]
//!         strict_key_usage = true
//!     "#,
//! )?;
//!
//! assert!(settings.validation.strict_key_usage);
//! assert_eq!(settings.validation.max_chain_depth, 5);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use config::{Config, FileFormat};
use serde::{Deserialize, Serialize};

use crate::{model::MAX_TRUST_PATH_DEPTH, Error, Result};

const VERSION: u32 = 1;

// trait used to validate user input to make sure user supplied configurations are valid
pub(crate) trait SettingsValidate {
    // returns error if settings are invalid
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Settings for chain building and per-certificate checks.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Maximum number of certificates in a chain, leaf and anchor included.
    ///
    /// The default value is 5, which is also the largest accepted value.
    pub max_chain_depth: usize,

    /// Number of days before `notAfter` at which a certificate is reported as
    /// expiring soon.
    ///
    /// The default value is 30.
    pub expiring_soon_threshold_days: i64,

    /// Whether violations of the per-role Basic Constraints / Key Usage
    /// rules are errors (and make the certificate invalid) rather than
    /// warnings.
    ///
    /// The default value is false. A CSCA without `cRLSign` is a warning in
    /// either mode.
    pub strict_key_usage: bool,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            max_chain_depth: MAX_TRUST_PATH_DEPTH,
            expiring_soon_threshold_days: 30,
            strict_key_usage: false,
        }
    }
}

impl SettingsValidate for ValidationSettings {
    fn validate(&self) -> Result<()> {
        if !(1..=MAX_TRUST_PATH_DEPTH).contains(&self.max_chain_depth) {
            return Err(Error::BadParam(format!(
                "validation.max_chain_depth must be between 1 and {MAX_TRUST_PATH_DEPTH}"
            )));
        }
        if self.expiring_soon_threshold_days < 0 {
            return Err(Error::BadParam(
                "validation.expiring_soon_threshold_days must not be negative".into(),
            ));
        }
        Ok(())
    }
}

/// Settings for CRL-based revocation checking.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct RevocationSettings {
    /// Whether to consult the CRL store at all. When false every certificate
    /// is treated as not revoked.
    ///
    /// The default value is true.
    pub enabled: bool,
}

impl Default for RevocationSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl SettingsValidate for RevocationSettings {}

/// Settings for [`BatchValidator`](crate::BatchValidator).
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Size of a dedicated worker pool. 0 uses the global rayon pool.
    pub worker_threads: usize,
}

impl SettingsValidate for BatchSettings {}

/// Settings for configuring all aspects of pkd-trust.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Version of the configuration.
    pub version: u32,
    /// Chain building and per-certificate checks.
    pub validation: ValidationSettings,
    /// Revocation checking.
    pub revocation: RevocationSettings,
    /// Batch validation.
    pub batch: BatchSettings,
}

impl Settings {
    /// Returns the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay a JSON string on top of these settings.
    ///
    /// ```
    /// # use pkd_trust::settings::Settings;
    /// # fn main() -> pkd_trust::Result<()> {
    /// let settings = Settings::new().with_json(r#"{"revocation": {"enabled": false}}"#)?;
    /// assert!(!settings.revocation.enabled);
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_json(self, json: &str) -> Result<Self> {
        self.with_string(json, "json")
    }

    /// Overlay a TOML string on top of these settings.
    pub fn with_toml(self, toml: &str) -> Result<Self> {
        self.with_string(toml, "toml")
    }

    /// Overlay a settings file on top of these settings.
    ///
    /// The file format (JSON or TOML) is inferred from the file extension.
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .ok_or(Error::BadParam(
                "settings file must have json or toml extension".into(),
            ))?
            .to_str()
            .ok_or(Error::BadParam("invalid settings file name".into()))?;
        let setting_buf = std::fs::read(path).map_err(Error::IoError)?;
        self.with_string(&String::from_utf8_lossy(&setting_buf), ext)
    }

    /// Set a single value using dot notation, e.g. `validation.max_chain_depth`.
    pub fn with_value<T: Into<config::Value>>(self, path: &str, value: T) -> Result<Self> {
        let config = Config::try_from(&self).map_err(|e| Error::OtherError(Box::new(e)))?;

        let updated_config = Config::builder()
            .add_source(config)
            .set_override(path, value)
            .map_err(|e| Error::BadParam(e.to_string()))?
            .build()
            .map_err(|e| Error::BadParam(e.to_string()))?;

        let settings = updated_config
            .try_deserialize::<Settings>()
            .map_err(|e| Error::BadParam(e.to_string()))?;

        settings.validate()?;

        Ok(settings)
    }

    /// Gets a value at the specified dot-separated path.
    pub fn get_value<'de, T: serde::de::Deserialize<'de>>(&self, path: &str) -> Result<T> {
        let config = Config::try_from(self).map_err(|e| Error::OtherError(Box::new(e)))?;

        config
            .get::<T>(path)
            .map_err(|e| Error::BadParam(format!("Failed to get value at '{path}': {e}")))
    }

    /// Serializes these settings into a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Serializes these settings into a pretty JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn with_string(self, settings_str: &str, format: &str) -> Result<Self> {
        let f = match format.to_lowercase().as_str() {
            "json" => FileFormat::Json,
            "toml" => FileFormat::Toml,
            _ => return Err(Error::UnsupportedType),
        };

        // Convert current settings to Config
        let current_config = Config::try_from(&self).map_err(|e| Error::OtherError(Box::new(e)))?;

        // Parse new config and overlay it on current
        let updated_config = Config::builder()
            .add_source(current_config)
            .add_source(config::File::from_str(settings_str, f))
            .build()
            .map_err(|_e| Error::BadParam("could not parse configuration".into()))?;

        let settings = updated_config
            .try_deserialize::<Settings>()
            .map_err(|e| Error::BadParam(e.to_string()))?;

        settings.validate()?;

        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: VERSION,
            validation: Default::default(),
            revocation: Default::default(),
            batch: Default::default(),
        }
    }
}

impl SettingsValidate for Settings {
    fn validate(&self) -> Result<()> {
        if self.version > VERSION {
            return Err(Error::BadParam("settings version too new".into()));
        }
        self.validation.validate()?;
        self.revocation.validate()?;
        self.batch.validate()
    }
}
