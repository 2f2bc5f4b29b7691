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

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How serious a [`ValidationError`] is.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorSeverity {
    Error,
    Warning,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
        })
    }
}

/// A single problem found while validating a certificate.
///
/// Two errors are equal when code, message and severity match; the time
/// at which they occurred is not compared.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ValidationError {
    code: String,
    message: String,
    severity: ErrorSeverity,
    occurred_at: DateTime<Utc>,
}

impl ValidationError {
    /// Create an error. `code` must be non-empty and made of upper-case
    /// ASCII letters, digits and underscores; `message` must not be blank.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: ErrorSeverity,
    ) -> Result<Self> {
        let code = code.into();
        let message = message.into();

        if code.is_empty()
            || !code
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(Error::InvalidValidationError(format!(
                "bad error code {code:?}"
            )));
        }

        if message.trim().is_empty() {
            return Err(Error::InvalidValidationError(format!(
                "empty message for {code}"
            )));
        }

        Ok(Self::from_trusted(code, message, severity))
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Result<Self> {
        Self::new(code, message, ErrorSeverity::Error)
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Result<Self> {
        Self::new(code, message, ErrorSeverity::Warning)
    }

    /// Used for codes from the validation code table, which are known to
    /// be well formed.
    pub(crate) fn from_trusted(code: String, message: String, severity: ErrorSeverity) -> Self {
        Self {
            code,
            message,
            severity,
            occurred_at: Utc::now(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> ErrorSeverity {
        self.severity
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// `true` for [`ErrorSeverity::Error`].
    pub fn is_critical(&self) -> bool {
        self.severity == ErrorSeverity::Error
    }
}

impl PartialEq for ValidationError {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.message == other.message && self.severity == other.severity
    }
}

impl Eq for ValidationError {}

impl Hash for ValidationError {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
        self.message.hash(state);
        self.severity.hash(state);
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)
    }
}
