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

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Outcome of validating a certificate.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateStatus {
    Valid,
    Expired,
    NotYetValid,
    Revoked,
    Invalid,
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Valid => "VALID",
            Self::Expired => "EXPIRED",
            Self::NotYetValid => "NOT_YET_VALID",
            Self::Revoked => "REVOKED",
            Self::Invalid => "INVALID",
        })
    }
}

/// The five independent checks behind a [`ValidationResult`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ValidationChecks {
    pub signature_valid: bool,
    pub chain_valid: bool,
    pub not_revoked: bool,
    pub validity_valid: bool,
    pub constraints_valid: bool,
}

impl ValidationChecks {
    pub fn all_true() -> Self {
        Self {
            signature_valid: true,
            chain_valid: true,
            not_revoked: true,
            validity_valid: true,
            constraints_valid: true,
        }
    }

    pub fn all_false() -> Self {
        Self {
            signature_valid: false,
            chain_valid: false,
            not_revoked: false,
            validity_valid: false,
            constraints_valid: false,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.signature_valid
            && self.chain_valid
            && self.not_revoked
            && self.validity_valid
            && self.constraints_valid
    }
}

/// Immutable record of one validation run.
///
/// A result whose status is [`CertificateStatus::Valid`] always has every
/// check passed.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(try_from = "RawValidationResult")]
pub struct ValidationResult {
    overall_status: CertificateStatus,
    #[serde(flatten)]
    checks: ValidationChecks,
    validated_at: DateTime<Utc>,
    validation_duration_ms: u64,
}

#[derive(Deserialize)]
struct RawValidationResult {
    overall_status: CertificateStatus,
    #[serde(flatten)]
    checks: ValidationChecks,
    validated_at: DateTime<Utc>,
    validation_duration_ms: u64,
}

impl TryFrom<RawValidationResult> for ValidationResult {
    type Error = Error;

    fn try_from(raw: RawValidationResult) -> Result<Self> {
        let mut result = Self::of(
            raw.overall_status,
            raw.checks,
            raw.validation_duration_ms,
        )?;
        result.validated_at = raw.validated_at;
        Ok(result)
    }
}

impl ValidationResult {
    /// Create a result stamped with the current time.
    ///
    /// Returns [`Error::InvalidValidationResult`] if `status` is `VALID`
    /// but some check failed.
    pub fn of(
        status: CertificateStatus,
        checks: ValidationChecks,
        validation_duration_ms: u64,
    ) -> Result<Self> {
        if status == CertificateStatus::Valid && !checks.all_passed() {
            return Err(Error::InvalidValidationResult(format!(
                "status VALID with failed checks: {checks:?}"
            )));
        }

        Ok(Self {
            overall_status: status,
            checks,
            validated_at: Utc::now(),
            validation_duration_ms,
        })
    }

    /// Like [`ValidationResult::of`], but a `VALID` status with a failed
    /// check is downgraded to `INVALID`.
    pub fn reconciled(
        status: CertificateStatus,
        checks: ValidationChecks,
        validation_duration_ms: u64,
    ) -> Self {
        let status = if status == CertificateStatus::Valid && !checks.all_passed() {
            CertificateStatus::Invalid
        } else {
            status
        };

        Self {
            overall_status: status,
            checks,
            validated_at: Utc::now(),
            validation_duration_ms,
        }
    }

    /// A `VALID` result with all checks passed.
    pub fn valid(validation_duration_ms: u64) -> Self {
        Self::reconciled(
            CertificateStatus::Valid,
            ValidationChecks::all_true(),
            validation_duration_ms,
        )
    }

    /// An `INVALID` result with all checks failed.
    pub fn invalid(validation_duration_ms: u64) -> Self {
        Self::reconciled(
            CertificateStatus::Invalid,
            ValidationChecks::all_false(),
            validation_duration_ms,
        )
    }

    pub fn overall_status(&self) -> CertificateStatus {
        self.overall_status
    }

    pub fn checks(&self) -> ValidationChecks {
        self.checks
    }

    pub fn signature_valid(&self) -> bool {
        self.checks.signature_valid
    }

    pub fn chain_valid(&self) -> bool {
        self.checks.chain_valid
    }

    pub fn not_revoked(&self) -> bool {
        self.checks.not_revoked
    }

    pub fn validity_valid(&self) -> bool {
        self.checks.validity_valid
    }

    pub fn constraints_valid(&self) -> bool {
        self.checks.constraints_valid
    }

    pub fn validated_at(&self) -> DateTime<Utc> {
        self.validated_at
    }

    pub fn validation_duration_ms(&self) -> u64 {
        self.validation_duration_ms
    }

    pub fn is_valid(&self) -> bool {
        self.overall_status == CertificateStatus::Valid
    }

    pub fn all_checks_passed(&self) -> bool {
        self.checks.all_passed()
    }

    /// Copy of this result with `constraints_valid` forced to `false`.
    /// A `VALID` status becomes `INVALID`.
    pub(crate) fn with_constraints_failed(&self) -> Self {
        let mut checks = self.checks;
        checks.constraints_valid = false;

        let mut result = Self::reconciled(self.overall_status, checks, self.validation_duration_ms);
        result.validated_at = self.validated_at;
        result
    }

    pub(crate) fn with_duration(mut self, validation_duration_ms: u64) -> Self {
        self.validation_duration_ms = validation_duration_ms;
        self
    }
}
