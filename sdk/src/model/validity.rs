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

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The `notBefore` / `notAfter` window of a certificate.
///
/// `not_before` is strictly earlier than `not_after`, by at least one second.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ValidityPeriod {
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
}

impl ValidityPeriod {
    /// Create a validity window, rejecting empty or inverted windows.
    pub fn new(not_before: DateTime<Utc>, not_after: DateTime<Utc>) -> Result<Self> {
        if not_after - not_before < Duration::seconds(1) {
            return Err(Error::InvalidValidityPeriod(format!(
                "not_before {not_before} must be at least one second before not_after {not_after}"
            )));
        }

        Ok(Self {
            not_before,
            not_after,
        })
    }

    pub fn not_before(&self) -> DateTime<Utc> {
        self.not_before
    }

    pub fn not_after(&self) -> DateTime<Utc> {
        self.not_after
    }

    /// `true` once `at` is past `not_after`.
    pub fn is_expired_at(&self, at: DateTime<Utc>) -> bool {
        at > self.not_after
    }

    /// `true` while `at` is before `not_before`.
    pub fn is_not_yet_valid_at(&self, at: DateTime<Utc>) -> bool {
        at < self.not_before
    }

    /// `true` if `not_before <= at <= not_after`.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        !self.is_expired_at(at) && !self.is_not_yet_valid_at(at)
    }

    /// Whole days from `at` until `not_after`; negative once expired.
    pub fn days_until_expiration(&self, at: DateTime<Utc>) -> i64 {
        (self.not_after - at).num_days()
    }
}
