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

//! Revocation status from the CRL of the issuing CSCA.
//!
//! Missing revocation data never makes a certificate invalid: if the
//! issuer country cannot be determined, no CRL is on file for it, or the
//! CRL on file is outside its update window, the certificate is treated as
//! not revoked. Each of these cases is logged as
//! [`REVOCATION_DATA_UNAVAILABLE`].

use std::{borrow::Cow, sync::Arc};

use chrono::Utc;
use log::{debug, warn};
use pkd_status_tracker::{log_item, validation_codes::*, StatusTracker};

use super::TrustChainError;
use crate::{
    model::{Certificate, CountryCode, IssuerName},
    settings::RevocationSettings,
    store::CrlStore,
};

/// Looks up certificates in the CRL of their issuing CSCA.
#[derive(Clone)]
pub struct RevocationChecker {
    crls: Arc<dyn CrlStore>,
    enabled: bool,
}

impl RevocationChecker {
    pub fn new(crls: Arc<dyn CrlStore>, settings: &RevocationSettings) -> Self {
        Self {
            crls,
            enabled: settings.enabled,
        }
    }

    /// Returns `false` only if a CRL inside its update window lists the
    /// certificate's serial number.
    pub fn is_not_revoked(
        &self,
        certificate: &Certificate,
        validation_log: &mut StatusTracker,
    ) -> bool {
        let label = certificate.id().to_string();

        if !self.enabled {
            log_item!(label, "revocation check disabled", "check_revocation")
                .validation_status(REVOCATION_CHECK_DISABLED)
                .informational(validation_log);
            return true;
        }

        let Some(country) = certificate
            .issuer()
            .country_code()
            .and_then(|c| CountryCode::parse(c).ok())
        else {
            unavailable(
                validation_log,
                label,
                format!(
                    "no country in issuer {}",
                    certificate.issuer().distinguished_name()
                ),
            );
            return true;
        };

        let issuer_name = IssuerName::for_country(&country);

        let Some(serial) = certificate.x509_data().serial_number() else {
            unavailable(validation_log, label, "certificate has no serial number");
            return true;
        };

        let crl = match self.crls.find_by_issuer_and_country(&issuer_name, &country) {
            Ok(Some(crl)) => crl,
            Ok(None) => {
                unavailable(validation_log, label, format!("no CRL on file for {issuer_name}"));
                return true;
            }
            Err(err) => {
                warn!("CRL lookup for {issuer_name} failed: {err}");
                unavailable(
                    validation_log,
                    label,
                    format!("CRL lookup for {issuer_name} failed"),
                );
                return true;
            }
        };

        if !crl.is_valid_at(Utc::now()) {
            unavailable(
                validation_log,
                label,
                format!(
                    "CRL for {issuer_name} is outside {}..{}",
                    crl.validity_period().this_update(),
                    crl.validity_period().next_update()
                ),
            );
            return true;
        }

        if crl.is_revoked(serial) {
            log_item!(
                label,
                format!("serial {serial} is revoked by {issuer_name}"),
                "check_revocation"
            )
            .validation_status(CERTIFICATE_REVOKED)
            .failure_no_throw(validation_log, TrustChainError::Revoked);

            false
        } else {
            log_item!(
                label,
                format!("serial {serial} is not on the CRL of {issuer_name}"),
                "check_revocation"
            )
            .validation_status(CERTIFICATE_NOT_REVOKED)
            .success(validation_log);

            true
        }
    }

    /// The negation of [`RevocationChecker::is_not_revoked`].
    pub fn is_revoked(
        &self,
        certificate: &Certificate,
        validation_log: &mut StatusTracker,
    ) -> bool {
        !self.is_not_revoked(certificate, validation_log)
    }
}

fn unavailable(
    validation_log: &mut StatusTracker,
    label: String,
    description: impl Into<Cow<'static, str>>,
) {
    let item = log_item!(label, description, "check_revocation")
        .validation_status(REVOCATION_DATA_UNAVAILABLE);
    debug!("{}: {}", item.label, item.description);
    item.informational(validation_log);
}
