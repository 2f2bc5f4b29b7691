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

//! Structural rules per certificate role.

use std::borrow::Cow;

use pkd_status_tracker::{log_item, validation_codes::*, StatusTracker};

use super::{TrustChainError, TrustChainValidator};
use crate::{
    model::{Certificate, CertificateType},
    verifier::CertificateExtensions,
};

impl TrustChainValidator {
    /// Apply the Basic Constraints and Key Usage rules of the certificate's
    /// type.
    ///
    /// Rule violations are logged as warnings, or as failures when
    /// `validation.strict_key_usage` is set. Returns `false` only for a
    /// violation in strict mode, or when the extensions cannot be read.
    pub fn check_constraints(
        &self,
        certificate: &Certificate,
        validation_log: &mut StatusTracker,
    ) -> bool {
        let label = certificate.id().to_string();

        let extensions = match self.verifier.extensions(certificate.x509_data().der()) {
            Ok(extensions) => extensions,
            Err(err) => {
                log_item!(
                    label,
                    format!("extensions could not be read: {err}"),
                    "check_constraints"
                )
                .validation_status(VALIDATION_ERROR)
                .failure_no_throw(validation_log, TrustChainError::Internal(err.to_string()));

                return false;
            }
        };

        if let Some(path_len) = extensions.basic_constraints.path_len_constraint {
            log_item!(
                label.clone(),
                format!("path length constraint {path_len}"),
                "check_constraints"
            )
            .validation_status(PATH_LENGTH_CONSTRAINT_PRESENT)
            .informational(validation_log);
        }

        let strict = self.settings.validation.strict_key_usage;
        let rules = RoleRules {
            label: &label,
            extensions: &extensions,
            strict,
        };

        let satisfied = match certificate.certificate_type() {
            CertificateType::Csca => rules.validate_csca(validation_log),
            CertificateType::Dsc => rules.validate_dsc(validation_log),
            CertificateType::DscNc => rules.validate_dsc_nc(validation_log),
            CertificateType::Ds => rules.validate_ds(validation_log),
            CertificateType::Unknown => true,
        };

        if satisfied {
            log_item!(label, "structural constraints satisfied", "check_constraints")
                .validation_status(CONSTRAINTS_VALIDATED)
                .success(validation_log);
        }

        satisfied || !strict
    }
}

struct RoleRules<'a> {
    label: &'a str,
    extensions: &'a CertificateExtensions,
    strict: bool,
}

impl RoleRules<'_> {
    fn validate_csca(&self, log: &mut StatusTracker) -> bool {
        let mut satisfied = true;

        if !self.extensions.basic_constraints.ca {
            self.violation(log, BASIC_CONSTRAINTS_INVALID, "CSCA is not marked as a CA");
            satisfied = false;
        }

        match self.extensions.key_usage {
            None => {
                self.violation(log, KEY_USAGE_MISSING, "CSCA has no key usage extension");
                satisfied = false;
            }

            Some(key_usage) => {
                if !key_usage.key_cert_sign {
                    self.violation(
                        log,
                        KEY_USAGE_KEY_CERT_SIGN_MISSING,
                        "CSCA key usage lacks keyCertSign",
                    );
                    satisfied = false;
                }

                // Never more than a warning, even in strict mode.
                if !key_usage.crl_sign {
                    log_item!(
                        self.label.to_owned(),
                        "CSCA key usage lacks cRLSign",
                        "validate_csca"
                    )
                    .validation_status(KEY_USAGE_CRL_SIGN_MISSING)
                    .warning(log);
                }
            }
        }

        satisfied
    }

    fn validate_dsc(&self, log: &mut StatusTracker) -> bool {
        self.validate_document_signer(log, "DSC")
    }

    fn validate_dsc_nc(&self, log: &mut StatusTracker) -> bool {
        self.validate_document_signer(log, "DSC_NC")
    }

    fn validate_ds(&self, log: &mut StatusTracker) -> bool {
        self.validate_document_signer(log, "DS")
    }

    fn validate_document_signer(&self, log: &mut StatusTracker, role: &str) -> bool {
        let mut satisfied = true;

        if self.extensions.basic_constraints.ca {
            self.violation(
                log,
                BASIC_CONSTRAINTS_INVALID,
                format!("{role} must not be a CA"),
            );
            satisfied = false;
        }

        match self.extensions.key_usage {
            None => {
                self.violation(
                    log,
                    KEY_USAGE_MISSING,
                    format!("{role} has no key usage extension"),
                );
                satisfied = false;
            }

            Some(key_usage) => {
                if !key_usage.digital_signature {
                    self.violation(
                        log,
                        KEY_USAGE_DIGITAL_SIGNATURE_MISSING,
                        format!("{role} key usage lacks digitalSignature"),
                    );
                    satisfied = false;
                }

                if key_usage.key_cert_sign {
                    self.violation(
                        log,
                        KEY_USAGE_KEY_CERT_SIGN_NOT_ALLOWED,
                        format!("{role} key usage must not include keyCertSign"),
                    );
                    satisfied = false;
                }
            }
        }

        satisfied
    }

    fn violation(
        &self,
        log: &mut StatusTracker,
        code: &'static str,
        description: impl Into<Cow<'static, str>>,
    ) {
        log_item!(self.label.to_owned(), description, "check_constraints")
            .validation_status(code)
            .warning_or_failure(log, self.strict);
    }
}
