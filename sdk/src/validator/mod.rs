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

//! Trust chain validation.
//!
//! [`TrustChainValidator`] checks a trust path from a CSCA trust anchor down
//! to a document signer. Each step records its findings in a
//! [`StatusTracker`] using the codes in
//! [`validation_codes`](pkd_status_tracker::validation_codes); the verdict
//! itself is returned as a [`ValidationResult`].
//!
//! Validation never fails with an error except when a trust path names a
//! certificate that is not in the store. Anything else that goes wrong
//! becomes an `INVALID` result with every check failed.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use pkd_status_tracker::{log_item, validation_codes::*, LogKind, StatusTracker};
use thiserror::Error;

use crate::{
    model::{
        Certificate, CertificateStatus, ErrorSeverity, TrustPath, ValidationChecks,
        ValidationError, ValidationResult,
    },
    settings::Settings,
    store::{CertificateStore, CrlStore},
    utils::time_it::TimeIt,
    verifier::{CertificateVerifier, NativeVerifier},
    Error, Result,
};

mod chain;
pub use chain::ChainBuildResult;

mod constraints;

mod revocation;
pub use revocation::RevocationChecker;

/// Describes why a validation step failed.
///
/// These are recorded as the error value of failure log items; they are
/// not returned from validation.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum TrustChainError {
    #[error("the trust anchor is not self-signed")]
    NotSelfSigned,

    #[error("the trust anchor is not a CA")]
    NotCa,

    #[error("the certificate has expired")]
    Expired,

    #[error("the certificate is not yet valid")]
    NotYetValid,

    #[error("the signature does not verify under the issuer key")]
    SignatureMismatch,

    #[error("the issuer DN does not match the parent subject DN")]
    IssuerMismatch,

    #[error("the certificate serial number is on the issuer CRL")]
    Revoked,

    #[error("a certificate referenced by the trust path is not in the store")]
    CertificateNotFound,

    #[error("no trust anchor could be reached")]
    ChainIncomplete,

    #[error("validation could not be completed: {0}")]
    Internal(String),
}

/// Validates certificates against the trust anchors in a
/// [`CertificateStore`].
///
/// The validator holds no mutable state and may be shared between threads.
pub struct TrustChainValidator {
    certificates: Arc<dyn CertificateStore>,
    verifier: Arc<dyn CertificateVerifier>,
    revocation: RevocationChecker,
    settings: Settings,
}

impl TrustChainValidator {
    /// Create a validator using the native `pkd-crypto` verifier.
    pub fn new(
        certificates: Arc<dyn CertificateStore>,
        crls: Arc<dyn CrlStore>,
        settings: Settings,
    ) -> Self {
        Self::with_verifier(certificates, crls, Arc::new(NativeVerifier), settings)
    }

    /// Create a validator with a custom cryptographic verifier.
    pub fn with_verifier(
        certificates: Arc<dyn CertificateStore>,
        crls: Arc<dyn CrlStore>,
        verifier: Arc<dyn CertificateVerifier>,
        settings: Settings,
    ) -> Self {
        let revocation = RevocationChecker::new(crls, &settings.revocation);

        Self {
            certificates,
            verifier,
            revocation,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn revocation_checker(&self) -> &RevocationChecker {
        &self.revocation
    }

    /// Validate the certificates referenced by `path`, anchor first.
    ///
    /// The anchor is checked with
    /// [`validate_trust_anchor`](Self::validate_trust_anchor), then every
    /// parent / child pair with
    /// [`validate_issuer_relationship`](Self::validate_issuer_relationship).
    /// A two element path additionally gets
    /// [`validate_intermediate`](Self::validate_intermediate) on its leaf,
    /// which adds the leaf validity window and revocation. The first failing
    /// step decides the result.
    ///
    /// Returns [`Error::CertificateNotFound`] if an id in `path` is not in
    /// the store.
    pub fn validate(
        &self,
        path: &TrustPath,
        validation_log: &mut StatusTracker,
    ) -> Result<ValidationResult> {
        let timer = TimeIt::new("validate");

        let mut certificates = Vec::with_capacity(path.depth());
        for id in path.ids() {
            match self.certificates.find_by_id(id) {
                Ok(Some(certificate)) => certificates.push(certificate),

                Ok(None) => {
                    log_item!(id.to_string(), "certificate not found", "validate")
                        .validation_status(CERTIFICATE_NOT_FOUND)
                        .failure_no_throw(validation_log, TrustChainError::CertificateNotFound);

                    return Err(Error::CertificateNotFound { id: *id });
                }

                Err(err) => {
                    return Ok(internal_failure(validation_log, "validate", &err)
                        .with_duration(timer.elapsed_ms()));
                }
            }
        }

        Ok(self
            .guarded(validation_log, "validate", |log| {
                self.check_path(&certificates, log)
            })
            .with_duration(timer.elapsed_ms()))
    }

    /// Check the validity window of `certificate` alone.
    ///
    /// No chain is evaluated, so `chain_valid` is always `false` and the
    /// result is never `VALID`: it is `EXPIRED` past `not_after` and
    /// `INVALID` otherwise.
    pub fn validate_single(
        &self,
        certificate: &Certificate,
        validation_log: &mut StatusTracker,
    ) -> ValidationResult {
        let timer = TimeIt::new("validate_single");

        let validity_valid = self.check_validity(certificate, validation_log);

        let status = if certificate.validity().is_expired_at(Utc::now()) {
            CertificateStatus::Expired
        } else {
            CertificateStatus::Invalid
        };

        ValidationResult::reconciled(
            status,
            ValidationChecks {
                signature_valid: false,
                chain_valid: false,
                not_revoked: true,
                validity_valid,
                constraints_valid: true,
            },
            timer.elapsed_ms(),
        )
    }

    /// Check that `candidate` qualifies as a trust anchor.
    ///
    /// The checks run in order: self-issued (issuer DN equals subject DN),
    /// CA flag, validity window, self-signature. The first failure decides
    /// the result.
    pub fn validate_trust_anchor(
        &self,
        candidate: &Certificate,
        validation_log: &mut StatusTracker,
    ) -> ValidationResult {
        let timer = TimeIt::new("validate_trust_anchor");

        self.guarded(validation_log, "validate_trust_anchor", |log| {
            self.check_anchor(candidate, log)
        })
        .with_duration(timer.elapsed_ms())
    }

    /// Check that `parent` issued `child` and that `child` is currently
    /// usable: DN linkage, signature, validity window and revocation.
    ///
    /// When invalid, the status is `EXPIRED` if `child` has expired,
    /// otherwise `REVOKED` if it is revoked, otherwise `INVALID`.
    pub fn validate_intermediate(
        &self,
        child: &Certificate,
        parent: &Certificate,
        validation_log: &mut StatusTracker,
    ) -> ValidationResult {
        let timer = TimeIt::new("validate_intermediate");

        self.guarded(validation_log, "validate_intermediate", |log| {
            self.check_intermediate(child, parent, log)
        })
        .with_duration(timer.elapsed_ms())
    }

    /// Check DN linkage and signature between `child` and `parent` only.
    pub fn validate_issuer_relationship(
        &self,
        child: &Certificate,
        parent: &Certificate,
        validation_log: &mut StatusTracker,
    ) -> ValidationResult {
        let timer = TimeIt::new("validate_issuer_relationship");

        self.guarded(validation_log, "validate_issuer_relationship", |log| {
            self.check_issuer_relationship(child, parent, log)
        })
        .with_duration(timer.elapsed_ms())
    }

    /// Run a full validation of `certificate` and record the outcome on it.
    ///
    /// Previous findings are cleared, the chain is built from the store and
    /// validated, and the per-role structural rules are applied. Warning
    /// and failure findings are added to the certificate's validation
    /// errors and the result becomes its new status.
    pub fn validate_certificate(&self, certificate: &mut Certificate) -> ValidationResult {
        let timer = TimeIt::new("validate_certificate");
        certificate.clear_validation_errors();

        let mut validation_log = StatusTracker::default();
        let result = self
            .guarded(&mut validation_log, "validate_certificate", |log| {
                self.full_validation(certificate, log)
            })
            .with_duration(timer.elapsed_ms());

        certificate.add_validation_errors(findings(&validation_log));
        certificate.record_validation(result.clone());

        info!(
            "certificate {} ({}) validated as {} in {} ms",
            certificate.id(),
            certificate.certificate_type(),
            result.overall_status(),
            result.validation_duration_ms()
        );

        result
    }

    fn full_validation(
        &self,
        certificate: &Certificate,
        log: &mut StatusTracker,
    ) -> Result<ValidationResult> {
        let chain = self.build_chain(certificate, log)?;

        let result = if chain.is_anchored() {
            self.check_path(&chain.anchor_first(), log)?
        } else {
            log_item!(
                certificate.id().to_string(),
                format!(
                    "no trust anchor found for issuer {}",
                    certificate.issuer().distinguished_name()
                ),
                "validate_certificate"
            )
            .validation_status(CHAIN_INCOMPLETE)
            .failure_no_throw(log, TrustChainError::ChainIncomplete);

            self.check_unanchored(certificate, log)
        };

        if self.check_constraints(certificate, log) {
            Ok(result)
        } else {
            Ok(result.with_constraints_failed())
        }
    }

    // Shared by `validate` and `validate_certificate`; `certificates` is
    // ordered anchor first.
    fn check_path(
        &self,
        certificates: &[Certificate],
        log: &mut StatusTracker,
    ) -> Result<ValidationResult> {
        let Some(anchor) = certificates.first() else {
            return Err(Error::EmptyTrustPath);
        };

        let result = self.check_anchor(anchor, log)?;
        if !result.is_valid() {
            return Ok(result);
        }

        for pair in certificates.windows(2) {
            if let [parent, child] = pair {
                let linkage = self.check_issuer_relationship(child, parent, log)?;
                if !linkage.is_valid() {
                    return Ok(linkage);
                }
            }
        }

        if let [anchor, document_signer] = certificates {
            return self.check_intermediate(document_signer, anchor, log);
        }

        Ok(result)
    }

    fn check_anchor(
        &self,
        candidate: &Certificate,
        log: &mut StatusTracker,
    ) -> Result<ValidationResult> {
        let label = candidate.id().to_string();
        let subject_dn = candidate.subject().distinguished_name();

        // Fatal checks: no signature verification is attempted after these.
        let fatal = ValidationChecks {
            signature_valid: false,
            chain_valid: false,
            not_revoked: true,
            validity_valid: false,
            constraints_valid: false,
        };

        if candidate.issuer().distinguished_name() != subject_dn {
            log_item!(
                label,
                format!("trust anchor {subject_dn} is not self-signed"),
                "validate_trust_anchor"
            )
            .validation_status(NOT_SELF_SIGNED)
            .failure_no_throw(log, TrustChainError::NotSelfSigned);

            return ValidationResult::of(CertificateStatus::Invalid, fatal, 0);
        }

        if !candidate.is_ca() {
            log_item!(
                label,
                format!("trust anchor {subject_dn} is not a CA"),
                "validate_trust_anchor"
            )
            .validation_status(NOT_CA)
            .failure_no_throw(log, TrustChainError::NotCa);

            return ValidationResult::of(CertificateStatus::Invalid, fatal, 0);
        }

        if !self.check_validity(candidate, log) {
            let status = if candidate.validity().is_expired_at(Utc::now()) {
                CertificateStatus::Expired
            } else {
                CertificateStatus::NotYetValid
            };

            return ValidationResult::of(
                status,
                ValidationChecks {
                    signature_valid: false,
                    validity_valid: false,
                    ..ValidationChecks::all_true()
                },
                0,
            );
        }

        if !self.signature_verifies(candidate, candidate, "validate_trust_anchor", log)? {
            return ValidationResult::of(
                CertificateStatus::Invalid,
                ValidationChecks {
                    signature_valid: false,
                    chain_valid: false,
                    ..ValidationChecks::all_true()
                },
                0,
            );
        }

        log_item!(label, "trust anchor validated", "validate_trust_anchor")
            .validation_status(TRUST_ANCHOR_VALIDATED)
            .success(log);

        Ok(ValidationResult::valid(0))
    }

    fn check_issuer_relationship(
        &self,
        child: &Certificate,
        parent: &Certificate,
        log: &mut StatusTracker,
    ) -> Result<ValidationResult> {
        let label = child.id().to_string();

        if !self.issuer_dn_matches(child, parent, log) {
            return ValidationResult::of(
                CertificateStatus::Invalid,
                ValidationChecks {
                    chain_valid: false,
                    ..ValidationChecks::all_true()
                },
                0,
            );
        }

        if !self
            .signature_verifies(child, parent, "validate_issuer_relationship", log)?
        {
            return ValidationResult::of(
                CertificateStatus::Invalid,
                ValidationChecks {
                    signature_valid: false,
                    chain_valid: false,
                    ..ValidationChecks::all_true()
                },
                0,
            );
        }

        log_item!(
            label,
            format!("issued by {}", parent.subject().distinguished_name()),
            "validate_issuer_relationship"
        )
        .validation_status(ISSUER_VALIDATED)
        .success(log);

        Ok(ValidationResult::valid(0))
    }

    fn check_intermediate(
        &self,
        child: &Certificate,
        parent: &Certificate,
        log: &mut StatusTracker,
    ) -> Result<ValidationResult> {
        let dn_matches = self.issuer_dn_matches(child, parent, log);
        let signature_valid = dn_matches
            && self.signature_verifies(child, parent, "validate_intermediate", log)?;
        let validity_valid = self.check_validity(child, log);
        let not_revoked = self.revocation.is_not_revoked(child, log);

        let checks = ValidationChecks {
            signature_valid,
            chain_valid: dn_matches && signature_valid,
            not_revoked,
            validity_valid,
            constraints_valid: true,
        };

        Ok(ValidationResult::reconciled(
            failure_status(child, &checks),
            checks,
            0,
        ))
    }

    // A leaf whose issuer could not be resolved: only its own validity and
    // revocation can be evaluated.
    fn check_unanchored(
        &self,
        certificate: &Certificate,
        log: &mut StatusTracker,
    ) -> ValidationResult {
        let checks = ValidationChecks {
            signature_valid: false,
            chain_valid: false,
            not_revoked: self.revocation.is_not_revoked(certificate, log),
            validity_valid: self.check_validity(certificate, log),
            constraints_valid: true,
        };

        ValidationResult::reconciled(failure_status(certificate, &checks), checks, 0)
    }

    fn issuer_dn_matches(
        &self,
        child: &Certificate,
        parent: &Certificate,
        log: &mut StatusTracker,
    ) -> bool {
        let issuer_dn = child.issuer().distinguished_name();
        let parent_dn = parent.subject().distinguished_name();

        if issuer_dn == parent_dn {
            return true;
        }

        log_item!(
            child.id().to_string(),
            format!("issuer {issuer_dn} does not match parent subject {parent_dn}"),
            "validate_issuer_relationship"
        )
        .validation_status(ISSUER_MISMATCH)
        .failure_no_throw(log, TrustChainError::IssuerMismatch);

        false
    }

    // A signature the issuer's key cannot evaluate counts as not verifying.
    // Only an undecodable issuer certificate is an internal failure.
    fn signature_verifies(
        &self,
        child: &Certificate,
        parent: &Certificate,
        function: &'static str,
        log: &mut StatusTracker,
    ) -> Result<bool> {
        let parent_key = self.verifier.public_key(parent.x509_data().der())?;
        let parent_dn = parent.subject().distinguished_name();

        let description = match self
            .verifier
            .verify_signature(child.x509_data().der(), &parent_key)
        {
            Ok(true) => return Ok(true),
            Ok(false) => format!("signature does not verify under the key of {parent_dn}"),
            Err(Error::SignatureVerification(err)) => {
                format!("signature cannot be verified under the key of {parent_dn}: {err}")
            }
            Err(err) => return Err(err),
        };

        log_item!(child.id().to_string(), description, function)
            .validation_status(SIGNATURE_INVALID)
            .failure_no_throw(log, TrustChainError::SignatureMismatch);

        Ok(false)
    }

    fn check_validity(&self, certificate: &Certificate, log: &mut StatusTracker) -> bool {
        let now = Utc::now();
        let validity = certificate.validity();
        let label = certificate.id().to_string();

        if validity.is_expired_at(now) {
            log_item!(
                label,
                format!("certificate expired at {}", validity.not_after()),
                "check_validity"
            )
            .validation_status(CERTIFICATE_EXPIRED)
            .failure_no_throw(log, TrustChainError::Expired);

            false
        } else if validity.is_not_yet_valid_at(now) {
            log_item!(
                label,
                format!("certificate not valid before {}", validity.not_before()),
                "check_validity"
            )
            .validation_status(CERTIFICATE_NOT_YET_VALID)
            .failure_no_throw(log, TrustChainError::NotYetValid);

            false
        } else {
            let threshold = self.settings.validation.expiring_soon_threshold_days;
            if certificate.is_expiring_soon(threshold) {
                debug!(
                    "certificate {label} expires in {} days",
                    certificate.days_until_expiration()
                );
            }

            log_item!(label, "certificate inside validity period", "check_validity")
                .validation_status(CERTIFICATE_INSIDE_VALIDITY)
                .success(log);

            true
        }
    }

    // Converts an internal failure of `f` into an all-false INVALID result.
    fn guarded<F>(&self, log: &mut StatusTracker, function: &'static str, f: F) -> ValidationResult
    where
        F: FnOnce(&mut StatusTracker) -> Result<ValidationResult>,
    {
        match f(log) {
            Ok(result) => result,
            Err(err) => internal_failure(log, function, &err),
        }
    }
}

// EXPIRED takes precedence over REVOKED, which takes precedence over INVALID.
fn failure_status(certificate: &Certificate, checks: &ValidationChecks) -> CertificateStatus {
    if checks.all_passed() {
        CertificateStatus::Valid
    } else if certificate.validity().is_expired_at(Utc::now()) {
        CertificateStatus::Expired
    } else if !checks.not_revoked {
        CertificateStatus::Revoked
    } else {
        CertificateStatus::Invalid
    }
}

fn internal_failure(
    log: &mut StatusTracker,
    function: &'static str,
    err: &Error,
) -> ValidationResult {
    warn!("{function} failed: {err}");

    log_item!(function, format!("validation failed: {err}"), function)
        .validation_status(VALIDATION_ERROR)
        .failure_no_throw(log, TrustChainError::Internal(err.to_string()));

    ValidationResult::invalid(0)
}

/// Warning and failure items of `log` as certificate findings.
fn findings(log: &StatusTracker) -> Vec<ValidationError> {
    log.logged_items()
        .iter()
        .filter_map(|item| {
            let severity = match item.kind {
                LogKind::Failure => ErrorSeverity::Error,
                LogKind::Warning => ErrorSeverity::Warning,
                LogKind::Success | LogKind::Informational => return None,
            };

            let code = item
                .validation_status
                .as_deref()
                .unwrap_or(VALIDATION_ERROR)
                .to_owned();

            Some(ValidationError::from_trusted(
                code,
                item.description.to_string(),
                severity,
            ))
        })
        .collect()
}
