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

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::{
    model::{
        CertificateStatus, ErrorSeverity, IssuerInfo, SubjectInfo, ValidationError,
        ValidationResult, ValidityPeriod,
    },
    Error, Result,
};

/// Opaque identity of a [`Certificate`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct CertificateId(Uuid);

impl CertificateId {
    /// A fresh random id.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for CertificateId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role of a certificate in the PKI hierarchy.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateType {
    /// Country Signing CA.
    Csca,
    /// Document Signer Certificate.
    Dsc,
    /// Document Signer Certificate, non-conformant.
    DscNc,
    /// Document Signer.
    Ds,
    Unknown,
}

impl CertificateType {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Csca => "CSCA",
            Self::Dsc => "DSC",
            Self::DscNc => "DSC_NC",
            Self::Ds => "DS",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for CertificateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CertificateType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CSCA" => Ok(Self::Csca),
            "DSC" => Ok(Self::Dsc),
            "DSC_NC" => Ok(Self::DscNc),
            "DS" => Ok(Self::Ds),
            "UNKNOWN" => Ok(Self::Unknown),
            _ => Err(Error::BadParam(format!("unknown certificate type {s:?}"))),
        }
    }
}

/// The binary form of a certificate and the identifiers derived from it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct X509Data {
    #[serde(serialize_with = "serialize_hex")]
    der: Vec<u8>,
    serial_number: Option<String>,
    fingerprint_sha256: String,
    #[serde(serialize_with = "serialize_hex")]
    public_key: Vec<u8>,
}

impl X509Data {
    /// Bundle DER, serial and fingerprint.
    ///
    /// The serial number, if any, must be hex and is upper-cased. The
    /// fingerprint must be 64 hex characters and is lower-cased.
    pub fn new(
        der: Vec<u8>,
        serial_number: Option<&str>,
        fingerprint_sha256: &str,
        public_key: Vec<u8>,
    ) -> Result<Self> {
        if der.is_empty() {
            return Err(Error::MissingField("der"));
        }

        let serial_number = serial_number
            .map(|serial| {
                let serial = serial.trim();
                if serial.is_empty() || !serial.chars().all(|c| c.is_ascii_hexdigit()) {
                    Err(Error::InvalidSerialNumber(serial.to_owned()))
                } else {
                    Ok(serial.to_ascii_uppercase())
                }
            })
            .transpose()?;

        let fingerprint = fingerprint_sha256.trim();
        if fingerprint.len() != 64 || !fingerprint.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidFingerprint(fingerprint.to_owned()));
        }

        Ok(Self {
            der,
            serial_number,
            fingerprint_sha256: fingerprint.to_ascii_lowercase(),
            public_key,
        })
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Upper-case hex serial number.
    pub fn serial_number(&self) -> Option<&str> {
        self.serial_number.as_deref()
    }

    /// Lower-case hex SHA-256 of [`X509Data::der`].
    pub fn fingerprint_sha256(&self) -> &str {
        &self.fingerprint_sha256
    }

    /// DER-encoded `SubjectPublicKeyInfo`.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }
}

fn serialize_hex<S: Serializer>(
    bytes: &[u8],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

/// A single X.509 certificate and its validation state.
///
/// `status` changes only through [`Certificate::record_validation`]. A
/// fresh certificate starts as `EXPIRED` or `NOT_YET_VALID` when its window
/// says so and `INVALID` otherwise; it never starts as `VALID`.
#[derive(Clone, Debug, Serialize)]
pub struct Certificate {
    id: CertificateId,
    x509_data: X509Data,
    subject: SubjectInfo,
    issuer: IssuerInfo,
    validity: ValidityPeriod,
    certificate_type: CertificateType,
    status: CertificateStatus,
    validation_result: Option<ValidationResult>,
    validation_errors: Vec<ValidationError>,
    source_upload_id: Option<Uuid>,
    uploaded_to_directory: bool,
    uploaded_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Certificate {
    /// Assemble a certificate from already decomposed parts.
    pub fn new(
        x509_data: X509Data,
        subject: SubjectInfo,
        issuer: IssuerInfo,
        validity: ValidityPeriod,
        certificate_type: CertificateType,
        source_upload_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();

        let status = if validity.is_expired_at(now) {
            CertificateStatus::Expired
        } else if validity.is_not_yet_valid_at(now) {
            CertificateStatus::NotYetValid
        } else {
            CertificateStatus::Invalid
        };

        Self {
            id: CertificateId::new(),
            x509_data,
            subject,
            issuer,
            validity,
            certificate_type,
            status,
            validation_result: None,
            validation_errors: Vec::new(),
            source_upload_id,
            uploaded_to_directory: false,
            uploaded_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Decode a DER certificate and build the aggregate from it.
    pub fn from_der(
        der: &[u8],
        certificate_type: CertificateType,
        source_upload_id: Option<Uuid>,
    ) -> Result<Self> {
        let parsed = pkd_crypto::x509::parse_certificate(der)?;

        let x509_data = X509Data::new(
            der.to_vec(),
            parsed.serial_number.as_deref(),
            &parsed.fingerprint_sha256,
            parsed.public_key,
        )?;

        Ok(Self::new(
            x509_data,
            SubjectInfo::from_dn(&parsed.subject_dn)?,
            IssuerInfo::from_dn(&parsed.issuer_dn, parsed.basic_constraints.ca)?,
            ValidityPeriod::new(parsed.not_before, parsed.not_after)?,
            certificate_type,
            source_upload_id,
        ))
    }

    pub fn id(&self) -> CertificateId {
        self.id
    }

    pub fn x509_data(&self) -> &X509Data {
        &self.x509_data
    }

    pub fn subject(&self) -> &SubjectInfo {
        &self.subject
    }

    pub fn issuer(&self) -> &IssuerInfo {
        &self.issuer
    }

    pub fn validity(&self) -> &ValidityPeriod {
        &self.validity
    }

    pub fn certificate_type(&self) -> CertificateType {
        self.certificate_type
    }

    pub fn status(&self) -> CertificateStatus {
        self.status
    }

    pub fn validation_result(&self) -> Option<&ValidationResult> {
        self.validation_result.as_ref()
    }

    pub fn validation_errors(&self) -> &[ValidationError] {
        &self.validation_errors
    }

    pub fn source_upload_id(&self) -> Option<Uuid> {
        self.source_upload_id
    }

    pub fn uploaded_to_directory(&self) -> bool {
        self.uploaded_to_directory
    }

    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        self.uploaded_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Adopt `result` as the current verdict.
    pub fn record_validation(&mut self, result: ValidationResult) {
        self.status = result.overall_status();
        self.validation_result = Some(result);
        self.updated_at = Utc::now();
    }

    /// Append `error` unless an equal one is already present.
    pub fn add_validation_error(&mut self, error: ValidationError) {
        if !self.validation_errors.contains(&error) {
            self.validation_errors.push(error);
        }
    }

    pub fn add_validation_errors(&mut self, errors: impl IntoIterator<Item = ValidationError>) {
        for error in errors {
            self.add_validation_error(error);
        }
    }

    pub fn clear_validation_errors(&mut self) {
        self.validation_errors.clear();
    }

    /// Called once the certificate has been published to the directory.
    pub fn mark_uploaded_to_directory(&mut self) {
        let now = Utc::now();
        self.uploaded_to_directory = true;
        self.uploaded_at = Some(now);
        self.updated_at = now;
    }

    pub fn is_valid(&self) -> bool {
        self.status == CertificateStatus::Valid
    }

    pub fn is_revoked(&self) -> bool {
        self.status == CertificateStatus::Revoked
    }

    /// `true` once the current time is past `not_after`.
    pub fn is_expired(&self) -> bool {
        self.validity.is_expired_at(Utc::now())
    }

    pub fn is_not_yet_valid(&self) -> bool {
        self.validity.is_not_yet_valid_at(Utc::now())
    }

    pub fn is_currently_valid(&self) -> bool {
        self.validity.contains(Utc::now())
    }

    /// The issuer's CA flag.
    pub fn is_ca(&self) -> bool {
        self.issuer.is_ca()
    }

    /// CA flag set and issuer DN literally equal to subject DN.
    pub fn is_self_signed(&self) -> bool {
        self.is_ca() && self.issuer.distinguished_name() == self.subject.distinguished_name()
    }

    pub fn days_until_expiration(&self) -> i64 {
        self.validity.days_until_expiration(Utc::now())
    }

    /// Not yet expired, and expires within `threshold_days`.
    pub fn is_expiring_soon(&self, threshold_days: i64) -> bool {
        !self.is_expired() && self.days_until_expiration() <= threshold_days
    }

    pub fn has_critical_errors(&self) -> bool {
        self.validation_errors.iter().any(ValidationError::is_critical)
    }

    /// At least one finding and none of them critical.
    pub fn has_only_warnings(&self) -> bool {
        !self.validation_errors.is_empty()
            && self
                .validation_errors
                .iter()
                .all(|e| e.severity() == ErrorSeverity::Warning)
    }
}
