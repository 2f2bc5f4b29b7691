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

//! Decoding of DER-encoded X.509 certificates into the handful of fields a
//! trust-chain validator needs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use x509_parser::{certificate::X509Certificate, prelude::FromDer};

use crate::{hash::sha256_fingerprint, internal::time::asn1_time_to_utc, raw_signature::SigningAlg};

mod verify;
pub(crate) use verify::signing_alg_for;
pub use verify::{verify_certificate_signature, verify_signed_data, SignatureVerificationError};

/// The Basic Constraints extension of a certificate.
///
/// A certificate without the extension is reported as
/// `BasicConstraints::default()` (not a CA, no path length).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BasicConstraints {
    /// `cA` flag.
    pub ca: bool,

    /// `pathLenConstraint`, if present.
    pub path_len_constraint: Option<u32>,
}

/// The Key Usage bits of a certificate.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct KeyUsageFlags {
    /// `digitalSignature`
    pub digital_signature: bool,

    /// `nonRepudiation` (a.k.a. `contentCommitment`)
    pub non_repudiation: bool,

    /// `keyEncipherment`
    pub key_encipherment: bool,

    /// `keyCertSign`
    pub key_cert_sign: bool,

    /// `cRLSign`
    pub crl_sign: bool,
}

/// The subset of an X.509 certificate used by the validation engine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParsedCertificate {
    /// Subject distinguished name, e.g. `C=QA, O=Ministry, CN=CSCA Qatar`.
    pub subject_dn: String,

    /// Issuer distinguished name, rendered the same way as `subject_dn`.
    pub issuer_dn: String,

    /// Serial number as upper-case hex without leading zero octets, or
    /// `None` when the certificate carries an empty serial.
    pub serial_number: Option<String>,

    /// SHA-256 of the whole DER encoding, 64 lower-case hex characters.
    pub fingerprint_sha256: String,

    /// Start of the validity window.
    pub not_before: DateTime<Utc>,

    /// End of the validity window.
    pub not_after: DateTime<Utc>,

    /// DER-encoded `SubjectPublicKeyInfo`.
    pub public_key: Vec<u8>,

    /// Basic Constraints (defaults when the extension is absent).
    pub basic_constraints: BasicConstraints,

    /// Key Usage bits, `None` when the extension is absent.
    pub key_usage: Option<KeyUsageFlags>,

    /// Algorithm the issuer used to sign this certificate, if recognized.
    pub signature_algorithm: Option<SigningAlg>,
}

/// Describes errors that can occur while decoding a certificate.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum CertificateParseError {
    /// The input is not a DER-encoded X.509 certificate.
    #[error("the certificate could not be decoded: {0}")]
    InvalidDer(String),

    /// A validity timestamp is outside the supported range.
    #[error("the certificate validity period is out of range")]
    InvalidValidity,

    /// An extension this crate interprets is malformed or duplicated.
    #[error("the certificate extension {0} is invalid")]
    InvalidExtension(&'static str),
}

/// Decode a DER-encoded X.509 certificate.
pub fn parse_certificate(der: &[u8]) -> Result<ParsedCertificate, CertificateParseError> {
    let (_rem, cert) = X509Certificate::from_der(der)
        .map_err(|err| CertificateParseError::InvalidDer(err.to_string()))?;

    let validity = cert.validity();
    let not_before =
        asn1_time_to_utc(&validity.not_before).ok_or(CertificateParseError::InvalidValidity)?;
    let not_after =
        asn1_time_to_utc(&validity.not_after).ok_or(CertificateParseError::InvalidValidity)?;

    let basic_constraints = cert
        .basic_constraints()
        .map_err(|_| CertificateParseError::InvalidExtension("basicConstraints"))?
        .map(|ext| BasicConstraints {
            ca: ext.value.ca,
            path_len_constraint: ext.value.path_len_constraint,
        })
        .unwrap_or_default();

    let key_usage = cert
        .key_usage()
        .map_err(|_| CertificateParseError::InvalidExtension("keyUsage"))?
        .map(|ext| KeyUsageFlags {
            digital_signature: ext.value.digital_signature(),
            non_repudiation: ext.value.non_repudiation(),
            key_encipherment: ext.value.key_encipherment(),
            key_cert_sign: ext.value.key_cert_sign(),
            crl_sign: ext.value.crl_sign(),
        });

    Ok(ParsedCertificate {
        subject_dn: cert.subject().to_string(),
        issuer_dn: cert.issuer().to_string(),
        serial_number: serial_to_hex(cert.tbs_certificate.raw_serial()),
        fingerprint_sha256: sha256_fingerprint(der),
        not_before,
        not_after,
        public_key: cert.public_key().raw.to_vec(),
        basic_constraints,
        key_usage,
        signature_algorithm: signing_alg_for(&cert.signature_algorithm),
    })
}

/// Return the DER-encoded `SubjectPublicKeyInfo` of a certificate.
pub fn public_key_der(der: &[u8]) -> Result<Vec<u8>, CertificateParseError> {
    let (_rem, cert) = X509Certificate::from_der(der)
        .map_err(|err| CertificateParseError::InvalidDer(err.to_string()))?;

    Ok(cert.public_key().raw.to_vec())
}

/// Render a DER integer's content octets as upper-case hex.
///
/// Leading zero octets (added by DER to keep the integer positive) are
/// dropped so the same serial renders identically in a certificate and in a
/// CRL entry.
pub fn serial_to_hex(raw: &[u8]) -> Option<String> {
    let last = raw.len().checked_sub(1)?;
    let start = raw.iter().position(|b| *b != 0).unwrap_or(last);
    Some(hex::encode_upper(&raw[start..]))
}
