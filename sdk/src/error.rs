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

use pkd_crypto::{crl::CrlParseError, x509::CertificateParseError, x509::SignatureVerificationError};
use thiserror::Error;

use crate::model::CertificateId;

/// `Error` enumerates errors returned by pkd-trust operations.
///
/// Construction errors are returned by the factories of the domain model
/// and are never swallowed. During validation only
/// [`Error::CertificateNotFound`] escapes to the caller; every other failure
/// is recorded in the validation verdict.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    // --- construction errors ---
    /// A required field is missing or blank.
    #[error("required field {0} is missing or blank")]
    MissingField(&'static str),

    /// A country code is not two ASCII letters.
    #[error("invalid country code {0:?}")]
    InvalidCountryCode(String),

    /// A CRL issuer name does not follow the `CSCA-<country>` pattern.
    #[error("invalid CRL issuer name {0:?}")]
    InvalidIssuerName(String),

    /// A CRL's issuer name and country code disagree.
    #[error("issuer name {issuer_name} does not match country {country_code}")]
    CountryMismatch {
        issuer_name: String,
        country_code: String,
    },

    #[error("invalid validity period: {0}")]
    InvalidValidityPeriod(String),

    #[error("a trust path needs at least one certificate")]
    EmptyTrustPath,

    #[error("trust path depth {depth} exceeds the maximum of {max}")]
    TrustPathTooLong { depth: usize, max: usize },

    #[error("certificate {0} appears more than once in the trust path")]
    DuplicateTrustPathEntry(CertificateId),

    #[error("trust path contains a nil certificate id")]
    NullTrustPathEntry,

    /// A fingerprint is not 64 hex characters.
    #[error("invalid SHA-256 fingerprint {0:?}")]
    InvalidFingerprint(String),

    /// A serial number is empty or not hex.
    #[error("invalid serial number {0:?}")]
    InvalidSerialNumber(String),

    /// A validation result violates `VALID ⇒ all checks passed`.
    #[error("invalid validation result: {0}")]
    InvalidValidationResult(String),

    #[error("invalid validation error: {0}")]
    InvalidValidationError(String),

    /// A CRL was not issued and signed by the CSCA it was ingested for.
    #[error("CRL is not signed by {csca_dn}")]
    CrlNotSignedByIssuer { csca_dn: String },

    // --- lookup errors ---
    /// A certificate referenced by a trust path is not in the store.
    #[error("certificate {id} not found")]
    CertificateNotFound { id: CertificateId },

    /// The backing store failed.
    #[error("store error: {0}")]
    StoreError(String),

    // --- decoding errors ---
    #[error(transparent)]
    CertificateParse(#[from] CertificateParseError),

    #[error(transparent)]
    CrlParse(#[from] CrlParseError),

    #[error(transparent)]
    SignatureVerification(#[from] SignatureVerificationError),

    // --- settings and other errors ---
    #[error("bad parameter: {0}")]
    BadParam(String),

    /// The settings format is neither JSON nor TOML.
    #[error("type is unsupported")]
    UnsupportedType,

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    TomlSerializationError(#[from] toml::ser::Error),

    #[error(transparent)]
    OtherError(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// A specialized `Result` type for pkd-trust operations.
pub type Result<T> = std::result::Result<T, Error>;
