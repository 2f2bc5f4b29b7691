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

//! Decoding of DER-encoded X.509 certificate revocation lists.

use chrono::{DateTime, Utc};
use thiserror::Error;
use x509_parser::{prelude::FromDer, revocation_list::CertificateRevocationList};

use crate::{
    internal::time::asn1_time_to_utc,
    x509::{serial_to_hex, signing_alg_for, verify_signed_data, SignatureVerificationError},
};

/// The subset of a CRL used by the revocation checker.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParsedCrl {
    /// Issuer distinguished name, rendered like certificate DNs.
    pub issuer_dn: String,

    /// `thisUpdate`
    pub this_update: DateTime<Utc>,

    /// `nextUpdate`, which is optional in the encoding.
    pub next_update: Option<DateTime<Utc>>,

    /// Revoked serial numbers as upper-case hex, in encounter order.
    pub revoked_serials: Vec<String>,
}

/// Describes errors that can occur while decoding a CRL.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum CrlParseError {
    /// The input is not a DER-encoded CRL.
    #[error("the CRL could not be decoded: {0}")]
    InvalidDer(String),

    /// An update timestamp is outside the supported range.
    #[error("the CRL update time is out of range")]
    InvalidUpdateTime,

    /// A revoked entry carries an empty serial number.
    #[error("the CRL contains a revoked entry without a serial number")]
    EmptySerialNumber,
}

/// Decode a DER-encoded CRL.
pub fn parse_crl(der: &[u8]) -> Result<ParsedCrl, CrlParseError> {
    let (_rem, crl) = CertificateRevocationList::from_der(der)
        .map_err(|err| CrlParseError::InvalidDer(err.to_string()))?;

    let this_update =
        asn1_time_to_utc(&crl.last_update()).ok_or(CrlParseError::InvalidUpdateTime)?;

    let next_update = match crl.next_update() {
        Some(t) => Some(asn1_time_to_utc(&t).ok_or(CrlParseError::InvalidUpdateTime)?),
        None => None,
    };

    let revoked_serials = crl
        .iter_revoked_certificates()
        .map(|revoked| serial_to_hex(revoked.raw_serial()).ok_or(CrlParseError::EmptySerialNumber))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParsedCrl {
        issuer_dn: crl.issuer().to_string(),
        this_update,
        next_update,
        revoked_serials,
    })
}

/// Verify the issuer's signature on a DER-encoded CRL.
pub fn verify_crl_signature(
    crl_der: &[u8],
    issuer_public_key: &[u8],
) -> Result<bool, SignatureVerificationError> {
    let (_rem, crl) = CertificateRevocationList::from_der(crl_der)
        .map_err(|err| SignatureVerificationError::InvalidSignedObject(err.to_string()))?;

    let alg = signing_alg_for(&crl.signature_algorithm).ok_or_else(|| {
        SignatureVerificationError::UnsupportedAlgorithm(
            crl.signature_algorithm.algorithm.to_id_string(),
        )
    })?;

    verify_signed_data(
        alg,
        crl.signature_value.as_ref(),
        crl.tbs_cert_list.as_ref(),
        issuer_public_key,
    )
}
