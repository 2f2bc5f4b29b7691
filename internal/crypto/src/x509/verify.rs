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

use asn1_rs::{Any, Class, FromDer, Header, Tag};
use log::debug;
use thiserror::Error;
use x509_parser::{certificate::X509Certificate, x509::AlgorithmIdentifier};

use crate::raw_signature::{
    oids::*, validator_for_signing_alg, RawSignatureValidationError, SigningAlg,
};

/// Describes errors that prevent a certificate signature from being
/// evaluated at all.
///
/// A signature that simply does not match is not an error; it is reported as
/// `Ok(false)`.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum SignatureVerificationError {
    /// The signed object could not be decoded.
    #[error("the signed object could not be decoded: {0}")]
    InvalidSignedObject(String),

    /// The signature algorithm is not one this crate can verify.
    #[error("unsupported signature algorithm {0}")]
    UnsupportedAlgorithm(String),

    /// The issuer key or the signature value is malformed.
    #[error(transparent)]
    RawSignature(#[from] RawSignatureValidationError),
}

/// Verify the signature on a DER-encoded certificate using the issuer's
/// DER-encoded `SubjectPublicKeyInfo`.
///
/// Returns `Ok(true)` if the signature verifies, `Ok(false)` if it was made
/// by a different key or over different content.
pub fn verify_certificate_signature(
    subject_der: &[u8],
    issuer_public_key: &[u8],
) -> Result<bool, SignatureVerificationError> {
    let (_, cert) = X509Certificate::from_der(subject_der)
        .map_err(|err| SignatureVerificationError::InvalidSignedObject(err.to_string()))?;

    let alg = signing_alg_for(&cert.signature_algorithm).ok_or_else(|| {
        SignatureVerificationError::UnsupportedAlgorithm(
            cert.signature_algorithm.algorithm.to_id_string(),
        )
    })?;

    verify_signed_data(
        alg,
        cert.signature_value.as_ref(),
        cert.tbs_certificate.as_ref(),
        issuer_public_key,
    )
}

/// Verify `sig` over `data` with the given algorithm and DER-encoded
/// `SubjectPublicKeyInfo`.
pub fn verify_signed_data(
    alg: SigningAlg,
    sig: &[u8],
    data: &[u8],
    public_key: &[u8],
) -> Result<bool, SignatureVerificationError> {
    let validator = validator_for_signing_alg(alg)
        .ok_or_else(|| SignatureVerificationError::UnsupportedAlgorithm(alg.to_string()))?;

    match validator.validate(sig, data, public_key) {
        Ok(()) => Ok(true),
        Err(RawSignatureValidationError::SignatureMismatch) => {
            debug!("{alg} signature does not match");
            Ok(false)
        }
        Err(RawSignatureValidationError::UnsupportedAlgorithm) => {
            Err(SignatureVerificationError::UnsupportedAlgorithm(alg.to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

/// Map a signature `AlgorithmIdentifier` to a [`SigningAlg`].
pub(crate) fn signing_alg_for(alg: &AlgorithmIdentifier) -> Option<SigningAlg> {
    let oid = &alg.algorithm;

    if *oid == SHA256_WITH_RSAENCRYPTION_OID {
        Some(SigningAlg::Rs256)
    } else if *oid == SHA384_WITH_RSAENCRYPTION_OID {
        Some(SigningAlg::Rs384)
    } else if *oid == SHA512_WITH_RSAENCRYPTION_OID {
        Some(SigningAlg::Rs512)
    } else if *oid == ECDSA_WITH_SHA256_OID {
        Some(SigningAlg::Es256)
    } else if *oid == ECDSA_WITH_SHA384_OID {
        Some(SigningAlg::Es384)
    } else if *oid == ECDSA_WITH_SHA512_OID {
        Some(SigningAlg::Es512)
    } else if *oid == RSA_PSS_OID {
        signing_alg_from_rsapss_alg(alg)
    } else if *oid == ED25519_OID {
        Some(SigningAlg::Ed25519)
    } else {
        None
    }
}

fn signing_alg_from_rsapss_alg(alg: &AlgorithmIdentifier) -> Option<SigningAlg> {
    let Some(parameters) = &alg.parameters else {
        return None;
    };

    let Ok(seq) = parameters.as_sequence() else {
        return None;
    };

    let Ok((_i, (ha_alg, mgf_ai))) = seq.parse(|i| {
        let (i, h) = <Header as FromDer>::from_der(i)?;
        if h.class() != Class::ContextSpecific || h.tag() != Tag(0) {
            return Err(nom::Err::Error(asn1_rs::Error::BerValueError));
        }

        let (i, ha_alg) = AlgorithmIdentifier::from_der(i)
            .map_err(|_| nom::Err::Error(asn1_rs::Error::BerValueError))?;

        let (i, h) = <Header as FromDer>::from_der(i)?;
        if h.class() != Class::ContextSpecific || h.tag() != Tag(1) {
            return Err(nom::Err::Error(asn1_rs::Error::BerValueError));
        }

        let (i, mgf_ai) = AlgorithmIdentifier::from_der(i)
            .map_err(|_| nom::Err::Error(asn1_rs::Error::BerValueError))?;

        // Salt length and trailer field are not needed.
        Ok((i, (ha_alg, mgf_ai)))
    }) else {
        return None;
    };

    let mgf_ai_parameters = mgf_ai.parameters?;

    let Ok(mgf_ai_parameters) = mgf_ai_parameters.as_sequence() else {
        return None;
    };

    let Ok((_i, mgf_ai_params_algorithm)) = <Any as FromDer>::from_der(&mgf_ai_parameters.content)
    else {
        return None;
    };

    let Ok(mgf_ai_params_algorithm) = mgf_ai_params_algorithm.as_oid() else {
        return None;
    };

    // MGF1 must use the same hash as the message digest.
    if ha_alg.algorithm.to_id_string() != mgf_ai_params_algorithm.to_id_string() {
        return None;
    }

    if ha_alg.algorithm == SHA256_OID {
        Some(SigningAlg::Ps256)
    } else if ha_alg.algorithm == SHA384_OID {
        Some(SigningAlg::Ps384)
    } else if ha_alg.algorithm == SHA512_OID {
        Some(SigningAlg::Ps512)
    } else {
        None
    }
}
