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

use ecdsa::signature::hazmat::PrehashVerifier;
use p256::{
    ecdsa::{Signature as P256Signature, VerifyingKey as P256VerifyingKey},
    pkcs8::DecodePublicKey,
};
use p384::ecdsa::{Signature as P384Signature, VerifyingKey as P384VerifyingKey};
use sha2::{Digest, Sha256, Sha384, Sha512};
use x509_parser::{prelude::FromDer, x509::SubjectPublicKeyInfo};

use crate::raw_signature::{oids::*, RawSignatureValidationError, RawSignatureValidator};

/// NIST curves supported by `EcdsaValidator`.
enum EcdsaCurve {
    /// NIST curve P-256
    P256,

    /// NIST curve P-384
    P384,
}

/// An `EcdsaValidator` can validate raw signatures with one of the ECDSA
/// signature algorithms.
///
/// The signature must be DER encoded, as it is in an X.509 certificate.
pub(crate) enum EcdsaValidator {
    /// ECDSA with SHA-256
    Es256,

    /// ECDSA with SHA-384
    Es384,

    /// ECDSA with SHA-512
    Es512,
}

impl RawSignatureValidator for EcdsaValidator {
    fn validate(
        &self,
        sig: &[u8],
        data: &[u8],
        public_key: &[u8],
    ) -> Result<(), RawSignatureValidationError> {
        let digest = match self {
            EcdsaValidator::Es256 => Sha256::digest(data).to_vec(),
            EcdsaValidator::Es384 => Sha384::digest(data).to_vec(),
            EcdsaValidator::Es512 => Sha512::digest(data).to_vec(),
        };

        // determine curve from public key
        let curve = ec_curve_from_public_key_der(public_key)?;

        let result = match curve {
            EcdsaCurve::P256 => {
                let signature = P256Signature::from_der(sig)
                    .map_err(|_| RawSignatureValidationError::InvalidSignature)?;

                let vk = P256VerifyingKey::from_public_key_der(public_key)
                    .map_err(|_| RawSignatureValidationError::InvalidPublicKey)?;

                vk.verify_prehash(&digest, &signature)
            }
            EcdsaCurve::P384 => {
                let signature = P384Signature::from_der(sig)
                    .map_err(|_| RawSignatureValidationError::InvalidSignature)?;

                let vk = P384VerifyingKey::from_public_key_der(public_key)
                    .map_err(|_| RawSignatureValidationError::InvalidPublicKey)?;

                vk.verify_prehash(&digest, &signature)
            }
        };

        result.map_err(|_| RawSignatureValidationError::SignatureMismatch)
    }
}

fn ec_curve_from_public_key_der(
    public_key: &[u8],
) -> Result<EcdsaCurve, RawSignatureValidationError> {
    let (_, spki) = SubjectPublicKeyInfo::from_der(public_key)
        .map_err(|_| RawSignatureValidationError::InvalidPublicKey)?;

    if spki.algorithm.algorithm != EC_PUBLICKEY_OID {
        return Err(RawSignatureValidationError::InvalidPublicKey);
    }

    let curve = spki
        .algorithm
        .parameters
        .as_ref()
        .and_then(|params| params.as_oid().ok())
        .ok_or(RawSignatureValidationError::InvalidPublicKey)?;

    if curve == PRIME256V1_OID {
        Ok(EcdsaCurve::P256)
    } else if curve == SECP384R1_OID {
        Ok(EcdsaCurve::P384)
    } else {
        // P-521 and the Brainpool curves are not available natively.
        Err(RawSignatureValidationError::UnsupportedAlgorithm)
    }
}
