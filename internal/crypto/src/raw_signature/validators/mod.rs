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

//! This module binds the Rust native signature implementations to this
//! crate's [`RawSignatureValidator`] trait.

use rsa::{pkcs8::DecodePublicKey, RsaPublicKey};

use crate::raw_signature::{RawSignatureValidationError, RawSignatureValidator, SigningAlg};

mod ecdsa_validator;
pub(crate) use ecdsa_validator::EcdsaValidator;

mod ed25519_validator;
pub(crate) use ed25519_validator::Ed25519Validator;

mod rsa_legacy_validator;
pub(crate) use rsa_legacy_validator::RsaLegacyValidator;

mod rsa_validator;
pub(crate) use rsa_validator::RsaValidator;

/// Return a validator for the given signing algorithm.
pub(crate) fn validator_for_signing_alg(
    alg: SigningAlg,
) -> Option<Box<dyn RawSignatureValidator>> {
    match alg {
        SigningAlg::Rs256 => Some(Box::new(RsaLegacyValidator::Rsa256)),
        SigningAlg::Rs384 => Some(Box::new(RsaLegacyValidator::Rsa384)),
        SigningAlg::Rs512 => Some(Box::new(RsaLegacyValidator::Rsa512)),
        SigningAlg::Ps256 => Some(Box::new(RsaValidator::Ps256)),
        SigningAlg::Ps384 => Some(Box::new(RsaValidator::Ps384)),
        SigningAlg::Ps512 => Some(Box::new(RsaValidator::Ps512)),
        SigningAlg::Es256 => Some(Box::new(EcdsaValidator::Es256)),
        SigningAlg::Es384 => Some(Box::new(EcdsaValidator::Es384)),
        SigningAlg::Es512 => Some(Box::new(EcdsaValidator::Es512)),
        SigningAlg::Ed25519 => Some(Box::new(Ed25519Validator {})),
    }
}

/// Decode an RSA `SubjectPublicKeyInfo`.
fn rsa_public_key(public_key: &[u8]) -> Result<RsaPublicKey, RawSignatureValidationError> {
    RsaPublicKey::from_public_key_der(public_key)
        .map_err(|_| RawSignatureValidationError::InvalidPublicKey)
}
