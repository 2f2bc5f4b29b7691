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

use crate::{
    raw_signature::{validator_for_signing_alg, RawSignatureValidationError, SigningAlg},
    tests::fixtures,
};

#[test]
fn every_algorithm_has_a_validator() {
    for alg in SigningAlg::ALL {
        assert!(validator_for_signing_alg(alg).is_some(), "{alg}");
    }
}

#[test]
fn ecdsa_rejects_bad_signature_encoding() {
    let csca = fixtures::csca("QA");
    let validator = validator_for_signing_alg(SigningAlg::Es256).unwrap();

    assert_eq!(
        validator.validate(b"not der", b"data", &csca.spki()),
        Err(RawSignatureValidationError::InvalidSignature)
    );
}

#[test]
fn ecdsa_rejects_non_ec_key() {
    let validator = validator_for_signing_alg(SigningAlg::Es256).unwrap();

    assert_eq!(
        validator.validate(b"sig", b"data", b"not a key"),
        Err(RawSignatureValidationError::InvalidPublicKey)
    );
}

#[test]
fn rsa_rejects_ec_key() {
    let csca = fixtures::csca("QA");
    let validator = validator_for_signing_alg(SigningAlg::Rs256).unwrap();

    assert_eq!(
        validator.validate(&[0u8; 256], b"data", &csca.spki()),
        Err(RawSignatureValidationError::InvalidPublicKey)
    );
}

#[test]
fn ed25519_rejects_ec_key() {
    let csca = fixtures::csca("QA");
    let validator = validator_for_signing_alg(SigningAlg::Ed25519).unwrap();

    assert_eq!(
        validator.validate(&[0u8; 64], b"data", &csca.spki()),
        Err(RawSignatureValidationError::InvalidPublicKey)
    );
}
