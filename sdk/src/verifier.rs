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

//! The cryptographic collaborator of the validator.

pub use pkd_crypto::x509::{BasicConstraints, KeyUsageFlags};

use crate::Result;

/// Structural extensions of a certificate that drive per-role checks.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CertificateExtensions {
    pub basic_constraints: BasicConstraints,

    /// `None` when the certificate has no Key Usage extension.
    pub key_usage: Option<KeyUsageFlags>,
}

/// Signature verification and DER introspection.
///
/// Implementations must be pure functions of their input so the validator
/// can call them from many threads at once.
pub trait CertificateVerifier: Send + Sync {
    /// Returns `Ok(false)` if the signature on `subject_der` does not verify
    /// under `issuer_public_key` (DER `SubjectPublicKeyInfo`). An `Err`
    /// means the inputs could not be evaluated at all.
    fn verify_signature(&self, subject_der: &[u8], issuer_public_key: &[u8]) -> Result<bool>;

    /// DER `SubjectPublicKeyInfo` of a certificate.
    fn public_key(&self, certificate_der: &[u8]) -> Result<Vec<u8>>;

    fn extensions(&self, certificate_der: &[u8]) -> Result<CertificateExtensions>;
}

/// [`CertificateVerifier`] backed by `pkd-crypto`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeVerifier;

impl CertificateVerifier for NativeVerifier {
    fn verify_signature(&self, subject_der: &[u8], issuer_public_key: &[u8]) -> Result<bool> {
        Ok(pkd_crypto::x509::verify_certificate_signature(
            subject_der,
            issuer_public_key,
        )?)
    }

    fn public_key(&self, certificate_der: &[u8]) -> Result<Vec<u8>> {
        Ok(pkd_crypto::x509::public_key_der(certificate_der)?)
    }

    fn extensions(&self, certificate_der: &[u8]) -> Result<CertificateExtensions> {
        let parsed = pkd_crypto::x509::parse_certificate(certificate_der)?;

        Ok(CertificateExtensions {
            basic_constraints: parsed.basic_constraints,
            key_usage: parsed.key_usage,
        })
    }
}
