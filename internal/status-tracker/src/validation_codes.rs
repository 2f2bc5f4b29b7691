// Copyright 2024 Adobe. All rights reserved.
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

//! Validation codes recorded for certificate trust-chain and revocation
//! checks.
//!
//! Codes are upper-case tokens. They are stored as the `code` of a
//! certificate's validation errors, so they are part of the persisted data
//! model and must not be renamed.

use crate::LogKind;

// -- success codes --

/// The certificate qualifies as a trust anchor: self-signed, CA, inside its
/// validity window, and its self-signature verifies.
pub const TRUST_ANCHOR_VALIDATED: &str = "TRUST_ANCHOR_VALIDATED";

/// The issuer DN matches the parent's subject DN and the parent's key
/// verifies the signature.
pub const ISSUER_VALIDATED: &str = "ISSUER_VALIDATED";

/// The certificate is inside its validity window.
pub const CERTIFICATE_INSIDE_VALIDITY: &str = "CERTIFICATE_INSIDE_VALIDITY";

/// The certificate's serial number is not on its issuer's CRL.
pub const CERTIFICATE_NOT_REVOKED: &str = "CERTIFICATE_NOT_REVOKED";

/// The structural rules for the certificate's role are satisfied.
pub const CONSTRAINTS_VALIDATED: &str = "CONSTRAINTS_VALIDATED";

// -- informational codes --

/// The certificate carries a Basic Constraints path length. Presence is
/// recorded; the constraint itself is not enforced.
pub const PATH_LENGTH_CONSTRAINT_PRESENT: &str = "PATH_LENGTH_CONSTRAINT_PRESENT";

/// No usable CRL was found for the issuer, so the certificate is assumed not
/// revoked.
pub const REVOCATION_DATA_UNAVAILABLE: &str = "REVOCATION_DATA_UNAVAILABLE";

/// Revocation checking is switched off in the settings.
pub const REVOCATION_CHECK_DISABLED: &str = "REVOCATION_CHECK_DISABLED";

// -- warning codes --

/// A CSCA does not assert `cRLSign`. Always a warning, never an error.
pub const KEY_USAGE_CRL_SIGN_MISSING: &str = "KEY_USAGE_CRL_SIGN_MISSING";

// -- failure codes --

/// A certificate referenced by a trust path is not in the store.
pub const CERTIFICATE_NOT_FOUND: &str = "CERTIFICATE_NOT_FOUND";

/// A trust anchor candidate's subject DN differs from its issuer DN.
pub const NOT_SELF_SIGNED: &str = "NOT_SELF_SIGNED";

/// A trust anchor candidate does not have the CA flag.
pub const NOT_CA: &str = "NOT_CA";

/// The certificate's `notAfter` is in the past.
pub const CERTIFICATE_EXPIRED: &str = "CERTIFICATE_EXPIRED";

/// The certificate's `notBefore` is in the future.
pub const CERTIFICATE_NOT_YET_VALID: &str = "CERTIFICATE_NOT_YET_VALID";

/// The signature does not verify with the issuer's public key.
pub const SIGNATURE_INVALID: &str = "SIGNATURE_INVALID";

/// The certificate's issuer DN differs from the candidate parent's subject
/// DN.
pub const ISSUER_MISMATCH: &str = "ISSUER_MISMATCH";

/// The certificate's serial number is listed on its issuer's CRL.
pub const CERTIFICATE_REVOKED: &str = "CERTIFICATE_REVOKED";

/// No trust anchor could be reached from the certificate.
pub const CHAIN_INCOMPLETE: &str = "CHAIN_INCOMPLETE";

/// Basic Constraints disagree with the certificate's role.
pub const BASIC_CONSTRAINTS_INVALID: &str = "BASIC_CONSTRAINTS_INVALID";

/// The certificate has no Key Usage extension but its role requires one.
pub const KEY_USAGE_MISSING: &str = "KEY_USAGE_MISSING";

/// A CSCA does not assert `keyCertSign`.
pub const KEY_USAGE_KEY_CERT_SIGN_MISSING: &str = "KEY_USAGE_KEY_CERT_SIGN_MISSING";

/// A document signer does not assert `digitalSignature`.
pub const KEY_USAGE_DIGITAL_SIGNATURE_MISSING: &str = "KEY_USAGE_DIGITAL_SIGNATURE_MISSING";

/// A document signer asserts `keyCertSign`.
pub const KEY_USAGE_KEY_CERT_SIGN_NOT_ALLOWED: &str = "KEY_USAGE_KEY_CERT_SIGN_NOT_ALLOWED";

/// An unexpected fault (store or decoder failure) interrupted validation.
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

/// Returns `true` if the code is a known success code.
///
/// ## Examples
///
/// ```
/// use pkd_status_tracker::validation_codes::*;
///
/// assert!(is_success(TRUST_ANCHOR_VALIDATED));
/// assert!(!is_success(CERTIFICATE_REVOKED));
/// ```
pub fn is_success(status_code: &str) -> bool {
    matches!(log_kind(status_code), LogKind::Success)
}

/// Returns the default [`LogKind`] for a given validation code.
///
/// Role constraint codes are reported as warnings unless strict key usage
/// checking is enabled, so the kind actually recorded may differ.
pub fn log_kind(status_code: &str) -> LogKind {
    match status_code {
        TRUST_ANCHOR_VALIDATED
        | ISSUER_VALIDATED
        | CERTIFICATE_INSIDE_VALIDITY
        | CERTIFICATE_NOT_REVOKED
        | CONSTRAINTS_VALIDATED => LogKind::Success,
        PATH_LENGTH_CONSTRAINT_PRESENT
        | REVOCATION_DATA_UNAVAILABLE
        | REVOCATION_CHECK_DISABLED => {
            LogKind::Informational
        }
        KEY_USAGE_CRL_SIGN_MISSING => LogKind::Warning,
        _ => LogKind::Failure,
    }
}
