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

//! Domain model: certificates, CRLs, trust paths and validation verdicts.
//!
//! Every constructor enforces its invariants up front, so a value of any of
//! these types is always well formed.

mod certificate;
pub use certificate::{Certificate, CertificateId, CertificateType, X509Data};

mod country;
pub use country::{CountryCode, IssuerName};

mod crl;
pub use crl::{CertificateRevocationList, CrlId, CrlValidityPeriod, RevokedCertificates};

mod distinguished_name;
pub use distinguished_name::{DistinguishedName, IssuerInfo, SubjectInfo};

mod trust_path;
pub use trust_path::{TrustPath, MAX_TRUST_PATH_DEPTH};

mod validation_error;
pub use validation_error::{ErrorSeverity, ValidationError};

mod validation_result;
pub use validation_result::{CertificateStatus, ValidationChecks, ValidationResult};

mod validity;
pub use validity::ValidityPeriod;
