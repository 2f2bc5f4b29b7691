// Copyright 2022 Adobe. All rights reserved.
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

#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]

//! This library decides whether certificates issued under a national PKI
//! (Country Signing CA, Document Signer Certificates) can be trusted.
//!
//! It builds the chain from a document signer to its CSCA trust anchor,
//! verifies signatures along the way, applies the structural rules of each
//! certificate role and checks revocation against the CSCA's CRL.
//!
//! # Example: Configuring a validator
//!
//! ```
//! use std::sync::Arc;
//!
//! use pkd_trust::{InMemoryStore, Settings, TrustChainValidator};
//!
//! # fn main() -> pkd_trust::Result<()> {
//! let store = Arc::new(InMemoryStore::new());
//! let settings = Settings::new().with_toml("[validation]\nstrict_key_usage = true")?;
//!
//! let validator = TrustChainValidator::new(store.clone(), store, settings);
//! assert!(validator.settings().validation.strict_key_usage);
//! # Ok(())
//! # }
//! ```

/// The internal name of the pkd-trust SDK.
pub const NAME: &str = "pkd-trust";

/// The version of this pkd-trust SDK.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod batch;
pub use batch::{BatchSummary, BatchValidator, NoProgress, ProgressSink, ValidationProgress};

mod error;
pub use error::{Error, Result};

pub mod model;
pub use model::{
    Certificate, CertificateId, CertificateRevocationList, CertificateStatus, CertificateType,
    TrustPath, ValidationError, ValidationResult,
};

pub mod settings;
pub use settings::Settings;

pub mod store;
pub use store::{CertificateStore, CrlStore, InMemoryStore};

pub mod validator;
pub use validator::{ChainBuildResult, RevocationChecker, TrustChainError, TrustChainValidator};

pub mod verifier;
pub use verifier::{CertificateVerifier, NativeVerifier};

pub use pkd_status_tracker::{validation_codes, LogItem, LogKind, StatusTracker};

pub(crate) mod utils;
