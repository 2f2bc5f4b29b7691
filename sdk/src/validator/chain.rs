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

use log::debug;
use pkd_status_tracker::StatusTracker;

use super::TrustChainValidator;
use crate::{
    model::{Certificate, TrustPath},
    Result,
};

/// The certificates found while walking from a leaf towards its trust
/// anchor.
#[derive(Clone, Debug)]
pub struct ChainBuildResult {
    // Leaf first.
    certificates: Vec<Certificate>,
    anchored: bool,
}

impl ChainBuildResult {
    /// `true` if the walk ended at a self-signed CA.
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    pub fn depth(&self) -> usize {
        self.certificates.len()
    }

    /// The certificates from leaf to the last one found.
    pub fn certificates(&self) -> &[Certificate] {
        &self.certificates
    }

    pub fn leaf(&self) -> Option<&Certificate> {
        self.certificates.first()
    }

    /// The trust anchor, if the chain reached one.
    pub fn anchor(&self) -> Option<&Certificate> {
        if self.anchored {
            self.certificates.last()
        } else {
            None
        }
    }

    /// Ids from the top of the chain down to the leaf.
    ///
    /// For a partial chain the first entry is the highest certificate found,
    /// not a trust anchor.
    pub fn trust_path(&self) -> Result<TrustPath> {
        TrustPath::new(self.certificates.iter().rev().map(Certificate::id).collect())
    }

    pub(super) fn anchor_first(&self) -> Vec<Certificate> {
        self.certificates.iter().rev().cloned().collect()
    }
}

impl TrustChainValidator {
    /// Walk from `leaf` up to a trust anchor, resolving each issuer by
    /// subject DN.
    ///
    /// The walk stops at the first self-signed CA, when no issuer is found,
    /// when a candidate issuer fails
    /// [`validate_issuer_relationship`](Self::validate_issuer_relationship),
    /// or once `validation.max_chain_depth` certificates are collected. A
    /// partial chain is not an error; check
    /// [`ChainBuildResult::is_anchored`].
    pub fn build_chain(
        &self,
        leaf: &Certificate,
        validation_log: &mut StatusTracker,
    ) -> Result<ChainBuildResult> {
        let max_depth = self.settings.validation.max_chain_depth;
        let mut certificates = vec![leaf.clone()];
        let mut anchored = false;

        while let Some(current) = certificates.last() {
            if current.is_self_signed() {
                anchored = true;
                break;
            }

            if certificates.len() >= max_depth {
                debug!("chain for {} reached depth {max_depth}", leaf.id());
                break;
            }

            let issuer_dn = current.issuer().distinguished_name();
            let Some(parent) = self.certificates.find_by_subject_dn(issuer_dn)? else {
                debug!("no certificate with subject {issuer_dn}");
                break;
            };

            if certificates.iter().any(|c| c.id() == parent.id()) {
                debug!("issuer {issuer_dn} is already in the chain");
                break;
            }

            let mut linkage_log = StatusTracker::default();
            let linkage = self.check_issuer_relationship(current, &parent, &mut linkage_log)?;
            if !linkage.is_valid() {
                validation_log.append(&linkage_log);
                break;
            }

            certificates.push(parent);
        }

        Ok(ChainBuildResult {
            certificates,
            anchored,
        })
    }
}
