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

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{model::CertificateId, Error, Result};

/// Longest chain the engine will evaluate, anchor included.
pub const MAX_TRUST_PATH_DEPTH: usize = 5;

/// Ordered certificate ids from trust anchor (index 0) to leaf.
///
/// A trust path holds between 1 and [`MAX_TRUST_PATH_DEPTH`] distinct,
/// non-nil ids.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "Vec<CertificateId>", into = "Vec<CertificateId>")]
pub struct TrustPath(Vec<CertificateId>);

impl TrustPath {
    pub fn new(ids: Vec<CertificateId>) -> Result<Self> {
        if ids.is_empty() {
            return Err(Error::EmptyTrustPath);
        }

        if ids.len() > MAX_TRUST_PATH_DEPTH {
            return Err(Error::TrustPathTooLong {
                depth: ids.len(),
                max: MAX_TRUST_PATH_DEPTH,
            });
        }

        let mut seen = HashSet::with_capacity(ids.len());
        for id in &ids {
            if id.is_nil() {
                return Err(Error::NullTrustPathEntry);
            }
            if !seen.insert(*id) {
                return Err(Error::DuplicateTrustPathEntry(*id));
            }
        }

        Ok(Self(ids))
    }

    /// A path holding only a trust anchor.
    pub fn single(id: CertificateId) -> Result<Self> {
        Self::new(vec![id])
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// The trust anchor.
    pub fn root(&self) -> CertificateId {
        self.0[0]
    }

    pub fn leaf(&self) -> CertificateId {
        self.0[self.0.len() - 1]
    }

    pub fn ids(&self) -> &[CertificateId] {
        &self.0
    }

    pub fn contains(&self, id: &CertificateId) -> bool {
        self.0.contains(id)
    }

    /// A new path extended by `id`, re-checking every bound.
    pub fn append(&self, id: CertificateId) -> Result<Self> {
        let mut ids = self.0.clone();
        ids.push(id);
        Self::new(ids)
    }
}

impl TryFrom<Vec<CertificateId>> for TrustPath {
    type Error = Error;

    fn try_from(ids: Vec<CertificateId>) -> Result<Self> {
        Self::new(ids)
    }
}

impl From<TrustPath> for Vec<CertificateId> {
    fn from(path: TrustPath) -> Self {
        path.0
    }
}
