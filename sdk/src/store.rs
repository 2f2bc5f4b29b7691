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

//! Read access to certificates and CRLs.
//!
//! The validator only reads through [`CertificateStore`] and [`CrlStore`].
//! [`InMemoryStore`] implements both and is what tests and small
//! deployments use.

use std::{
    collections::HashMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use log::debug;

use crate::{
    model::{Certificate, CertificateId, CertificateRevocationList, CountryCode, IssuerName},
    Error, Result,
};

/// Lookup of certificates by identity or by subject DN.
pub trait CertificateStore: Send + Sync {
    fn find_by_id(&self, id: &CertificateId) -> Result<Option<Certificate>>;

    /// Exact string match on the subject DN.
    fn find_by_subject_dn(&self, subject_dn: &str) -> Result<Option<Certificate>>;
}

/// Lookup of the current CRL of an issuer.
pub trait CrlStore: Send + Sync {
    fn find_by_issuer_and_country(
        &self,
        issuer_name: &IssuerName,
        country_code: &CountryCode,
    ) -> Result<Option<CertificateRevocationList>>;
}

#[derive(Default)]
struct Certificates {
    by_id: HashMap<CertificateId, Certificate>,
    by_subject_dn: HashMap<String, CertificateId>,
}

/// A [`CertificateStore`] and [`CrlStore`] held in memory.
///
/// Each saved CRL replaces the previous one for the same issuer and country
/// under a single write lock, so readers see either the old or the new
/// aggregate. When several certificates share a subject DN the most
/// recently saved one wins the subject lookup.
#[derive(Default)]
pub struct InMemoryStore {
    certificates: RwLock<Certificates>,
    crls: RwLock<HashMap<(IssuerName, CountryCode), CertificateRevocationList>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a certificate, returning its id.
    pub fn save_certificate(&self, certificate: Certificate) -> Result<CertificateId> {
        let id = certificate.id();
        let subject_dn = certificate.subject().distinguished_name().to_owned();

        let mut certificates = write(&self.certificates)?;
        certificates.by_subject_dn.insert(subject_dn, id);
        certificates.by_id.insert(id, certificate);

        debug!("saved certificate {id}");
        Ok(id)
    }

    /// Store `crl` as the current CRL of its issuer, returning the CRL it
    /// replaced, if any.
    pub fn save_crl(
        &self,
        crl: CertificateRevocationList,
    ) -> Result<Option<CertificateRevocationList>> {
        let key = (crl.issuer_name().clone(), crl.country_code().clone());
        debug!(
            "saved CRL for {} with {} revoked serials",
            key.0,
            crl.revoked_count()
        );

        Ok(write(&self.crls)?.insert(key, crl))
    }

    pub fn certificate_count(&self) -> Result<usize> {
        Ok(read(&self.certificates)?.by_id.len())
    }

    pub fn crl_count(&self) -> Result<usize> {
        Ok(read(&self.crls)?.len())
    }
}

impl CertificateStore for InMemoryStore {
    fn find_by_id(&self, id: &CertificateId) -> Result<Option<Certificate>> {
        Ok(read(&self.certificates)?.by_id.get(id).cloned())
    }

    fn find_by_subject_dn(&self, subject_dn: &str) -> Result<Option<Certificate>> {
        let certificates = read(&self.certificates)?;

        Ok(certificates
            .by_subject_dn
            .get(subject_dn)
            .and_then(|id| certificates.by_id.get(id))
            .cloned())
    }
}

impl CrlStore for InMemoryStore {
    fn find_by_issuer_and_country(
        &self,
        issuer_name: &IssuerName,
        country_code: &CountryCode,
    ) -> Result<Option<CertificateRevocationList>> {
        Ok(read(&self.crls)?
            .get(&(issuer_name.clone(), country_code.clone()))
            .cloned())
    }
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| Error::StoreError("store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| Error::StoreError("store lock poisoned".to_string()))
}
