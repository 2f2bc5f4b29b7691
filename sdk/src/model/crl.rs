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

use std::{collections::BTreeSet, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    model::{Certificate, CountryCode, DistinguishedName, IssuerName},
    Error, Result,
};

/// The `thisUpdate` / `nextUpdate` window of a CRL.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CrlValidityPeriod {
    this_update: DateTime<Utc>,
    next_update: DateTime<Utc>,
}

impl CrlValidityPeriod {
    pub fn new(this_update: DateTime<Utc>, next_update: DateTime<Utc>) -> Result<Self> {
        if next_update < this_update {
            return Err(Error::InvalidValidityPeriod(format!(
                "CRL next_update {next_update} precedes this_update {this_update}"
            )));
        }

        Ok(Self {
            this_update,
            next_update,
        })
    }

    pub fn this_update(&self) -> DateTime<Utc> {
        self.this_update
    }

    pub fn next_update(&self) -> DateTime<Utc> {
        self.next_update
    }

    /// `this_update <= at <= next_update`
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.this_update <= at && at <= self.next_update
    }
}

/// Set of revoked serial numbers, stored as upper-case hex.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct RevokedCertificates(BTreeSet<String>);

impl RevokedCertificates {
    const SEPARATOR: char = ';';

    /// Build from serial numbers in any hex case.
    pub fn of<I, S>(serials: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        serials
            .into_iter()
            .map(|serial| normalize_serial(serial.as_ref()))
            .collect::<Result<BTreeSet<_>>>()
            .map(Self)
    }

    /// Case-insensitive exact membership.
    pub fn contains(&self, serial: &str) -> bool {
        self.0.contains(&serial.trim().to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serials in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Sorted serials joined by `;`.
    pub fn to_storage_string(&self) -> String {
        self.iter().collect::<Vec<_>>().join(";")
    }

    /// Inverse of [`RevokedCertificates::to_storage_string`]. Empty
    /// segments are skipped.
    pub fn from_storage_string(stored: &str) -> Result<Self> {
        Self::of(
            stored
                .split(Self::SEPARATOR)
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        )
    }
}

fn normalize_serial(serial: &str) -> Result<String> {
    let serial = serial.trim();

    if serial.is_empty() || !serial.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidSerialNumber(serial.to_owned()));
    }

    Ok(serial.to_ascii_uppercase())
}

/// Opaque identity of a [`CertificateRevocationList`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CrlId(Uuid);

impl CrlId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CrlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A CRL published by one country's CSCA.
///
/// Instances are never mutated; re-ingestion produces a new aggregate.
#[derive(Clone, Debug, Serialize)]
pub struct CertificateRevocationList {
    id: CrlId,
    issuer_name: IssuerName,
    country_code: CountryCode,
    validity_period: CrlValidityPeriod,
    #[serde(skip)]
    crl_binary: Vec<u8>,
    revoked_serial_numbers: RevokedCertificates,
    source_upload_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl CertificateRevocationList {
    /// Fails with [`Error::CountryMismatch`] if `country_code` is not the
    /// country embedded in `issuer_name`.
    pub fn new(
        issuer_name: IssuerName,
        country_code: CountryCode,
        validity_period: CrlValidityPeriod,
        crl_binary: Vec<u8>,
        revoked_serial_numbers: RevokedCertificates,
        source_upload_id: Option<Uuid>,
    ) -> Result<Self> {
        if issuer_name.country() != &country_code {
            return Err(Error::CountryMismatch {
                issuer_name: issuer_name.to_string(),
                country_code: country_code.to_string(),
            });
        }

        if crl_binary.is_empty() {
            return Err(Error::MissingField("crl_binary"));
        }

        Ok(Self {
            id: CrlId::new(),
            issuer_name,
            country_code,
            validity_period,
            crl_binary,
            revoked_serial_numbers,
            source_upload_id,
            created_at: Utc::now(),
        })
    }

    /// Decode a DER CRL. The issuer name is `CSCA-` followed by the `C`
    /// attribute of the CRL issuer DN.
    pub fn from_der(der: &[u8], source_upload_id: Option<Uuid>) -> Result<Self> {
        let parsed = pkd_crypto::crl::parse_crl(der)?;

        let country = DistinguishedName::parse(&parsed.issuer_dn)
            .country()
            .map(CountryCode::parse)
            .transpose()?
            .ok_or(Error::MissingField("issuer country"))?;

        let next_update = parsed.next_update.ok_or(Error::MissingField("next_update"))?;

        Self::new(
            IssuerName::for_country(&country),
            country,
            CrlValidityPeriod::new(parsed.this_update, next_update)?,
            der.to_vec(),
            RevokedCertificates::of(&parsed.revoked_serials)?,
            source_upload_id,
        )
    }

    /// Like [`from_der`](Self::from_der), but first checks that the CRL names
    /// `csca` as its issuer and carries a signature that verifies under the
    /// CSCA's key.
    pub fn from_der_signed_by(
        der: &[u8],
        csca: &Certificate,
        source_upload_id: Option<Uuid>,
    ) -> Result<Self> {
        let parsed = pkd_crypto::crl::parse_crl(der)?;
        let csca_dn = csca.subject().distinguished_name();

        if parsed.issuer_dn != csca_dn
            || !pkd_crypto::crl::verify_crl_signature(der, csca.x509_data().public_key())?
        {
            return Err(Error::CrlNotSignedByIssuer {
                csca_dn: csca_dn.to_owned(),
            });
        }

        Self::from_der(der, source_upload_id)
    }

    pub fn id(&self) -> CrlId {
        self.id
    }

    pub fn issuer_name(&self) -> &IssuerName {
        &self.issuer_name
    }

    pub fn country_code(&self) -> &CountryCode {
        &self.country_code
    }

    pub fn validity_period(&self) -> &CrlValidityPeriod {
        &self.validity_period
    }

    pub fn crl_binary(&self) -> &[u8] {
        &self.crl_binary
    }

    pub fn revoked_serial_numbers(&self) -> &RevokedCertificates {
        &self.revoked_serial_numbers
    }

    pub fn revoked_count(&self) -> usize {
        self.revoked_serial_numbers.len()
    }

    pub fn source_upload_id(&self) -> Option<Uuid> {
        self.source_upload_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_revoked(&self, serial_number: &str) -> bool {
        self.revoked_serial_numbers.contains(serial_number)
    }

    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.validity_period.is_valid_at(at)
    }

    /// Current time inside `this_update..=next_update`.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::Duration;

    use super::*;
    use crate::utils::test::{crl, csca};

    fn window() -> CrlValidityPeriod {
        let now = Utc::now();
        CrlValidityPeriod::new(now - Duration::days(1), now + Duration::days(1)).unwrap()
    }

    #[test]
    fn revoked_contains_any_case() {
        let revoked = RevokedCertificates::of(["01AB", "ffcd"]).unwrap();

        assert!(revoked.contains("01ab"));
        assert!(revoked.contains("FFCD"));
        assert!(!revoked.contains("0000"));
        assert_eq!(revoked.len(), 2);
    }

    #[test]
    fn revoked_rejects_bad_serials() {
        assert!(matches!(
            RevokedCertificates::of(["01AB", "not-hex"]),
            Err(Error::InvalidSerialNumber(_))
        ));
        assert!(RevokedCertificates::of([""]).is_err());
    }

    #[test]
    fn storage_string() {
        let revoked = RevokedCertificates::of(["ffcd", "01AB", "0A"]).unwrap();
        let stored = revoked.to_storage_string();

        assert_eq!(stored, "01AB;0A;FFCD");
        assert_eq!(RevokedCertificates::from_storage_string(&stored).unwrap(), revoked);
        assert!(RevokedCertificates::from_storage_string("").unwrap().is_empty());
        assert_eq!(
            RevokedCertificates::from_storage_string("01ab;;ffcd;").unwrap().len(),
            2
        );
    }

    #[test]
    fn crl_window() {
        let now = Utc::now();
        assert!(CrlValidityPeriod::new(now, now - Duration::seconds(1)).is_err());
        assert!(CrlValidityPeriod::new(now, now).is_ok());

        let window = window();
        assert!(window.is_valid_at(now));
        assert!(!window.is_valid_at(now + Duration::days(2)));
        assert!(!window.is_valid_at(now - Duration::days(2)));
    }

    #[test]
    fn country_must_match_issuer() {
        let result = CertificateRevocationList::new(
            IssuerName::parse("CSCA-QA").unwrap(),
            CountryCode::parse("DE").unwrap(),
            window(),
            vec![1],
            RevokedCertificates::default(),
            None,
        );

        assert!(matches!(result, Err(Error::CountryMismatch { .. })));
    }

    #[test]
    fn new_crl() {
        let crl = CertificateRevocationList::new(
            IssuerName::parse("CSCA-QA").unwrap(),
            CountryCode::parse("qa").unwrap(),
            window(),
            vec![1],
            RevokedCertificates::of(["01AB"]).unwrap(),
            None,
        )
        .unwrap();

        assert_eq!(crl.revoked_count(), 1);
        assert!(crl.is_revoked("01ab"));
        assert!(!crl.is_revoked("02"));
        assert!(crl.is_valid());

        assert!(matches!(
            CertificateRevocationList::new(
                IssuerName::parse("CSCA-QA").unwrap(),
                CountryCode::parse("QA").unwrap(),
                window(),
                vec![],
                RevokedCertificates::default(),
                None,
            ),
            Err(Error::MissingField("crl_binary"))
        ));
    }

    #[test]
    fn from_der_signed_by_its_csca() {
        let root = csca("QA");
        let der = crl(&root, &[&[0x01, 0xab]]).crl_binary().to_vec();

        let checked =
            CertificateRevocationList::from_der_signed_by(&der, &root.certificate(), None).unwrap();
        assert!(checked.is_revoked("01ab"));
    }

    #[test]
    fn from_der_signed_by_another_key() {
        let root = csca("QA");
        let impostor = csca("QA");
        let der = crl(&impostor, &[]).crl_binary().to_vec();

        assert!(matches!(
            CertificateRevocationList::from_der_signed_by(&der, &root.certificate(), None),
            Err(Error::CrlNotSignedByIssuer { .. })
        ));
    }

    #[test]
    fn from_der_signed_by_other_country() {
        let root = csca("QA");
        let der = crl(&csca("DE"), &[]).crl_binary().to_vec();

        assert!(matches!(
            CertificateRevocationList::from_der_signed_by(&der, &root.certificate(), None),
            Err(Error::CrlNotSignedByIssuer { .. })
        ));
    }
}
