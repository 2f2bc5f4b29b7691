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

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

//! Certificates, CRLs and a populated store for the integration tests.

use std::sync::{Arc, Once};

use pkd_trust::{
    Certificate, CertificateRevocationList, CertificateType, InMemoryStore, Settings,
    TrustChainValidator,
};
use rcgen::{
    BasicConstraints, CertificateParams, CertificateRevocationListParams, DistinguishedName,
    DnType, IsCa, KeyIdMethod, KeyPair, KeyUsagePurpose, RevocationReason, RevokedCertParams,
    SerialNumber,
};
use time::{Duration, OffsetDateTime};

macro_rules! assert_err {
    ($expression:expr, $($pattern:tt)+) => {
        match $expression {
            $($pattern)+ => (),
            ref e => panic!("expected `{}` but got `{:?}`", stringify!($($pattern)+), e),
        }
    }
}
pub(crate) use assert_err;

static INIT: Once = Once::new();

/// Route `log` output to the test harness; `RUST_LOG=debug` shows it.
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

pub struct Issued {
    pub cert: rcgen::Certificate,
    pub key: KeyPair,
    pub certificate_type: CertificateType,
}

impl Issued {
    pub fn der(&self) -> Vec<u8> {
        self.cert.der().to_vec()
    }

    pub fn certificate(&self) -> Certificate {
        Certificate::from_der(&self.der(), self.certificate_type, None).unwrap()
    }
}

fn dn(country: &str, cn: &str) -> DistinguishedName {
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CountryName, country);
    dn.push(DnType::OrganizationName, "Ministry of Interior");
    dn.push(DnType::CommonName, cn);
    dn
}

pub fn csca(country: &str) -> Issued {
    let key = KeyPair::generate().unwrap();

    let mut params = CertificateParams::new(vec![]).unwrap();
    params.distinguished_name = dn(country, &format!("CSCA {country}"));
    params.is_ca = IsCa::Ca(BasicConstraints::Constrained(0));
    params.key_usages = vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign];
    params.serial_number = Some(SerialNumber::from(vec![0x00, 0x01]));
    params.not_before = OffsetDateTime::now_utc() - Duration::days(1);
    params.not_after = OffsetDateTime::now_utc() + Duration::days(3650);

    Issued {
        cert: params.self_signed(&key).unwrap(),
        key,
        certificate_type: CertificateType::Csca,
    }
}

/// A DSC issued by `issuer`, valid from `days_from` to `days_to` relative
/// to now.
pub fn dsc_in_window(
    issuer: &Issued,
    country: &str,
    serial: &[u8],
    days_from: i64,
    days_to: i64,
) -> Issued {
    let key = KeyPair::generate().unwrap();
    let now = OffsetDateTime::now_utc();

    let mut params = CertificateParams::new(vec![]).unwrap();
    params.distinguished_name = dn(country, "Document Signer 1");
    params.is_ca = IsCa::ExplicitNoCa;
    params.key_usages = vec![KeyUsagePurpose::DigitalSignature];
    params.serial_number = Some(SerialNumber::from(serial.to_vec()));
    params.not_before = now + Duration::days(days_from);
    params.not_after = now + Duration::days(days_to);

    Issued {
        cert: params.signed_by(&key, &issuer.cert, &issuer.key).unwrap(),
        key,
        certificate_type: CertificateType::Dsc,
    }
}

pub fn dsc(issuer: &Issued, country: &str, serial: &[u8]) -> Issued {
    dsc_in_window(issuer, country, serial, -1, 365)
}

pub fn crl(issuer: &Issued, revoked: &[&[u8]]) -> CertificateRevocationList {
    let now = OffsetDateTime::now_utc();

    let params = CertificateRevocationListParams {
        this_update: now - Duration::days(1),
        next_update: now + Duration::days(30),
        crl_number: SerialNumber::from(1u64),
        issuing_distribution_point: None,
        revoked_certs: revoked
            .iter()
            .map(|serial| RevokedCertParams {
                serial_number: SerialNumber::from(serial.to_vec()),
                revocation_time: now - Duration::hours(1),
                reason_code: Some(RevocationReason::KeyCompromise),
                invalidity_date: None,
            })
            .collect(),
        key_identifier_method: KeyIdMethod::Sha256,
    };

    let der = params.signed_by(&issuer.cert, &issuer.key).unwrap().der().to_vec();
    CertificateRevocationList::from_der(&der, None).unwrap()
}

pub fn validator(store: &Arc<InMemoryStore>, settings: Settings) -> TrustChainValidator {
    TrustChainValidator::new(store.clone(), store.clone(), settings)
}
