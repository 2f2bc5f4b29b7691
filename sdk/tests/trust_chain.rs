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

#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use common::{assert_err, crl, csca, dsc, dsc_in_window, init_logging, validator};
use pkd_trust::{
    model::{
        CertificateRevocationList, CountryCode, CrlValidityPeriod, IssuerInfo, IssuerName,
        RevokedCertificates, SubjectInfo, ValidityPeriod, X509Data,
    },
    validation_codes, BatchValidator, Certificate, CertificateId, CertificateStatus,
    CertificateType, Error, InMemoryStore, Settings, StatusTracker, TrustPath, ValidationResult,
};

#[test]
fn csca_and_dsc_path_is_valid() {
    init_logging();

    let store = Arc::new(InMemoryStore::new());
    let root = csca("QA");
    let anchor = store.save_certificate(root.certificate()).unwrap();
    let leaf = store
        .save_certificate(dsc(&root, "QA", &[0x01, 0xab]).certificate())
        .unwrap();

    let mut log = StatusTracker::default();
    let result = validator(&store, Settings::default())
        .validate(&TrustPath::new(vec![anchor, leaf]).unwrap(), &mut log)
        .unwrap();

    assert_eq!(result.overall_status(), CertificateStatus::Valid);
    assert!(result.signature_valid());
    assert!(result.chain_valid());
    assert!(result.not_revoked());
    assert!(result.validity_valid());
    assert!(result.constraints_valid());
    assert!(!log.has_any_error());
}

#[test]
fn revoked_dsc_via_crl() {
    init_logging();

    let store = Arc::new(InMemoryStore::new());
    let root = csca("QA");
    store.save_certificate(root.certificate()).unwrap();
    store.save_crl(crl(&root, &[&[0x01, 0xab]])).unwrap();

    let mut revoked = dsc(&root, "QA", &[0x01, 0xab]).certificate();
    let mut good = dsc(&root, "QA", &[0x01, 0xac]).certificate();
    let validator = validator(&store, Settings::default());

    let result = validator.validate_certificate(&mut revoked);
    assert_eq!(result.overall_status(), CertificateStatus::Revoked);
    assert!(revoked.is_revoked());
    assert!(revoked
        .validation_errors()
        .iter()
        .any(|e| e.code() == validation_codes::CERTIFICATE_REVOKED));

    assert!(validator.validate_certificate(&mut good).is_valid());
}

#[test]
fn no_crl_for_issuer_country_is_fail_open() {
    init_logging();

    let store = Arc::new(InMemoryStore::new());
    let root = csca("QA");
    store.save_certificate(root.certificate()).unwrap();
    store.save_crl(crl(&csca("DE"), &[&[0x01]])).unwrap();

    let mut leaf = dsc(&root, "QA", &[0x01]).certificate();
    let result = validator(&store, Settings::default()).validate_certificate(&mut leaf);

    assert!(result.not_revoked());
    assert!(result.is_valid());
    assert!(!leaf.has_critical_errors());
}

#[test]
fn missing_path_entry_is_an_error() {
    let store = Arc::new(InMemoryStore::new());
    let anchor = store.save_certificate(csca("QA").certificate()).unwrap();

    let path = TrustPath::new(vec![anchor, CertificateId::new()]).unwrap();
    assert_err!(
        validator(&store, Settings::default()).validate(&path, &mut StatusTracker::default()),
        Err(Error::CertificateNotFound { .. })
    );
}

#[test]
fn trust_path_bounds() {
    let ids: Vec<_> = (0..6).map(|_| CertificateId::new()).collect();

    assert_err!(TrustPath::new(vec![]), Err(Error::EmptyTrustPath));
    assert_err!(
        TrustPath::new(ids.clone()),
        Err(Error::TrustPathTooLong { depth: 6, max: 5 })
    );
    assert_err!(
        TrustPath::new(vec![ids[0], ids[1], ids[0]]),
        Err(Error::DuplicateTrustPathEntry(_))
    );
    assert_eq!(TrustPath::new(ids[..5].to_vec()).unwrap().depth(), 5);
}

#[test]
fn revoked_certificates_are_case_insensitive() {
    let revoked = RevokedCertificates::of(["01AB", "ffcd"]).unwrap();

    assert!(revoked.contains("01ab"));
    assert!(revoked.contains("FFCD"));
    assert!(!revoked.contains("0000"));
}

#[test]
fn crl_factory_rejects_country_mismatch() {
    let now = Utc::now();

    assert_err!(
        CertificateRevocationList::new(
            IssuerName::parse("CSCA-QA").unwrap(),
            CountryCode::parse("FR").unwrap(),
            CrlValidityPeriod::new(now, now + Duration::days(1)).unwrap(),
            vec![0x30],
            RevokedCertificates::default(),
            None,
        ),
        Err(Error::CountryMismatch { .. })
    );
    assert_err!(IssuerName::parse("QA"), Err(Error::InvalidIssuerName(_)));
}

#[test]
fn record_validation_twice_is_idempotent() {
    let store = Arc::new(InMemoryStore::new());
    let root = csca("QA");
    store.save_certificate(root.certificate()).unwrap();
    let mut leaf = dsc(&root, "QA", &[0x01]).certificate();
    let validator = validator(&store, Settings::default());

    let first = validator.validate_certificate(&mut leaf);
    let errors = leaf.validation_errors().len();

    leaf.record_validation(first.clone());
    leaf.record_validation(first);

    assert_eq!(leaf.status(), CertificateStatus::Valid);
    assert_eq!(leaf.validation_errors().len(), errors);
}

#[test]
fn expiration_boundary() {
    let now = Utc::now();
    let data = X509Data::new(
        vec![0x30],
        Some("01"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        vec![],
    )
    .unwrap();

    let expired = Certificate::new(
        data.clone(),
        SubjectInfo::from_dn("C=QA, CN=Signer").unwrap(),
        IssuerInfo::from_dn("C=QA, CN=CSCA QA", false).unwrap(),
        ValidityPeriod::new(now - Duration::days(30), now - Duration::seconds(1)).unwrap(),
        CertificateType::Dsc,
        None,
    );
    assert!(expired.is_expired());
    assert!(!expired.is_currently_valid());
    assert_eq!(expired.status(), CertificateStatus::Expired);

    let future = Certificate::new(
        data,
        SubjectInfo::from_dn("C=QA, CN=Signer").unwrap(),
        IssuerInfo::from_dn("C=QA, CN=CSCA QA", false).unwrap(),
        ValidityPeriod::new(now + Duration::seconds(1), now + Duration::days(30)).unwrap(),
        CertificateType::Dsc,
        None,
    );
    assert!(future.is_not_yet_valid());
}

#[test]
fn valid_result_requires_all_checks() {
    let mut checks = pkd_trust::model::ValidationChecks::all_true();
    checks.validity_valid = false;

    assert_err!(
        ValidationResult::of(CertificateStatus::Valid, checks, 0),
        Err(Error::InvalidValidationResult(_))
    );
}

#[test]
fn strict_key_usage_from_toml() {
    let store = Arc::new(InMemoryStore::new());
    let root = csca("QA");
    store.save_certificate(root.certificate()).unwrap();

    // A CSCA in the DSC role breaks every document signer rule.
    let mut misfiled = Certificate::from_der(
        &csca("QA").der(),
        CertificateType::Dsc,
        None,
    )
    .unwrap();

    let lenient = validator(&store, Settings::default());
    lenient.validate_certificate(&mut misfiled);
    assert!(misfiled.validation_errors().iter().any(|e| e.code()
        == validation_codes::BASIC_CONSTRAINTS_INVALID
        && !e.is_critical()));

    let strict = validator(
        &store,
        Settings::new()
            .with_toml("[validation]\nstrict_key_usage = true")
            .unwrap(),
    );
    let result = strict.validate_certificate(&mut misfiled);
    assert!(!result.constraints_valid());
    assert!(!result.is_valid());
    assert!(misfiled.has_critical_errors());
}

#[test]
fn batch_reports_progress_on_a_channel() {
    init_logging();

    let store = Arc::new(InMemoryStore::new());
    let root = csca("QA");
    store.save_certificate(root.certificate()).unwrap();

    let mut certificates: Vec<_> = (1u8..=8)
        .map(|serial| dsc(&root, "QA", &[serial]).certificate())
        .chain(std::iter::once(
            dsc_in_window(&root, "QA", &[0x20], 2, 30).certificate(),
        ))
        .collect();

    let batch = BatchValidator::new(Arc::new(validator(&store, Settings::default())));
    let (sender, receiver) = crossbeam_channel::unbounded();

    let summary = batch.validate_all(&mut certificates, &sender).unwrap();
    drop(sender);

    assert_eq!(summary.total, 9);
    assert_eq!(summary.valid, 8);
    assert_eq!(summary.invalid, 1);
    assert_eq!(receiver.iter().count(), 9);
}
