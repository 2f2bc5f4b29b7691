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

//! Parallel validation of independent certificates.
//!
//! Certificates are spread over a `rayon` pool; the chain of each one is
//! still validated sequentially by [`TrustChainValidator::validate_certificate`].
//! Progress goes to an injected [`ProgressSink`].

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crossbeam_channel::Sender;
use log::{debug, info};
use rayon::{prelude::*, ThreadPoolBuilder};
use serde::Serialize;

use crate::{
    model::{Certificate, CertificateId, CertificateStatus},
    utils::time_it::TimeIt,
    validator::TrustChainValidator,
    Error, Result,
};

/// Reported once per certificate as it finishes.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ValidationProgress {
    pub certificate_id: CertificateId,
    pub status: CertificateStatus,

    /// Certificates finished so far, this one included.
    pub completed: usize,
    pub total: usize,
}

/// Receives [`ValidationProgress`] events from worker threads.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: ValidationProgress);
}

impl ProgressSink for Sender<ValidationProgress> {
    fn report(&self, progress: ValidationProgress) {
        if self.send(progress).is_err() {
            debug!("progress receiver dropped");
        }
    }
}

/// A [`ProgressSink`] that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _progress: ValidationProgress) {}
}

/// Counts of the statuses a batch ended with.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub valid: usize,
    pub expired: usize,
    pub not_yet_valid: usize,
    pub revoked: usize,
    pub invalid: usize,
    pub duration_ms: u64,
}

impl BatchSummary {
    fn count(&mut self, status: CertificateStatus) {
        self.total += 1;
        match status {
            CertificateStatus::Valid => self.valid += 1,
            CertificateStatus::Expired => self.expired += 1,
            CertificateStatus::NotYetValid => self.not_yet_valid += 1,
            CertificateStatus::Revoked => self.revoked += 1,
            CertificateStatus::Invalid => self.invalid += 1,
        }
    }
}

/// Validates many certificates at once.
pub struct BatchValidator {
    validator: Arc<TrustChainValidator>,
    worker_threads: usize,
}

impl BatchValidator {
    /// Uses `batch.worker_threads` from the validator's settings; `0` runs
    /// on the global rayon pool.
    pub fn new(validator: Arc<TrustChainValidator>) -> Self {
        let worker_threads = validator.settings().batch.worker_threads;

        Self {
            validator,
            worker_threads,
        }
    }

    /// Validate every certificate in `certificates`, recording the result
    /// on each.
    pub fn validate_all(
        &self,
        certificates: &mut [Certificate],
        sink: &dyn ProgressSink,
    ) -> Result<BatchSummary> {
        let timer = TimeIt::new("validate_all");
        let total = certificates.len();

        if self.worker_threads == 0 {
            self.run(certificates, sink);
        } else {
            let pool = ThreadPoolBuilder::new()
                .num_threads(self.worker_threads)
                .thread_name(|i| format!("pkd-validate-{i}"))
                .build()
                .map_err(|err| Error::OtherError(Box::new(err)))?;

            pool.install(|| self.run(certificates, sink));
        }

        let mut summary = BatchSummary::default();
        for certificate in certificates.iter() {
            summary.count(certificate.status());
        }
        summary.duration_ms = timer.elapsed_ms();

        info!(
            "validated {total} certificates in {} ms: {} valid, {} invalid",
            summary.duration_ms,
            summary.valid,
            total - summary.valid
        );

        Ok(summary)
    }

    fn run(&self, certificates: &mut [Certificate], sink: &dyn ProgressSink) {
        let total = certificates.len();
        let completed = AtomicUsize::new(0);

        certificates.par_iter_mut().for_each(|certificate| {
            let result = self.validator.validate_certificate(certificate);

            sink.report(ValidationProgress {
                certificate_id: certificate.id(),
                status: result.overall_status(),
                completed: completed.fetch_add(1, Ordering::Relaxed) + 1,
                total,
            });
        });
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crossbeam_channel::unbounded;

    use super::*;
    use crate::{
        settings::Settings,
        store::InMemoryStore,
        utils::test::{crl, csca, dsc, dsc_with, window},
    };

    fn batch(store: &Arc<InMemoryStore>, worker_threads: usize) -> BatchValidator {
        let mut settings = Settings::default();
        settings.batch.worker_threads = worker_threads;

        BatchValidator::new(Arc::new(TrustChainValidator::new(
            store.clone(),
            store.clone(),
            settings,
        )))
    }

    #[test]
    fn summary_counts_statuses() {
        let store = Arc::new(InMemoryStore::new());
        let root = csca("QA");
        store.save_certificate(root.certificate()).unwrap();
        store.save_crl(crl(&root, &[&[0x03]])).unwrap();

        let mut certificates = vec![
            dsc(&root, "QA", &[0x01]).certificate(),
            dsc(&root, "QA", &[0x02]).certificate(),
            dsc(&root, "QA", &[0x03]).certificate(),
            dsc_with(&root, "QA", &[0x04], |p| window(p, -10, -1)).certificate(),
            dsc(&csca("DE"), "DE", &[0x05]).certificate(),
        ];

        let (sender, receiver) = unbounded();
        let summary = batch(&store, 2)
            .validate_all(&mut certificates, &sender)
            .unwrap();
        drop(sender);

        assert_eq!(summary.total, 5);
        assert_eq!(summary.valid, 2);
        assert_eq!(summary.revoked, 1);
        assert_eq!(summary.expired, 1);
        assert_eq!(summary.invalid, 1);

        let events: Vec<_> = receiver.iter().collect();
        assert_eq!(events.len(), 5);
        assert!(events.iter().all(|e| e.total == 5));

        let mut completed: Vec<_> = events.iter().map(|e| e.completed).collect();
        completed.sort_unstable();
        assert_eq!(completed, vec![1, 2, 3, 4, 5]);

        assert!(certificates.iter().all(|c| c.validation_result().is_some()));
    }

    #[test]
    fn global_pool_and_empty_batch() {
        let store = Arc::new(InMemoryStore::new());

        let summary = batch(&store, 0).validate_all(&mut [], &NoProgress).unwrap();

        assert_eq!(summary.total, 0);
        assert_eq!(summary.valid, 0);
    }

    #[test]
    fn dropped_receiver_is_ignored() {
        let store = Arc::new(InMemoryStore::new());
        let root = csca("QA");
        store.save_certificate(root.certificate()).unwrap();
        let mut certificates = vec![dsc(&root, "QA", &[0x01]).certificate()];

        let (sender, receiver) = unbounded();
        drop(receiver);

        let summary = batch(&store, 0)
            .validate_all(&mut certificates, &sender)
            .unwrap();
        assert_eq!(summary.valid, 1);
    }
}
