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

use std::fmt::Debug;

use log::{info, warn};

use crate::{LogItem, LogKind};

/// A `StatusTracker` collects the [`LogItem`]s produced while validating one
/// certificate.
///
/// The tracker never aborts validation. Every finding is recorded and the
/// caller decides what the aggregate means.
#[derive(Debug, Default)]
pub struct StatusTracker {
    logged_items: Vec<LogItem>,
}

impl StatusTracker {
    /// Returns the current list of validation log items.
    pub fn logged_items(&self) -> &[LogItem] {
        &self.logged_items
    }

    /// Removes and returns all log items, leaving the tracker empty.
    pub fn take_logged_items(&mut self) -> Vec<LogItem> {
        std::mem::take(&mut self.logged_items)
    }

    /// Appends the contents of another [`StatusTracker`] to this one.
    pub fn append(&mut self, other: &StatusTracker) {
        for log_item in other.logged_items() {
            self.push(log_item.clone());
        }
    }

    /// Adds a non-error [`LogItem`] to this status tracker.
    ///
    /// Primarily intended for use by [`LogItem::success()`],
    /// [`LogItem::informational()`] or [`LogItem::warning()`].
    pub fn add_non_error(&mut self, log_item: LogItem) {
        self.push(log_item);
    }

    /// Adds an error-case [`LogItem`] to this status tracker.
    pub fn add_error(&mut self, log_item: LogItem) {
        self.push(log_item);
    }

    fn push(&mut self, log_item: LogItem) {
        match log_item.kind {
            LogKind::Warning => warn!(
                "Validation warning: {} ({}): {}",
                log_item.validation_status.as_deref().unwrap_or("-"),
                log_item.label,
                log_item.description
            ),
            LogKind::Failure => info!(
                "Validation failure: {} ({}): {}",
                log_item.validation_status.as_deref().unwrap_or("-"),
                log_item.label,
                log_item.description
            ),
            LogKind::Success | LogKind::Informational => {
                info!("Validation info: {log_item:#?}")
            }
        }

        self.logged_items.push(log_item);
    }

    /// Returns the [`LogItem`]s that describe failures.
    pub fn filter_errors(&self) -> impl Iterator<Item = &LogItem> {
        self.logged_items()
            .iter()
            .filter(|item| item.kind == LogKind::Failure)
    }

    /// Returns the [`LogItem`]s that describe warnings.
    pub fn filter_warnings(&self) -> impl Iterator<Item = &LogItem> {
        self.logged_items()
            .iter()
            .filter(|item| item.kind == LogKind::Warning)
    }

    /// Returns `true` if the validator has encountered the given validation
    /// code.
    pub fn has_status(&self, val: &str) -> bool {
        self.logged_items().iter().any(|vi| {
            if let Some(vs) = &vi.validation_status {
                vs == val
            } else {
                false
            }
        })
    }

    /// Returns `true` if the validator has encountered the specified error
    /// (compared by its `Debug` rendering).
    pub fn has_error<E: Debug>(&self, err: E) -> bool {
        let err_type = format!("{:?}", &err);
        self.logged_items().iter().any(|vi| {
            if let Some(e) = &vi.err_val {
                e == &err_type
            } else {
                false
            }
        })
    }

    /// Returns `true` if any failure has been recorded.
    pub fn has_any_error(&self) -> bool {
        self.filter_errors().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]

    use std::fmt::{self, Display, Formatter};

    use crate::{log_item, LogItem, StatusTracker};

    #[test]
    fn aggregates_errors() {
        let mut tracker = StatusTracker::default();

        // Add an item without an error.
        log_item!("test1", "test item 1", "test func").success(&mut tracker);

        // Add another item with an error. Should not stop.
        log_item!("test2", "test item 1", "test func")
            .validation_status("SIGNATURE_INVALID")
            .failure_no_throw(&mut tracker, SampleError {});

        assert_eq!(tracker.logged_items().len(), 2);

        assert!(tracker.has_status("SIGNATURE_INVALID"));
        assert!(!tracker.has_status("blah"));

        assert!(tracker.has_error(SampleError {}));
        assert!(!tracker.has_error("Something Else"));

        // Verify that one item with error was found.
        let errors: Vec<&LogItem> = tracker.filter_errors().collect();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn append() {
        let mut tracker1 = StatusTracker::default();
        let mut tracker2 = StatusTracker::default();

        log_item!("test1", "test item 1", "test func").success(&mut tracker1);
        log_item!("test2", "test item 1", "test func")
            .failure_no_throw(&mut tracker2, SampleError {});

        tracker1.append(&tracker2);

        assert_eq!(tracker1.logged_items().len(), 2);
        assert_eq!(tracker2.logged_items().len(), 1);
    }

    #[test]
    fn take_logged_items() {
        let mut tracker = StatusTracker::default();
        log_item!("test1", "test item 1", "test func").warning(&mut tracker);

        let items = tracker.take_logged_items();

        assert_eq!(items.len(), 1);
        assert!(tracker.logged_items().is_empty());
    }

    #[derive(Debug, Eq, PartialEq)]
    struct SampleError {}

    impl Display for SampleError {
        fn fmt(&self, f: &mut Formatter) -> fmt::Result {
            write!(f, "SampleError")
        }
    }
}
