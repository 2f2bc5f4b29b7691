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

use std::{borrow::Cow, fmt::Debug};

use crate::StatusTracker;

/// Creates a [`LogItem`] struct that is annotated with the source file and line
/// number where the log condition was discovered.
///
/// Takes three parameters, each of which may be a `'static str` or `String`:
///
/// * `label`: what this `LogItem` is about (typically a certificate id or
///   distinguished name)
/// * `description`: human-readable reason for this `LogItem` to have been
///   generated
/// * `function`: name of the function generating this `LogItem`
///
/// ## Example
///
/// ```
/// # use std::borrow::Cow;
/// # use pkd_status_tracker::{log_item, LogItem, LogKind};
/// let log = log_item!("test1", "test item 1", "test func");
///
/// assert_eq!(log.kind, LogKind::Informational);
/// assert_eq!(log.label, Cow::Borrowed("test1"));
/// assert_eq!(log.file, Cow::Borrowed(file!()));
/// # assert!(log.line > 2);
/// ```
#[macro_export]
macro_rules! log_item {
    ($label:expr, $description:expr, $function:expr) => {{
        $crate::LogItem {
            kind: $crate::LogKind::Informational,
            label: $label.into(),
            crate_name: env!("CARGO_PKG_NAME").into(),
            crate_version: env!("CARGO_PKG_VERSION").into(),
            file: file!().into(),
            function: $function.into(),
            line: line!(),
            description: $description.into(),
            ..Default::default()
        }
    }};
}

/// Detailed information about a validation finding.
///
/// Use the [`log_item`](crate::log_item) macro to create a `LogItem`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogItem {
    /// Kind of log item.
    pub kind: LogKind,

    /// What the item refers to, typically a certificate id or DN.
    pub label: Cow<'static, str>,

    /// Description of the finding.
    pub description: Cow<'static, str>,

    /// Crate where the finding was detected.
    pub crate_name: Cow<'static, str>,

    /// Version of the crate where the finding was detected.
    pub crate_version: Cow<'static, str>,

    /// Source file where the finding was detected.
    pub file: Cow<'static, str>,

    /// Function where the finding was detected.
    pub function: Cow<'static, str>,

    /// Source line number where the finding was detected.
    pub line: u32,

    /// Error value as string.
    pub err_val: Option<Cow<'static, str>>,

    /// Validation code, one of the constants in
    /// [`validation_codes`](crate::validation_codes).
    pub validation_status: Option<Cow<'static, str>>,
}

impl Default for LogItem {
    fn default() -> Self {
        LogItem {
            kind: LogKind::Success,
            label: Cow::Borrowed(""),
            description: Cow::Borrowed(""),
            crate_name: env!("CARGO_PKG_NAME").into(),
            crate_version: env!("CARGO_PKG_VERSION").into(),
            file: Cow::Borrowed(""),
            function: Cow::Borrowed(""),
            line: 0,
            err_val: None,
            validation_status: None,
        }
    }
}

impl LogItem {
    /// Add a validation code.
    #[must_use]
    pub fn validation_status(self, status: &'static str) -> Self {
        LogItem {
            validation_status: Some(status.into()),
            ..self
        }
    }

    /// Set the log item kind to [`LogKind::Success`] and add it to the
    /// [`StatusTracker`].
    pub fn success(mut self, tracker: &mut StatusTracker) {
        self.kind = LogKind::Success;
        tracker.add_non_error(self);
    }

    /// Set the log item kind to [`LogKind::Informational`] and add it to the
    /// [`StatusTracker`].
    pub fn informational(mut self, tracker: &mut StatusTracker) {
        self.kind = LogKind::Informational;
        tracker.add_non_error(self);
    }

    /// Set the log item kind to [`LogKind::Warning`] and add it to the
    /// [`StatusTracker`].
    pub fn warning(mut self, tracker: &mut StatusTracker) {
        self.kind = LogKind::Warning;
        tracker.add_non_error(self);
    }

    /// Set the log item kind to [`LogKind::Failure`], capture the error value
    /// and add it to the [`StatusTracker`].
    pub fn failure_no_throw<E: Debug>(mut self, tracker: &mut StatusTracker, err: E) {
        self.kind = LogKind::Failure;
        self.err_val = Some(format!("{err:?}").into());

        tracker.add_error(self);
    }

    /// Like [`failure_no_throw`](Self::failure_no_throw) but hands the error
    /// back so the caller can return it.
    pub fn failure_as_err<E: Debug>(mut self, tracker: &mut StatusTracker, err: E) -> E {
        self.kind = LogKind::Failure;
        self.err_val = Some(format!("{err:?}").into());

        tracker.add_error(self);
        err
    }

    /// Record this item as a [`LogKind::Warning`] or a [`LogKind::Failure`]
    /// depending on `as_failure`.
    pub fn warning_or_failure(self, tracker: &mut StatusTracker, as_failure: bool) {
        if as_failure {
            let description = self.description.clone();
            self.failure_no_throw(tracker, description);
        } else {
            self.warning(tracker);
        }
    }
}

/// Describes the kind of a [`LogItem`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LogKind {
    /// A check passed.
    Success,

    /// Something noteworthy that does not affect the verdict.
    Informational,

    /// A problem that does not make the certificate invalid.
    Warning,

    /// A check failed.
    Failure,
}
