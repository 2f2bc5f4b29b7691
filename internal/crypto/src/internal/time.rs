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

use chrono::{DateTime, Utc};
use x509_parser::time::ASN1Time;

/// Convert an ASN.1 `UTCTime` / `GeneralizedTime` into a UTC instant with
/// second precision.
pub(crate) fn asn1_time_to_utc(time: &ASN1Time) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(time.timestamp(), 0)
}
