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

use x509_parser::time::ASN1Time;

use crate::internal::time;

#[test]
fn asn1_time_round_trips_seconds() {
    let asn1 = ASN1Time::from_timestamp(1731560000).unwrap();
    let utc = time::asn1_time_to_utc(&asn1).unwrap();

    assert_eq!(utc.timestamp(), 1731560000);
}

#[test]
fn generalized_time_after_2049() {
    // 2051-01-01T00:00:00Z, beyond the UTCTime range
    let asn1 = ASN1Time::from_timestamp(2556144000).unwrap();
    let utc = time::asn1_time_to_utc(&asn1).unwrap();

    assert_eq!(utc.to_rfc3339(), "2051-01-01T00:00:00+00:00");
}
