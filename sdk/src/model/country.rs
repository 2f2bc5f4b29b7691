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

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An ISO 3166-1 alpha-2 country code, normalized to upper case.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse a two letter code. Surrounding whitespace is ignored and the
    /// result is upper-cased.
    pub fn parse(code: &str) -> Result<Self> {
        let code = code.trim();

        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(Error::InvalidCountryCode(code.to_owned()));
        }

        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(value: CountryCode) -> Self {
        value.0
    }
}

/// The issuer name under which a CRL is filed: `CSCA-<country>`.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct IssuerName {
    country: CountryCode,
}

impl IssuerName {
    const PREFIX: &'static str = "CSCA-";

    /// Parse `CSCA-XX`. The prefix is matched case-insensitively; the
    /// country part must be a valid [`CountryCode`].
    pub fn parse(name: &str) -> Result<Self> {
        let name = name.trim();

        let country = name
            .get(..Self::PREFIX.len())
            .filter(|prefix| prefix.eq_ignore_ascii_case(Self::PREFIX))
            .and_then(|_| name.get(Self::PREFIX.len()..))
            .ok_or_else(|| Error::InvalidIssuerName(name.to_owned()))?;

        let country =
            CountryCode::parse(country).map_err(|_| Error::InvalidIssuerName(name.to_owned()))?;

        Ok(Self { country })
    }

    /// The issuer name of the CSCA for `country`.
    pub fn for_country(country: &CountryCode) -> Self {
        Self {
            country: country.clone(),
        }
    }

    /// The country embedded in the name.
    pub fn country(&self) -> &CountryCode {
        &self.country
    }
}

impl fmt::Display for IssuerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.country)
    }
}

impl TryFrom<String> for IssuerName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<IssuerName> for String {
    fn from(value: IssuerName) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn country_code() {
        assert_eq!(CountryCode::parse("qa").unwrap().as_str(), "QA");
        assert_eq!(CountryCode::parse(" De ").unwrap().to_string(), "DE");

        for bad in ["", "Q", "QAT", "Q1", "é1", "  "] {
            assert!(
                matches!(CountryCode::parse(bad), Err(Error::InvalidCountryCode(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn issuer_name() {
        let name = IssuerName::parse("CSCA-QA").unwrap();
        assert_eq!(name.country().as_str(), "QA");
        assert_eq!(name.to_string(), "CSCA-QA");

        assert_eq!(IssuerName::parse("csca-de").unwrap().to_string(), "CSCA-DE");

        for bad in ["", "CSCA", "CSCA-", "CSCA-QAT", "DSC-QA", "CSCAQA", "CSCA-1A"] {
            assert!(
                matches!(IssuerName::parse(bad), Err(Error::InvalidIssuerName(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn issuer_name_for_country() {
        let country = CountryCode::parse("fr").unwrap();

        assert_eq!(IssuerName::for_country(&country).to_string(), "CSCA-FR");
    }

    #[test]
    fn serde_as_strings() {
        let name: IssuerName = serde_json::from_str("\"CSCA-QA\"").unwrap();
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"CSCA-QA\"");

        assert!(serde_json::from_str::<CountryCode>("\"QAT\"").is_err());
    }
}
