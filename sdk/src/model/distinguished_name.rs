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

//! Distinguished name parsing and the subject / issuer identity of a
//! certificate.
//!
//! Chain linkage compares DN strings exactly. The decomposed attributes here
//! are for display, search and revocation lookup only.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A distinguished name split into its attribute type / value pairs, in the
/// order they appear in the string.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DistinguishedName {
    attributes: Vec<(String, String)>,
}

impl DistinguishedName {
    /// Parse an RFC 4514-style string such as `C=QA, O=Ministry, CN=CSCA`.
    ///
    /// Separators are `,` and `+`. A backslash escapes the next character.
    /// Components without `=` are ignored.
    pub fn parse(dn: &str) -> Self {
        let mut attributes = Vec::new();

        for component in split_unescaped(dn) {
            let Some((attr_type, value)) = component.split_once('=') else {
                continue;
            };

            let attr_type = attr_type.trim();
            if attr_type.is_empty() {
                continue;
            }

            attributes.push((attr_type.to_owned(), unescape(value.trim())));
        }

        Self { attributes }
    }

    /// Returns the value of the first attribute of the given type, compared
    /// case-insensitively (`cn` matches `CN`).
    pub fn attribute(&self, attr_type: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(t, _)| t.eq_ignore_ascii_case(attr_type))
            .map(|(_, v)| v.as_str())
    }

    /// Returns `countryName` (`C`).
    pub fn country(&self) -> Option<&str> {
        self.attribute("C")
    }

    /// Returns `organizationName` (`O`).
    pub fn organization(&self) -> Option<&str> {
        self.attribute("O")
    }

    /// Returns `organizationalUnitName` (`OU`).
    pub fn organizational_unit(&self) -> Option<&str> {
        self.attribute("OU")
    }

    /// Returns `commonName` (`CN`).
    pub fn common_name(&self) -> Option<&str> {
        self.attribute("CN")
    }

    /// Returns the attribute pairs in order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }
}

fn split_unescaped(dn: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut escaped = false;

    for c in dn.chars() {
        if escaped {
            current.push('\\');
            current.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == ',' || c == '+' {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    if escaped {
        current.push('\\');
    }
    parts.push(current);

    parts
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }

    out.trim_matches('"').to_owned()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// The subject of a certificate.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SubjectInfo {
    distinguished_name: String,
    country_code: Option<String>,
    organization: Option<String>,
    organizational_unit: Option<String>,
    common_name: Option<String>,
}

impl SubjectInfo {
    /// Build from a DN string. Fails if the DN is blank.
    pub fn from_dn(dn: &str) -> Result<Self> {
        if dn.trim().is_empty() {
            return Err(Error::MissingField("subject_dn"));
        }

        let parsed = DistinguishedName::parse(dn);

        Ok(Self {
            distinguished_name: dn.to_owned(),
            country_code: non_blank(parsed.country()).map(|c| c.to_ascii_uppercase()),
            organization: non_blank(parsed.organization()),
            organizational_unit: non_blank(parsed.organizational_unit()),
            common_name: non_blank(parsed.common_name()),
        })
    }

    /// The DN exactly as it appears in the certificate.
    pub fn distinguished_name(&self) -> &str {
        &self.distinguished_name
    }

    /// Upper-cased `C` attribute, if any.
    pub fn country_code(&self) -> Option<&str> {
        self.country_code.as_deref()
    }

    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    pub fn organizational_unit(&self) -> Option<&str> {
        self.organizational_unit.as_deref()
    }

    pub fn common_name(&self) -> Option<&str> {
        self.common_name.as_deref()
    }
}

/// The issuer of a certificate.
///
/// `is_ca` is the certificate's own Basic Constraints `cA` flag. It lives
/// here because trust anchor qualification asks "is the issuer a CA", and a
/// trust anchor is its own issuer.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IssuerInfo {
    distinguished_name: String,
    country_code: Option<String>,
    organization: Option<String>,
    organizational_unit: Option<String>,
    common_name: Option<String>,
    is_ca: bool,
}

impl IssuerInfo {
    /// Build from a DN string and CA flag. Fails if the DN is blank.
    pub fn from_dn(dn: &str, is_ca: bool) -> Result<Self> {
        if dn.trim().is_empty() {
            return Err(Error::MissingField("issuer_dn"));
        }

        let parsed = DistinguishedName::parse(dn);

        Ok(Self {
            distinguished_name: dn.to_owned(),
            country_code: non_blank(parsed.country()).map(|c| c.to_ascii_uppercase()),
            organization: non_blank(parsed.organization()),
            organizational_unit: non_blank(parsed.organizational_unit()),
            common_name: non_blank(parsed.common_name()),
            is_ca,
        })
    }

    /// The DN exactly as it appears in the certificate.
    pub fn distinguished_name(&self) -> &str {
        &self.distinguished_name
    }

    /// Upper-cased `C` attribute, if any.
    pub fn country_code(&self) -> Option<&str> {
        self.country_code.as_deref()
    }

    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    pub fn organizational_unit(&self) -> Option<&str> {
        self.organizational_unit.as_deref()
    }

    pub fn common_name(&self) -> Option<&str> {
        self.common_name.as_deref()
    }

    pub fn is_ca(&self) -> bool {
        self.is_ca
    }
}
