/*
 * dptk profiles streams of textual values and infers their semantic types.
 * This toolkit aims to be reliable, simple, performant, and standards compliant.
 * Copyright (C) 2025  Luis M. Santos, M.D.
 *
 * This library is free software; you can redistribute it and/or
 * modify it under the terms of the GNU Lesser General Public
 * License as published by the Free Software Foundation; either
 * version 2.1 of the License, or (at your option) any later version.
 *
 * This library is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
 * Lesser General Public License for more details.
 *
 * You should have received a copy of the GNU Lesser General Public
 * License along with this library; if not, write to the Free Software
 * Foundation, Inc., 51 Franklin Street, Fifth Floor, Boston, MA  02110-1301  USA
 */

pub mod logical_types {
    use crate::profile_constants::GENDERS;
    use dptk_core::cache::{DPSet, Lazy};
    use dptk_core::search::dp_search::string_is_full_match;
    use dptk_core::strings::{DPString, SampleStringExtensions};

    /**************************** Constants**************************************/

    const EMAIL_SYNTAX: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}";
    const URL_SYNTAX: &str = r"[a-zA-Z][a-zA-Z0-9+.-]*://\S+";

    /**************************** Types *****************************************/

    ///
    /// A read-only lookup set loaded once per process from plain UTF-8 text,
    /// one entry per line. Uppercase + trim normalization applies on lookup.
    ///
    #[derive(Debug)]
    pub struct ReferenceSet {
        entries: DPSet<DPString>,
    }

    impl ReferenceSet {
        fn from_lines(raw: &str) -> ReferenceSet {
            let mut entries = DPSet::with_capacity(raw.lines().count());
            for line in raw.lines() {
                let entry = line.trim();
                if !entry.is_empty() {
                    entries.insert(DPString::from(entry.to_uppercase()));
                }
            }
            ReferenceSet { entries }
        }

        fn from_slice(raw: &[&str]) -> ReferenceSet {
            let mut entries = DPSet::with_capacity(raw.len());
            for entry in raw {
                entries.insert(DPString::from(entry.to_uppercase()));
            }
            ReferenceSet { entries }
        }

        pub fn contains(&self, sample: &str) -> bool {
            self.entries.contains(&sample.to_lookup_key())
        }

        pub fn len(&self) -> usize {
            self.entries.len()
        }

        pub fn is_empty(&self) -> bool {
            self.entries.is_empty()
        }
    }

    /**************************** Globals ***************************************/

    static US_ZIPS: Lazy<ReferenceSet> =
        Lazy::new(|| ReferenceSet::from_lines(include_str!("../resources/us_zips.csv")));
    static US_STATES: Lazy<ReferenceSet> =
        Lazy::new(|| ReferenceSet::from_lines(include_str!("../resources/us_states.csv")));
    static CA_PROVINCES: Lazy<ReferenceSet> =
        Lazy::new(|| ReferenceSet::from_lines(include_str!("../resources/ca_provinces.csv")));
    static COUNTRIES: Lazy<ReferenceSet> =
        Lazy::new(|| ReferenceSet::from_lines(include_str!("../resources/countries.csv")));
    static ADDRESS_MARKERS: Lazy<ReferenceSet> =
        Lazy::new(|| ReferenceSet::from_lines(include_str!("../resources/address_markers.csv")));
    static ZONE_NAMES: Lazy<ReferenceSet> =
        Lazy::new(|| ReferenceSet::from_lines(include_str!("../resources/zone_names.csv")));
    static GENDER_SET: Lazy<ReferenceSet> = Lazy::new(|| ReferenceSet::from_slice(&GENDERS));

    pub fn us_zips() -> &'static ReferenceSet {
        &US_ZIPS
    }

    pub fn us_states() -> &'static ReferenceSet {
        &US_STATES
    }

    pub fn ca_provinces() -> &'static ReferenceSet {
        &CA_PROVINCES
    }

    pub fn countries() -> &'static ReferenceSet {
        &COUNTRIES
    }

    pub fn address_markers() -> &'static ReferenceSet {
        &ADDRESS_MARKERS
    }

    pub fn genders() -> &'static ReferenceSet {
        &GENDER_SET
    }

    ///
    /// Whether the token names a recognized time zone.
    ///
    pub fn is_zone_name(token: &str) -> bool {
        ZONE_NAMES.contains(token)
    }

    /**************************** Syntactic checks ******************************/

    ///
    /// Email syntax check. Accepts `,`/`;` separated address lists the way
    /// mail headers carry them; every member must validate.
    ///
    pub fn is_valid_email(sample: &str) -> bool {
        let trimmed = sample.trim();
        if trimmed.is_empty() {
            return false;
        }
        trimmed
            .split([',', ';'])
            .all(|addr| string_is_full_match(addr.trim(), EMAIL_SYNTAX))
    }

    ///
    /// URL syntax check: a scheme, `://`, and no embedded whitespace.
    ///
    pub fn is_valid_url(sample: &str) -> bool {
        string_is_full_match(sample.trim(), URL_SYNTAX)
    }

    ///
    /// Address heuristic: the final whitespace-delimited token is a street
    /// type marker and the sample leads with a number.
    ///
    pub fn looks_like_address(sample: &str) -> bool {
        let trimmed = sample.trim();
        if !address_markers().contains(trimmed.last_token()) {
            return false;
        }
        trimmed.chars().next().is_some_and(|c| c.is_ascii_digit())
    }
}
