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

pub mod stream_tracker {
    use crate::profile_chars::char_classes::ProfileLocale;
    use crate::profile_constants::*;
    use crate::profile_date_parse::date_format::DateTimeFormat;
    use crate::profile_logical::logical_types::{
        ca_provinces, countries, genders, is_valid_email, is_valid_url, looks_like_address,
        us_states, us_zips,
    };
    use crate::profile_patterns::pattern_registry::{SemanticType, TypeQualifier};
    use bigdecimal::BigDecimal;
    use dptk_core::cache::DPCache;
    use dptk_core::strings::{DPString, SampleStringExtensions};
    use num_bigint::BigInt;
    use std::str::FromStr;
    use std::sync::Arc;
    use tracing::debug;

    /**************************** Types *****************************************/

    ///
    /// Ordering key for date/time extremes: calendar fields from most to
    /// least significant.
    ///
    pub type DateKey = (i32, u32, u32, u32, u32, u32);

    ///
    /// The locked-in conclusion the tracker validates against. Reflection may
    /// rewrite it wholesale; the date repair path only swaps the format.
    ///
    #[derive(Debug, Clone)]
    pub struct TypeConclusion {
        pub base_type: SemanticType,
        pub qualifier: Option<TypeQualifier>,
        pub pattern: DPString,
        pub min_length: usize,
        pub max_length: usize,
        pub format: Option<Arc<DateTimeFormat>>,
    }

    impl TypeConclusion {
        pub fn structural(base_type: SemanticType, pattern: &str) -> TypeConclusion {
            TypeConclusion {
                base_type,
                qualifier: None,
                pattern: DPString::from(pattern),
                min_length: 1,
                max_length: usize::MAX,
                format: None,
            }
        }
    }

    ///
    /// What happened to one tracked sample.
    ///
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum TrackOutcome {
        Matched,
        Outlier,
        /// The outlier map just reached its cap: a reflection trigger, not a
        /// silently absorbed bound.
        OutlierSaturated,
    }

    ///
    /// Per-sample streaming statistics, updated for every sample after the
    /// window locks a type in.
    ///
    #[derive(Debug)]
    pub struct StreamTracker {
        pub max_cardinality: usize,
        pub max_outliers: usize,
        pub collect_statistics: bool,

        pub match_count: u64,
        pub cardinality: DPCache<DPString, u64>,
        pub outliers: DPCache<DPString, u64>,
        pub overflow_outliers: u64,

        pub total_leading_zeros: u64,
        pub negative_longs: u64,
        pub negative_doubles: u64,

        pub min_long: Option<i64>,
        pub max_long: Option<i64>,
        pub min_double: Option<f64>,
        pub max_double: Option<f64>,
        pub sum_long: BigInt,
        pub sum_double: BigDecimal,

        pub min_string: Option<DPString>,
        pub max_string: Option<DPString>,
        pub min_boolean: Option<DPString>,
        pub max_boolean: Option<DPString>,
        pub min_date: Option<(DateKey, DPString)>,
        pub max_date: Option<(DateKey, DPString)>,

        pub min_trimmed_length: Option<usize>,
        pub max_trimmed_length: Option<usize>,

        // Outlier taxonomy consulted by the backout rules.
        pub outlier_longs: u64,
        pub outlier_doubles: u64,
        pub outlier_alphas: u64,
        pub outlier_alnums: u64,
        pub bad_char_count: u64,
    }

    impl StreamTracker {
        pub fn new(
            max_cardinality: usize,
            max_outliers: usize,
            collect_statistics: bool,
        ) -> StreamTracker {
            StreamTracker {
                max_cardinality,
                max_outliers,
                collect_statistics,
                match_count: 0,
                cardinality: DPCache::with_capacity(max_cardinality.min(128)),
                outliers: DPCache::with_capacity(max_outliers.min(32)),
                overflow_outliers: 0,
                total_leading_zeros: 0,
                negative_longs: 0,
                negative_doubles: 0,
                min_long: None,
                max_long: None,
                min_double: None,
                max_double: None,
                sum_long: BigInt::from(0),
                sum_double: BigDecimal::from(0),
                min_string: None,
                max_string: None,
                min_boolean: None,
                max_boolean: None,
                min_date: None,
                max_date: None,
                min_trimmed_length: None,
                max_trimmed_length: None,
                outlier_longs: 0,
                outlier_doubles: 0,
                outlier_alphas: 0,
                outlier_alnums: 0,
                bad_char_count: 0,
            }
        }

        /**************************** Validation ********************************/

        ///
        /// Validate one raw sample against the current conclusion and fold it
        /// into the running statistics.
        ///
        pub fn track(
            &mut self,
            raw: &str,
            conclusion: &mut TypeConclusion,
            locale: &ProfileLocale,
        ) -> TrackOutcome {
            let trimmed = raw.trim();
            let matched = match conclusion.base_type {
                SemanticType::Long => self.track_long(trimmed, conclusion, locale),
                SemanticType::Double => self.track_double(trimmed, locale),
                SemanticType::Boolean => self.track_boolean(trimmed, conclusion),
                SemanticType::String => self.track_string(trimmed, conclusion, locale),
                _ => self.track_date(trimmed, conclusion, locale),
            };
            match matched {
                true => {
                    self.match_count += 1;
                    self.update_length_extremes(trimmed);
                    self.cardinality_insert(raw);
                    TrackOutcome::Matched
                }
                false => self.outlier_insert(raw, locale),
            }
        }

        fn track_long(
            &mut self,
            trimmed: &str,
            conclusion: &TypeConclusion,
            locale: &ProfileLocale,
        ) -> bool {
            let value = match parse_long(trimmed, locale) {
                Some(v) => v,
                None => return false,
            };
            if conclusion.qualifier == Some(TypeQualifier::Zip) && !us_zips().contains(trimmed) {
                return false;
            }
            if trimmed.has_leading_zero() {
                self.total_leading_zeros += 1;
            }
            if value < 0 {
                self.negative_longs += 1;
            }
            if self.collect_statistics {
                self.min_long = Some(self.min_long.map_or(value, |m| m.min(value)));
                self.max_long = Some(self.max_long.map_or(value, |m| m.max(value)));
                self.sum_long += BigInt::from(value);
            }
            true
        }

        fn track_double(&mut self, trimmed: &str, locale: &ProfileLocale) -> bool {
            let normalized = locale.normalize_numeric(trimmed);
            let value = match normalized.parse::<f64>() {
                Ok(v) => v,
                Err(_) => return false,
            };
            if value < 0.0 {
                self.negative_doubles += 1;
            }
            // NaN and infinities are valid doubles but stay out of the
            // extremes and the sum.
            if self.collect_statistics && value.is_finite() {
                self.min_double = Some(self.min_double.map_or(value, |m| m.min(value)));
                self.max_double = Some(self.max_double.map_or(value, |m| m.max(value)));
                if let Ok(decimal) = BigDecimal::from_str(normalized.as_str()) {
                    self.sum_double += decimal;
                }
            }
            true
        }

        fn track_boolean(&mut self, trimmed: &str, conclusion: &TypeConclusion) -> bool {
            let canonical = match boolean_canonical(trimmed, conclusion.pattern.as_str()) {
                Some(c) => c,
                None => return false,
            };
            if self.collect_statistics {
                let update_min = match &self.min_boolean {
                    None => true,
                    Some(current) => boolean_rank(canonical) < boolean_rank(current),
                };
                if update_min {
                    self.min_boolean = Some(DPString::from(canonical));
                }
                let update_max = match &self.max_boolean {
                    None => true,
                    Some(current) => boolean_rank(canonical) > boolean_rank(current),
                };
                if update_max {
                    self.max_boolean = Some(DPString::from(canonical));
                }
            }
            true
        }

        fn track_string(
            &mut self,
            trimmed: &str,
            conclusion: &TypeConclusion,
            locale: &ProfileLocale,
        ) -> bool {
            let len = trimmed.chars().count();
            if len < conclusion.min_length || len > conclusion.max_length {
                return false;
            }
            let qualified = match conclusion.qualifier {
                Some(TypeQualifier::Email) => is_valid_email(trimmed),
                Some(TypeQualifier::Url) => is_valid_url(trimmed),
                Some(TypeQualifier::Address) => looks_like_address(trimmed),
                Some(TypeQualifier::UsState) => us_states().contains(trimmed),
                Some(TypeQualifier::CaProvince) => ca_provinces().contains(trimmed),
                Some(TypeQualifier::NaState) => {
                    us_states().contains(trimmed) || ca_provinces().contains(trimmed)
                }
                Some(TypeQualifier::Country) => countries().contains(trimmed),
                Some(TypeQualifier::Gender) => genders().contains(trimmed),
                Some(TypeQualifier::MonthAbbr) => locale.month_abbr_index(trimmed).is_some(),
                _ => true,
            };
            if !qualified {
                return false;
            }
            if self.collect_statistics {
                let key = DPString::from(trimmed);
                let shrink = match &self.min_string {
                    None => true,
                    Some(current) => key < *current,
                };
                if shrink {
                    self.min_string = Some(key.clone());
                }
                let grow = match &self.max_string {
                    None => true,
                    Some(current) => key > *current,
                };
                if grow {
                    self.max_string = Some(key);
                }
            }
            true
        }

        fn track_date(
            &mut self,
            trimmed: &str,
            conclusion: &mut TypeConclusion,
            locale: &ProfileLocale,
        ) -> bool {
            let format = match &conclusion.format {
                Some(f) => Arc::clone(f),
                None => return false,
            };
            let parsed = match format.validate(trimmed, locale) {
                Ok(parsed) => parsed,
                Err(failure) => {
                    // One repair attempt for the two "insufficient digits"
                    // reasons: shrink dd -> d (or MM -> M) and retry.
                    let day_field = failure.reason == REASON_INSUFFICIENT_DAY_DIGITS;
                    let month_field = failure.reason == REASON_INSUFFICIENT_MONTH_DIGITS;
                    if !day_field && !month_field {
                        return false;
                    }
                    let repaired = match format.repaired_format(day_field) {
                        Some(f) => f,
                        None => return false,
                    };
                    let descriptor = match DateTimeFormat::cached(&repaired) {
                        Ok(d) => d,
                        Err(_) => return false,
                    };
                    match descriptor.validate(trimmed, locale) {
                        Ok(parsed) => {
                            debug!(
                                from = conclusion.pattern.as_str(),
                                to = repaired.as_str(),
                                "repaired date format after digit-width mismatch"
                            );
                            conclusion.pattern = descriptor.get_regexp();
                            conclusion.format = Some(descriptor);
                            parsed
                        }
                        Err(_) => return false,
                    }
                }
            };
            if self.collect_statistics {
                let key = parsed.compare_key();
                let raw = DPString::from(trimmed);
                let shrink = match &self.min_date {
                    None => true,
                    Some((current, _)) => key < *current,
                };
                if shrink {
                    self.min_date = Some((key, raw.clone()));
                }
                let grow = match &self.max_date {
                    None => true,
                    Some((current, _)) => key > *current,
                };
                if grow {
                    self.max_date = Some((key, raw));
                }
            }
            true
        }

        /**************************** Map upkeep ********************************/

        fn update_length_extremes(&mut self, trimmed: &str) {
            let len = trimmed.chars().count();
            self.min_trimmed_length = Some(self.min_trimmed_length.map_or(len, |m| m.min(len)));
            self.max_trimmed_length = Some(self.max_trimmed_length.map_or(len, |m| m.max(len)));
        }

        fn cardinality_insert(&mut self, raw: &str) {
            if let Some(count) = self.cardinality.get_mut(raw) {
                *count += 1;
                return;
            }
            if self.cardinality.len() < self.max_cardinality {
                self.cardinality.insert(DPString::from(raw), 1);
            }
        }

        fn outlier_insert(&mut self, raw: &str, locale: &ProfileLocale) -> TrackOutcome {
            let trimmed = raw.trim();
            if parse_long(trimmed, locale).is_some() {
                self.outlier_longs += 1;
            } else if locale.normalize_numeric(trimmed).parse::<f64>().is_ok() {
                self.outlier_doubles += 1;
            }
            if !trimmed.is_empty() {
                if trimmed.chars().all(|c| c.is_alphabetic()) {
                    self.outlier_alphas += 1;
                } else if trimmed.chars().all(|c| c.is_alphanumeric()) {
                    self.outlier_alnums += 1;
                }
            }
            if trimmed.has_junk() {
                self.bad_char_count += 1;
            }
            if let Some(count) = self.outliers.get_mut(raw) {
                *count += 1;
                return TrackOutcome::Outlier;
            }
            if self.outliers.len() < self.max_outliers {
                self.outliers.insert(DPString::from(raw), 1);
                if self.outliers.len() == self.max_outliers {
                    return TrackOutcome::OutlierSaturated;
                }
                return TrackOutcome::Outlier;
            }
            self.overflow_outliers += 1;
            TrackOutcome::Outlier
        }

        ///
        /// Total observations currently classified as outliers.
        ///
        pub fn outlier_total(&self) -> u64 {
            self.outliers.values().sum::<u64>() + self.overflow_outliers
        }

        ///
        /// Move every outlier into cardinality, replaying string extremes.
        /// The backout path calls this after widening the conclusion.
        ///
        pub fn merge_outliers_into_cardinality(&mut self) {
            self.merge_outliers_where(|_| true);
            self.match_count += self.overflow_outliers;
            self.overflow_outliers = 0;
        }

        ///
        /// Selective variant: migrate only the outliers the filter accepts.
        /// The ZIP retraction path uses this to pull long-parsable values
        /// back while leaving genuine garbage where it is.
        ///
        pub fn merge_outliers_where(&mut self, filter: impl Fn(&str) -> bool) {
            let drained: Vec<(DPString, u64)> = self.outliers.drain().collect();
            for (key, count) in drained {
                if !filter(key.as_str()) {
                    self.outliers.insert(key, count);
                    continue;
                }
                self.match_count += count;
                self.update_length_extremes(key.trim());
                if self.collect_statistics {
                    let trimmed = DPString::from(key.trim());
                    let shrink = match &self.min_string {
                        None => true,
                        Some(current) => trimmed < *current,
                    };
                    if shrink {
                        self.min_string = Some(trimmed.clone());
                    }
                    let grow = match &self.max_string {
                        None => true,
                        Some(current) => trimmed > *current,
                    };
                    if grow {
                        self.max_string = Some(trimmed);
                    }
                }
                match self.cardinality.get_mut(&key) {
                    Some(existing) => *existing += count,
                    None => {
                        if self.cardinality.len() < self.max_cardinality {
                            self.cardinality.insert(key, count);
                        }
                    }
                }
            }
            self.outlier_longs = 0;
            self.outlier_doubles = 0;
            self.outlier_alphas = 0;
            self.outlier_alnums = 0;
        }
    }

    /**************************** Helpers ***************************************/

    ///
    /// Parse a 64-bit signed integer after locale substitution. Group
    /// separators are dropped; the locale minus maps to `-`.
    ///
    pub fn parse_long(trimmed: &str, locale: &ProfileLocale) -> Option<i64> {
        let normalized = locale.normalize_numeric(trimmed);
        if normalized.is_empty() || normalized.contains('.') {
            return None;
        }
        normalized.parse::<i64>().ok()
    }

    ///
    /// Canonical form of a boolean sample under the given pattern, or none.
    ///
    pub fn boolean_canonical(trimmed: &str, pattern: &str) -> Option<&'static str> {
        match pattern {
            PATTERN_BOOLEAN_TRUE_FALSE => {
                if trimmed.eq_ignore_ascii_case(BOOLEAN_TRUE) {
                    return Some(BOOLEAN_TRUE);
                }
                if trimmed.eq_ignore_ascii_case(BOOLEAN_FALSE) {
                    return Some(BOOLEAN_FALSE);
                }
                None
            }
            PATTERN_BOOLEAN_YES_NO => {
                if trimmed.eq_ignore_ascii_case(BOOLEAN_YES) {
                    return Some(BOOLEAN_YES);
                }
                if trimmed.eq_ignore_ascii_case(BOOLEAN_NO) {
                    return Some(BOOLEAN_NO);
                }
                None
            }
            PATTERN_BOOLEAN_ZERO_ONE => match trimmed {
                "0" => Some("0"),
                "1" => Some("1"),
                _ => None,
            },
            _ => None,
        }
    }

    ///
    /// Canonical ordering: false < true, no < yes, 0 < 1.
    ///
    fn boolean_rank(canonical: &str) -> u8 {
        match canonical {
            BOOLEAN_FALSE | BOOLEAN_NO | "0" => 0,
            _ => 1,
        }
    }
}
