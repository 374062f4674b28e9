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

pub mod column_profiler {
    use crate::profile_chars::char_classes::ProfileLocale;
    use crate::profile_constants::*;
    use crate::profile_date_parse::date_format::DateTimeFormat;
    use crate::profile_dates::format_detector::{determine_format_string, DateResolution};
    use crate::profile_logical::logical_types::{
        address_markers, ca_provinces, countries, genders, is_valid_email, is_valid_url,
        looks_like_address, us_states, us_zips, ReferenceSet,
    };
    use crate::profile_patterns::pattern_registry::{
        promote, SemanticType, TypeQualifier, REGISTRY,
    };
    use crate::profile_result::profile_result::ProfileResult;
    use crate::profile_shapes::shape_levels::{compress, could_be_datetime};
    use crate::profile_tracker::stream_tracker::{
        parse_long, StreamTracker, TrackOutcome, TypeConclusion,
    };
    use chrono::NaiveDate;
    use dptk_core::core::{guard_config, is_unique, DPResult, SmallVec};
    use dptk_core::maths::generate_tenth_factor;
    use dptk_core::strings::{format_compact, DPString, SampleStringExtensions};
    use tracing::debug;

    /**************************** Constants**************************************/

    /// Inline capacity for the per-level shape vote scratch buffers.
    const SHAPE_VOTE_SLOTS: usize = 8;

    /**************************** Types *****************************************/

    ///
    /// Distinct shapes of one level with their vote counts, kept inline for
    /// the common case.
    ///
    type ShapeVotes = SmallVec<[(DPString, u64); SHAPE_VOTE_SLOTS]>;

    ///
    /// Streaming profiler for one column of textual values. Single-owner:
    /// all mutation happens through `train` and `get_result`.
    ///
    #[derive(Debug)]
    pub struct ColumnProfiler {
        name: DPString,
        resolution: DateResolution,
        locale: ProfileLocale,
        sample_window: usize,
        reflection_samples: usize,
        collect_statistics: bool,
        trained: bool,

        sample_count: u64,
        null_count: u64,
        blank_count: u64,
        min_raw_length: Option<usize>,
        max_raw_length: Option<usize>,

        window: Vec<DPString>,
        level0: Vec<DPString>,
        level1: Vec<DPString>,
        level2: Vec<DPString>,

        possible_datetime: u64,
        possible_emails: u64,
        possible_zips: u64,
        possible_urls: u64,
        possible_addresses: u64,

        conclusion: Option<TypeConclusion>,
        tracker: StreamTracker,
    }

    impl ColumnProfiler {
        pub fn new(name: &str, resolution: DateResolution) -> ColumnProfiler {
            ColumnProfiler {
                name: DPString::from(name),
                resolution,
                locale: ProfileLocale::default(),
                sample_window: DEFAULT_SAMPLE_WINDOW,
                reflection_samples: DEFAULT_REFLECTION_SAMPLES,
                collect_statistics: true,
                trained: false,
                sample_count: 0,
                null_count: 0,
                blank_count: 0,
                min_raw_length: None,
                max_raw_length: None,
                window: Vec::with_capacity(DEFAULT_SAMPLE_WINDOW + 1),
                level0: Vec::with_capacity(DEFAULT_SAMPLE_WINDOW + 1),
                level1: Vec::with_capacity(DEFAULT_SAMPLE_WINDOW + 1),
                level2: Vec::with_capacity(DEFAULT_SAMPLE_WINDOW + 1),
                possible_datetime: 0,
                possible_emails: 0,
                possible_zips: 0,
                possible_urls: 0,
                possible_addresses: 0,
                conclusion: None,
                tracker: StreamTracker::new(DEFAULT_MAX_CARDINALITY, DEFAULT_MAX_OUTLIERS, true),
            }
        }

        /**************************** Configuration *****************************/

        pub fn set_sample_size(&mut self, samples: usize) -> DPResult<()> {
            guard_config(self.trained, "sample_size")?;
            if samples < MIN_SAMPLE_WINDOW {
                return Err(format_compact!(
                    "Sample window must be at least {}!",
                    MIN_SAMPLE_WINDOW
                ));
            }
            self.sample_window = samples;
            if samples > DEFAULT_REFLECTION_SAMPLES {
                self.reflection_samples = samples + 1;
            }
            Ok(())
        }

        pub fn set_max_cardinality(&mut self, max_cardinality: usize) -> DPResult<()> {
            guard_config(self.trained, "max_cardinality")?;
            self.tracker.max_cardinality = max_cardinality;
            Ok(())
        }

        pub fn set_max_outliers(&mut self, max_outliers: usize) -> DPResult<()> {
            guard_config(self.trained, "max_outliers")?;
            self.tracker.max_outliers = max_outliers;
            Ok(())
        }

        pub fn set_collect_statistics(&mut self, collect_statistics: bool) -> DPResult<()> {
            guard_config(self.trained, "collect_statistics")?;
            self.collect_statistics = collect_statistics;
            self.tracker.collect_statistics = collect_statistics;
            Ok(())
        }

        pub fn set_locale(&mut self, tag: &str) -> DPResult<()> {
            guard_config(self.trained, "locale")?;
            self.locale = ProfileLocale::new(tag)?;
            Ok(())
        }

        pub fn name(&self) -> &str {
            self.name.as_str()
        }

        /**************************** Training **********************************/

        ///
        /// Feed one sample (or a null). Returns whether a type has been
        /// locked in. Sample-level failures never propagate out of here.
        ///
        pub fn train(&mut self, sample: Option<&str>) -> DPResult<bool> {
            self.trained = true;
            self.sample_count += 1;
            let raw = match sample {
                Some(raw) => raw,
                None => {
                    self.null_count += 1;
                    return Ok(self.conclusion.is_some());
                }
            };
            let raw_len = raw.chars().count();
            self.min_raw_length = Some(self.min_raw_length.map_or(raw_len, |m| m.min(raw_len)));
            self.max_raw_length = Some(self.max_raw_length.map_or(raw_len, |m| m.max(raw_len)));
            if raw.is_blank() {
                self.blank_count += 1;
                return Ok(self.conclusion.is_some());
            }

            match self.conclusion.is_some() {
                true => self.track_sample(raw),
                false => {
                    self.window_sample(raw);
                    if self.real_samples() > self.sample_window as u64 {
                        self.determine_type();
                    }
                }
            }
            Ok(self.conclusion.is_some())
        }

        fn real_samples(&self) -> u64 {
            self.sample_count - self.null_count - self.blank_count
        }

        fn window_sample(&mut self, raw: &str) {
            let trimmed = raw.trim();
            let shapes = compress(trimmed, &self.locale);
            self.window.push(DPString::from(raw));
            self.level0.push(shapes.level0);
            self.level1.push(shapes.level1);
            self.level2.push(shapes.level2);

            if could_be_datetime(trimmed) {
                self.possible_datetime += 1;
            }
            if trimmed.contains('@') {
                self.possible_emails += 1;
            }
            if trimmed.chars().count() == 5 && trimmed.is_all_digits() {
                self.possible_zips += 1;
            }
            if trimmed.contains("://") {
                self.possible_urls += 1;
            }
            if address_markers().contains(trimmed.last_token()) {
                self.possible_addresses += 1;
            }
        }

        fn track_sample(&mut self, raw: &str) {
            let mut conclusion = match self.conclusion.take() {
                Some(c) => c,
                None => return,
            };
            let outcome = self.tracker.track(raw, &mut conclusion, &self.locale);
            self.conclusion = Some(conclusion);
            if outcome == TrackOutcome::OutlierSaturated {
                debug!(column = self.name.as_str(), "outlier map saturated");
                self.conditional_backout();
            }
            if self.real_samples() == self.reflection_samples as u64 {
                self.reflect(false);
            }
        }

        /**************************** Type determination ************************/

        ///
        /// Frequency-ordered distinct shapes of one level: stable sort by
        /// (count desc, first appearance asc). A window rarely produces more
        /// than a handful of distinct shapes, so the votes stay on the stack.
        ///
        fn shape_frequencies(shapes: &[DPString]) -> ShapeVotes {
            let mut order: SmallVec<[DPString; SHAPE_VOTE_SLOTS]> = SmallVec::new();
            let mut counts: SmallVec<[u64; SHAPE_VOTE_SLOTS]> = SmallVec::new();
            for shape in shapes {
                match order.iter().position(|s| s == shape) {
                    Some(i) => counts[i] += 1,
                    None => {
                        order.push(shape.clone());
                        counts.push(1);
                    }
                }
            }
            let mut merged: SmallVec<[(DPString, u64, usize); SHAPE_VOTE_SLOTS]> = order
                .into_iter()
                .zip(counts)
                .enumerate()
                .map(|(i, (s, c))| (s, c, i))
                .collect();
            merged.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
            merged.into_iter().map(|(s, c, _)| (s, c)).collect()
        }

        ///
        /// Fuse the leading numeric shapes of a level through the promotion
        /// lattice, so a column mixing `\d+` and `-?\d*\.?\d+` votes once.
        ///
        fn fused_best(frequencies: &[(DPString, u64)]) -> Option<(DPString, u64)> {
            let (first, first_count) = frequencies.first()?;
            let mut pattern = first.clone();
            let mut count = *first_count;
            for (next, next_count) in frequencies.iter().skip(1).take(2) {
                match promote(pattern.as_str(), next.as_str()) {
                    Some(joined) => {
                        pattern = DPString::from(joined);
                        count += next_count;
                    }
                    None => break,
                }
            }
            Some((pattern, count))
        }

        ///
        /// Pick the winning shape across the three levels and lock a type in.
        ///
        fn determine_type(&mut self) {
            if self.window.is_empty() {
                return;
            }
            if self.apply_overrides() {
                self.replay_window();
                return;
            }

            let l0 = Self::shape_frequencies(&self.level0);
            let l1 = Self::shape_frequencies(&self.level1);
            let l2 = Self::shape_frequencies(&self.level2);
            let l0_best = Self::fused_best(&l0);
            let l1_best = Self::fused_best(&l1);
            let l2_best = Self::fused_best(&l2);

            let mut best = l0_best.clone().unwrap_or_else(|| {
                (DPString::from(PATTERN_ANY_VARIABLE), self.window.len() as u64)
            });
            if let Some(l1_best) = &l1_best {
                if !REGISTRY.is_known(best.0.as_str()) || l1_best.1 > best.1 {
                    best = l1_best.clone();
                }
            }
            if let Some(l2_best) = &l2_best {
                let switch = if !REGISTRY.is_known(best.0.as_str()) {
                    true
                } else if l2_best.0 == best.0 && l2_best.1 > best.1 {
                    true
                } else {
                    let same_type = match (REGISTRY.get(best.0.as_str()), REGISTRY.get(l2_best.0.as_str()))
                    {
                        (Some(a), Some(b)) => a.base_type == b.base_type,
                        _ => false,
                    };
                    (same_type && l2_best.1 > best.1)
                        || l2_best.1 >= best.1 + (self.sample_window as u64 / 10).max(1)
                };
                if switch {
                    best = l2_best.clone();
                }
            }

            let entry = match REGISTRY.get(best.0.as_str()) {
                Some(entry) => entry,
                // Nothing recognized anywhere: fall all the way back.
                None => REGISTRY
                    .get(PATTERN_ANY_VARIABLE)
                    .expect("the any-pattern is always registered"),
            };
            self.conclusion = Some(TypeConclusion {
                base_type: entry.base_type,
                qualifier: entry.qualifier,
                pattern: DPString::from(entry.regexp),
                min_length: entry.min_length,
                max_length: entry.max_length,
                format: None,
            });
            debug!(
                column = self.name.as_str(),
                pattern = best.0.as_str(),
                base_type = entry.base_type.as_str(),
                "type locked in"
            );
            self.replay_window();
        }

        ///
        /// The window overrides, in contract order: date/time, emails, URLs,
        /// ZIPs, addresses. Returns whether a conclusion was installed.
        ///
        fn apply_overrides(&mut self) -> bool {
            let total = self.window.len() as u64;
            if total == 0 {
                return false;
            }
            if self.possible_datetime == total {
                if let Some(conclusion) = self.window_datetime_conclusion() {
                    self.conclusion = Some(conclusion);
                    return true;
                }
            }
            if self.possible_emails == total
                && self.window_ratio(|s| is_valid_email(s)) >= LOGICAL_OVERRIDE_RATIO
            {
                self.conclusion = Some(self.logical_conclusion(
                    SemanticType::String,
                    TypeQualifier::Email,
                ));
                return true;
            }
            if self.possible_urls == total
                && self.window_ratio(|s| is_valid_url(s)) >= LOGICAL_OVERRIDE_RATIO
            {
                self.conclusion =
                    Some(self.logical_conclusion(SemanticType::String, TypeQualifier::Url));
                return true;
            }
            if self.possible_zips == total
                && self.window_ratio(|s| us_zips().contains(s)) >= LOGICAL_OVERRIDE_RATIO
            {
                self.conclusion =
                    Some(self.logical_conclusion(SemanticType::Long, TypeQualifier::Zip));
                return true;
            }
            if self.possible_addresses == total
                && self.window_ratio(|s| looks_like_address(s)) >= LOGICAL_OVERRIDE_RATIO
            {
                self.conclusion =
                    Some(self.logical_conclusion(SemanticType::String, TypeQualifier::Address));
                return true;
            }
            false
        }

        fn window_ratio(&self, check: impl Fn(&str) -> bool) -> f64 {
            let hits = self.window.iter().filter(|s| check(s.trim())).count();
            hits as f64 / self.window.len() as f64
        }

        fn logical_conclusion(
            &self,
            base_type: SemanticType,
            qualifier: TypeQualifier,
        ) -> TypeConclusion {
            let entry = REGISTRY
                .get_logical(base_type, qualifier)
                .expect("every logical qualifier is registered");
            TypeConclusion {
                base_type,
                qualifier: Some(qualifier),
                pattern: DPString::from(entry.regexp),
                min_length: entry.min_length,
                max_length: entry.max_length,
                format: None,
            }
        }

        ///
        /// Rerun the format detector over the entire window and adopt the
        /// canonical format: the most frequent derived format that validates
        /// every windowed sample.
        ///
        fn window_datetime_conclusion(&self) -> Option<TypeConclusion> {
            let mut candidates: ShapeVotes = SmallVec::new();
            for sample in &self.window {
                let format = determine_format_string(sample, self.resolution, &self.locale)?;
                match candidates.iter_mut().find(|(f, _)| *f == format) {
                    Some((_, count)) => *count += 1,
                    None => candidates.push((format, 1)),
                }
            }
            candidates.sort_by(|a, b| b.1.cmp(&a.1));
            let chosen = candidates
                .iter()
                .find_map(|(format, _)| {
                    let descriptor = DateTimeFormat::cached(format).ok()?;
                    let all_fit = self
                        .window
                        .iter()
                        .all(|s| descriptor.validate(s, &self.locale).is_ok());
                    match all_fit {
                        true => Some(descriptor),
                        false => None,
                    }
                })
                .or_else(|| {
                    candidates
                        .first()
                        .and_then(|(format, _)| DateTimeFormat::cached(format).ok())
                })?;
            Some(TypeConclusion {
                base_type: chosen.get_type(),
                qualifier: None,
                pattern: chosen.get_regexp(),
                min_length: 1,
                max_length: usize::MAX,
                format: Some(chosen),
            })
        }

        ///
        /// Replay the window through the streaming tracker so extremes and
        /// cardinality reflect the now-known type.
        ///
        fn replay_window(&mut self) {
            let window: Vec<DPString> = self.window.clone();
            for raw in &window {
                self.track_replayed(raw);
            }
        }

        fn track_replayed(&mut self, raw: &str) {
            let mut conclusion = match self.conclusion.take() {
                Some(c) => c,
                None => return,
            };
            let outcome = self.tracker.track(raw, &mut conclusion, &self.locale);
            self.conclusion = Some(conclusion);
            if outcome == TrackOutcome::OutlierSaturated {
                self.conditional_backout();
            }
        }

        /**************************** Reflection ********************************/

        ///
        /// Re-evaluate the conclusion against accumulated evidence. Runs at
        /// the reflection sample count and again during result finalization.
        ///
        fn reflect(&mut self, finalize: bool) {
            let real = self.real_samples();
            if real == 0 {
                return;
            }
            let conclusion = match &self.conclusion {
                Some(c) => c.clone(),
                None => return,
            };
            match conclusion.base_type {
                SemanticType::Long => self.reflect_long(conclusion),
                SemanticType::String => self.reflect_string(&conclusion, finalize),
                _ => (),
            }
            if self.tracker.outliers.len() == self.tracker.max_outliers
                && self.tracker.max_outliers > 0
            {
                self.conditional_backout();
            } else if self.tracker.bad_char_count > real / 100 && self.tracker.bad_char_count > 0 {
                self.conditional_backout();
            }
        }

        fn reflect_long(&mut self, conclusion: TypeConclusion) {
            let real = self.real_samples();
            if conclusion.qualifier == Some(TypeQualifier::Zip) {
                let confidence = self.tracker.match_count as f64 / real as f64;
                if confidence >= LOGICAL_OVERRIDE_RATIO && self.tracker.cardinality.len() >= 5 {
                    return;
                }
                let parsable =
                    self.tracker.match_count + self.tracker.outlier_longs;
                if parsable as f64 / real as f64 > ZIP_RETRACTION_RATIO {
                    // Long after all: drop the qualifier, pull the numeric
                    // outliers back in and replay their extremes.
                    debug!(column = self.name.as_str(), "retracting ZIP to Long");
                    self.absorb_long_outliers();
                    self.conclusion = Some(TypeConclusion::structural(
                        SemanticType::Long,
                        PATTERN_LONG,
                    ));
                } else {
                    debug!(column = self.name.as_str(), "demoting ZIP to String");
                    let min = self.tracker.min_trimmed_length.unwrap_or(1);
                    let max = self.tracker.max_trimmed_length.unwrap_or(min);
                    self.conclusion = Some(TypeConclusion {
                        base_type: SemanticType::String,
                        qualifier: None,
                        pattern: format_compact!(".{{{},{}}}", min, max),
                        min_length: min,
                        max_length: max,
                        format: None,
                    });
                    self.tracker.merge_outliers_into_cardinality();
                }
                return;
            }

            // Sign upgrade.
            if conclusion.qualifier.is_none() && self.tracker.negative_longs > 0 {
                let mut upgraded = conclusion.clone();
                upgraded.qualifier = Some(TypeQualifier::Signed);
                upgraded.pattern = DPString::from(PATTERN_SIGNED_LONG);
                self.conclusion = Some(upgraded);
                return;
            }

            // A Long column that is really a year or a yyyyMMdd date.
            let named_dateish = {
                let lower = self.name.to_lowercase();
                lower.contains("date") || lower.contains("year")
            };
            if (named_dateish || self.tracker.cardinality.len() > 10)
                && conclusion.qualifier.is_none()
            {
                if let (Some(min), Some(max)) = (self.tracker.min_long, self.tracker.max_long) {
                    if min >= MIN_PLAUSIBLE_YEAR && max <= MAX_PLAUSIBLE_YEAR {
                        self.adopt_long_date_format("yyyy");
                        return;
                    }
                    if min >= MIN_PLAUSIBLE_YYYYMMDD
                        && max <= MAX_PLAUSIBLE_YYYYMMDD
                        && long_is_calendar_date(min)
                        && long_is_calendar_date(max)
                    {
                        self.adopt_long_date_format("yyyyMMdd");
                        return;
                    }
                }
            }

            // A 0/1 pair is a boolean in disguise.
            if self.tracker.cardinality.len() == 2
                && self.tracker.min_long == Some(0)
                && self.tracker.max_long == Some(1)
            {
                self.conclusion = Some(TypeConclusion {
                    base_type: SemanticType::Boolean,
                    qualifier: None,
                    pattern: DPString::from(PATTERN_BOOLEAN_ZERO_ONE),
                    min_length: 1,
                    max_length: 1,
                    format: None,
                });
            }
        }

        fn adopt_long_date_format(&mut self, format: &str) {
            let descriptor = match DateTimeFormat::cached(format) {
                Ok(d) => d,
                Err(_) => return,
            };
            debug!(
                column = self.name.as_str(),
                format = format,
                "reclassifying Long as LocalDate"
            );
            self.conclusion = Some(TypeConclusion {
                base_type: SemanticType::LocalDate,
                qualifier: None,
                pattern: descriptor.get_regexp(),
                min_length: format.len(),
                max_length: format.len(),
                format: Some(descriptor),
            });
        }

        ///
        /// Pull long-parsable outliers back into cardinality and fold their
        /// values into the numeric extremes and sum.
        ///
        fn absorb_long_outliers(&mut self) {
            let mut parsable: Vec<(DPString, i64)> = Vec::new();
            for key in self.tracker.outliers.keys() {
                if let Some(value) = parse_long(key.trim(), &self.locale) {
                    parsable.push((key.clone(), value));
                }
            }
            for (_, value) in &parsable {
                if self.collect_statistics {
                    self.tracker.min_long =
                        Some(self.tracker.min_long.map_or(*value, |m| m.min(*value)));
                    self.tracker.max_long =
                        Some(self.tracker.max_long.map_or(*value, |m| m.max(*value)));
                    self.tracker.sum_long += num_bigint::BigInt::from(*value);
                }
            }
            let keys: Vec<DPString> = parsable.into_iter().map(|(k, _)| k).collect();
            self.tracker
                .merge_outliers_where(move |k| keys.iter().any(|key| key.as_str() == k));
        }

        fn reflect_string(&mut self, conclusion: &TypeConclusion, finalize: bool) {
            if conclusion.qualifier.is_none() {
                self.detect_set_qualifiers();
            }
            if finalize {
                self.finalize_string_lengths();
            }
        }

        ///
        /// Test the cardinality keys against the reference sets: month
        /// abbreviations for uniform 3-letter keys, US/CA states for 2-letter
        /// keys, gender and country for variable keys.
        ///
        fn detect_set_qualifiers(&mut self) {
            let keys: Vec<DPString> = {
                let mut distinct: Vec<DPString> = Vec::new();
                for key in self.tracker.cardinality.keys() {
                    let normalized = key.to_lookup_key();
                    if !normalized.is_empty() && !distinct.contains(&normalized) {
                        distinct.push(normalized);
                    }
                }
                distinct
            };
            if keys.is_empty() {
                return;
            }
            let uniform_len: Option<usize> = {
                let first = keys[0].chars().count();
                match keys.iter().all(|k| k.chars().count() == first) {
                    true => Some(first),
                    false => None,
                }
            };

            if uniform_len == Some(3) && keys.len() <= self.locale.short_months().len() + 2 {
                let misses = keys
                    .iter()
                    .filter(|k| self.locale.month_abbr_index(k).is_none())
                    .count();
                if misses <= 1 {
                    self.install_qualifier(SemanticType::String, TypeQualifier::MonthAbbr);
                    return;
                }
            }

            if uniform_len == Some(2)
                && keys.iter().all(|k| k.chars().all(|c| c.is_alphabetic()))
                && keys.len() <= us_states().len() + ca_provinces().len() + 5
            {
                let us_misses = Self::set_misses(&keys, us_states());
                if us_misses < 3 {
                    self.install_qualifier(SemanticType::String, TypeQualifier::UsState);
                    return;
                }
                let ca_misses = Self::set_misses(&keys, ca_provinces());
                if ca_misses < 3 {
                    self.install_qualifier(SemanticType::String, TypeQualifier::CaProvince);
                    return;
                }
                let na_misses = keys
                    .iter()
                    .filter(|k| !us_states().contains(k) && !ca_provinces().contains(k))
                    .count();
                if na_misses < 3 {
                    self.install_qualifier(SemanticType::String, TypeQualifier::NaState);
                    return;
                }
            }

            if Self::set_accepts(&keys, genders()) {
                self.install_qualifier(SemanticType::String, TypeQualifier::Gender);
                return;
            }
            if Self::set_accepts(&keys, countries()) {
                self.install_qualifier(SemanticType::String, TypeQualifier::Country);
            }
        }

        fn set_misses(keys: &[DPString], set: &ReferenceSet) -> usize {
            keys.iter().filter(|k| !set.contains(k)).count()
        }

        ///
        /// Variable-length acceptance: at most 40% of the keys miss the set
        /// and the absolute miss count stays under the square root of the
        /// set's size.
        ///
        fn set_accepts(keys: &[DPString], set: &ReferenceSet) -> bool {
            let misses = Self::set_misses(keys, set);
            let miss_ratio = misses as f64 / keys.len() as f64;
            miss_ratio <= 0.4 && misses <= (set.len() as f64).sqrt() as usize
        }

        fn install_qualifier(&mut self, base_type: SemanticType, qualifier: TypeQualifier) {
            debug!(
                column = self.name.as_str(),
                qualifier = qualifier.as_str(),
                "logical type detected during reflection"
            );
            self.conclusion = Some(self.logical_conclusion(base_type, qualifier));
        }

        ///
        /// Variable string patterns acquire `{min,max}` bounds; the generic
        /// `.+` acquires raw-length bounds.
        ///
        fn finalize_string_lengths(&mut self) {
            let conclusion = match &mut self.conclusion {
                Some(c) => c,
                None => return,
            };
            let pattern = conclusion.pattern.as_str();
            if pattern == PATTERN_ALPHA_VARIABLE || pattern == PATTERN_ALNUM_VARIABLE {
                let min = self.tracker.min_trimmed_length.unwrap_or(1);
                let max = self.tracker.max_trimmed_length.unwrap_or(min);
                let atom = match pattern == PATTERN_ALPHA_VARIABLE {
                    true => "\\p{Alpha}",
                    false => "\\p{Alnum}",
                };
                conclusion.pattern = match min == max {
                    true => format_compact!("{}{{{}}}", atom, min),
                    false => format_compact!("{}{{{},{}}}", atom, min, max),
                };
                conclusion.min_length = min;
                conclusion.max_length = max;
            } else if pattern == PATTERN_ANY_VARIABLE {
                let min = self.min_raw_length.unwrap_or(1);
                let max = self.max_raw_length.unwrap_or(min);
                conclusion.pattern = match min == max {
                    true => format_compact!(".{{{}}}", min),
                    false => format_compact!(".{{{},{}}}", min, max),
                };
            }
        }

        /**************************** Backout ***********************************/

        ///
        /// Saturated outliers (or a high bad-character rate) mean the locked
        /// conclusion was too narrow. Promote to the nearest wider shape and
        /// merge the outliers back in.
        ///
        fn conditional_backout(&mut self) {
            let conclusion = match &self.conclusion {
                Some(c) => c.clone(),
                None => return,
            };
            let outlier_total = self.tracker.outlier_total();
            if outlier_total == 0 {
                return;
            }
            let all_numeric = self.tracker.outlier_longs + self.tracker.outlier_doubles
                == outlier_total;
            let mostly_alnum = self.tracker.outlier_alnums + self.tracker.outlier_alphas
                > outlier_total / 2;

            let widened = if conclusion.pattern.as_str() == PATTERN_ALPHA_VARIABLE && mostly_alnum
            {
                TypeConclusion::structural(SemanticType::String, PATTERN_ALNUM_VARIABLE)
            } else if conclusion.base_type == SemanticType::Long && all_numeric {
                TypeConclusion::structural(SemanticType::Double, PATTERN_SIGNED_DOUBLE)
            } else if conclusion.base_type == SemanticType::Long && mostly_alnum {
                TypeConclusion::structural(SemanticType::String, PATTERN_ALNUM_VARIABLE)
            } else {
                TypeConclusion::structural(SemanticType::String, PATTERN_ANY_VARIABLE)
            };
            debug!(
                column = self.name.as_str(),
                from = conclusion.pattern.as_str(),
                to = widened.pattern.as_str(),
                "backing out locked conclusion"
            );
            self.conclusion = Some(widened);
            self.tracker.merge_outliers_into_cardinality();
        }

        /**************************** Result ************************************/

        ///
        /// Snapshot the profile. Never consumes training state; reflection
        /// performed here persists, by design.
        ///
        pub fn get_result(&mut self) -> DPResult<ProfileResult> {
            if self.conclusion.is_none() && !self.window.is_empty() {
                self.determine_type();
            }
            self.reflect(true);

            let real = self.real_samples();
            let (semantic_type, qualifier, pattern, format_string) = match &self.conclusion {
                Some(c) => (
                    DPString::from(c.base_type.as_str()),
                    c.qualifier.map(|q| DPString::from(q.as_str())),
                    c.pattern.clone(),
                    c.format.as_ref().map(|f| f.get_format_string()),
                ),
                None => (
                    DPString::from(SemanticType::String.as_str()),
                    None,
                    DPString::from(PATTERN_ANY_VARIABLE),
                    None,
                ),
            };

            // All nulls / all blanks get their own qualifier and the fixed
            // confidence rule.
            let (qualifier, confidence) = match real {
                0 if self.sample_count > 0 => {
                    let qualifier = match (self.null_count > 0, self.blank_count > 0) {
                        (true, false) => TypeQualifier::Null,
                        (false, true) => TypeQualifier::Blank,
                        _ => TypeQualifier::BlankOrNull,
                    };
                    let confidence = match self.sample_count >= NULL_CONFIDENCE_FLOOR as u64 {
                        true => 1.0,
                        false => 0.0,
                    };
                    (Some(DPString::from(qualifier.as_str())), confidence)
                }
                0 => (qualifier, 0.0),
                _ => (
                    qualifier,
                    self.tracker.match_count as f64 / real as f64,
                ),
            };

            let (min_value, max_value) = self.render_extremes();
            let sum = self.render_sum();

            Ok(ProfileResult {
                name: self.name.clone(),
                semantic_type,
                type_qualifier: qualifier,
                pattern_regexp: pattern,
                format_string,
                sample_count: self.sample_count,
                match_count: self.tracker.match_count,
                null_count: self.null_count,
                blank_count: self.blank_count,
                total_leading_zeros: self.tracker.total_leading_zeros,
                confidence,
                min_value,
                max_value,
                min_raw_length: self.min_raw_length.unwrap_or(0),
                max_raw_length: self.max_raw_length.unwrap_or(0),
                sum,
                cardinality: self.tracker.cardinality.clone(),
                outliers: self.tracker.outliers.clone(),
                is_key: self.detect_key(),
            })
        }

        fn render_extremes(&self) -> (Option<DPString>, Option<DPString>) {
            if !self.collect_statistics {
                return (None, None);
            }
            let conclusion = match &self.conclusion {
                Some(c) => c,
                None => return (None, None),
            };
            match conclusion.base_type {
                SemanticType::Long => (
                    self.tracker.min_long.map(|v| format_compact!("{}", v)),
                    self.tracker.max_long.map(|v| format_compact!("{}", v)),
                ),
                SemanticType::Double => (
                    self.tracker.min_double.map(|v| format_compact!("{}", v)),
                    self.tracker.max_double.map(|v| format_compact!("{}", v)),
                ),
                SemanticType::Boolean => (
                    self.tracker.min_boolean.clone(),
                    self.tracker.max_boolean.clone(),
                ),
                SemanticType::String => (
                    self.tracker.min_string.clone(),
                    self.tracker.max_string.clone(),
                ),
                _ => (
                    self.tracker.min_date.as_ref().map(|(_, raw)| raw.clone()),
                    self.tracker.max_date.as_ref().map(|(_, raw)| raw.clone()),
                ),
            }
        }

        fn render_sum(&self) -> Option<DPString> {
            if !self.collect_statistics {
                return None;
            }
            let conclusion = self.conclusion.as_ref()?;
            match conclusion.base_type {
                SemanticType::Long => Some(DPString::from(self.tracker.sum_long.to_string())),
                SemanticType::Double => Some(DPString::from(self.tracker.sum_double.to_string())),
                _ => None,
            }
        }

        ///
        /// Candidate-key detection per the finalization contract.
        ///
        fn detect_key(&self) -> bool {
            if self.sample_count <= KEY_MIN_SAMPLES as u64 {
                return false;
            }
            if self.tracker.max_cardinality < KEY_MIN_CARDINALITY
                || self.tracker.cardinality.len() != self.tracker.max_cardinality
            {
                return false;
            }
            if self.null_count > 0 || self.blank_count > 0 {
                return false;
            }
            let conclusion = match &self.conclusion {
                Some(c) => c,
                None => return false,
            };
            if conclusion.qualifier.is_some() {
                return false;
            }
            let shape_fits = match conclusion.base_type {
                SemanticType::Long => true,
                SemanticType::String => {
                    let fixed = self.tracker.min_trimmed_length == self.tracker.max_trimmed_length;
                    fixed
                        && self
                            .tracker
                            .max_trimmed_length
                            .is_some_and(|len| len < KEY_MAX_STRING_WIDTH)
                }
                _ => false,
            };
            if !shape_fits {
                return false;
            }
            if !is_unique(&self.window) {
                return false;
            }
            self.tracker.cardinality.values().all(|count| *count == 1)
        }
    }

    /**************************** Helpers ***************************************/

    ///
    /// Whether a yyyyMMdd-shaped long denotes a real calendar date. The
    /// platform date library is the cross-check here, not the parser.
    ///
    fn long_is_calendar_date(value: i64) -> bool {
        let year = (value / generate_tenth_factor(4) as i64) as i32;
        let month = ((value / generate_tenth_factor(2) as i64) % 100) as u32;
        let day = (value % 100) as u32;
        NaiveDate::from_ymd_opt(year, month, day).is_some()
    }
}
