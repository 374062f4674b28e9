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

pub mod profile_result {
    use dptk_core::cache::DPCache;
    use dptk_core::strings::DPString;
    use serde::Serialize;

    ///
    /// The read-only outcome of profiling one column. Produced by
    /// `ColumnProfiler::get_result`; everything here is a snapshot and stays
    /// valid however much more training happens afterwards.
    ///
    #[derive(Debug, Clone, Serialize)]
    pub struct ProfileResult {
        pub name: DPString,
        pub semantic_type: DPString,
        pub type_qualifier: Option<DPString>,
        pub pattern_regexp: DPString,
        pub format_string: Option<DPString>,
        pub sample_count: u64,
        pub match_count: u64,
        pub null_count: u64,
        pub blank_count: u64,
        pub total_leading_zeros: u64,
        /// `matchCount / realSamples` after all reflection, in [0, 1].
        pub confidence: f64,
        /// Extremes rendered via the inferred format for dates, numeric text
        /// otherwise.
        pub min_value: Option<DPString>,
        pub max_value: Option<DPString>,
        pub min_raw_length: usize,
        pub max_raw_length: usize,
        /// Arbitrary-precision sum for numeric columns, as text.
        pub sum: Option<DPString>,
        /// Raw sample -> occurrence count, capped at maxCardinality.
        pub cardinality: DPCache<DPString, u64>,
        /// Raw sample -> occurrence count for non-conforming values.
        pub outliers: DPCache<DPString, u64>,
        pub is_key: bool,
    }

    impl ProfileResult {
        pub fn cardinality_total(&self) -> u64 {
            self.cardinality.values().sum()
        }

        pub fn outlier_total(&self) -> u64 {
            self.outliers.values().sum()
        }
    }
}
