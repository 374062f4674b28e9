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
use crate::strings::DPString;
use compact_str::format_compact;
pub use smallvec::{smallvec, SmallVec};

///
/// Type used for propagating error messages.
///
pub type DPResult<T> = Result<T, DPString>;

pub type DPVec<T> = Vec<T>;

///
/// Check that no item appears twice in the given vector.
/// Used by the profiler's key detection step, which demands that every
/// cardinality entry occur exactly once.
///
pub fn is_unique<T: std::cmp::Eq + std::hash::Hash>(data: &Vec<T>) -> bool {
    let mut keys = ahash::AHashSet::with_capacity(data.len());
    for itm in data {
        if !keys.insert(itm) {
            return false;
        }
    }
    true
}

///
/// Guard a profiler configuration knob against mutation after training began.
///
/// # Example
/// ```
/// use ::dptk_core::core::guard_config;
/// let result = guard_config(false, "sample_size");
/// assert!(result.is_ok(), "Untrained profiler must accept configuration!");
/// let result = guard_config(true, "sample_size");
/// assert!(result.is_err(), "Trained profiler must reject configuration!");
/// ```
#[inline(always)]
pub fn guard_config(trained: bool, option: &str) -> DPResult<()> {
    if trained {
        return Err(format_compact!(
            "Cannot change {} once training has started!",
            option
        ));
    }
    Ok(())
}
