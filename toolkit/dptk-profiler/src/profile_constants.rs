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

/**************************** Defaults **************************************/

/// Detection window size. Configurable, but never below this floor.
pub const DEFAULT_SAMPLE_WINDOW: usize = 20;
pub const MIN_SAMPLE_WINDOW: usize = 20;
pub const DEFAULT_MAX_CARDINALITY: usize = 500;
pub const DEFAULT_MAX_OUTLIERS: usize = 50;
/// Reflection fires once this many real samples have been seen. Bumped to
/// `sample_window + 1` when the window is configured larger than this.
pub const DEFAULT_REFLECTION_SAMPLES: usize = 30;

/// Minimum sampleCount for the all-null/all-blank confidence to reach 1.
pub const NULL_CONFIDENCE_FLOOR: usize = 10;

/// Key detection thresholds.
pub const KEY_MIN_SAMPLES: usize = 1000;
pub const KEY_MIN_CARDINALITY: usize = 500;
pub const KEY_MAX_STRING_WIDTH: usize = 32;

/// Fraction of logical-type agreement demanded by the window overrides.
pub const LOGICAL_OVERRIDE_RATIO: f64 = 0.9;
/// Fraction of long-parsable samples demanded to retract a ZIP conclusion.
pub const ZIP_RETRACTION_RATIO: f64 = 0.95;

/**************************** Structural patterns ***************************/

pub const PATTERN_BOOLEAN_TRUE_FALSE: &str = "(?i)true|false";
pub const PATTERN_BOOLEAN_YES_NO: &str = "(?i)yes|no";
pub const PATTERN_BOOLEAN_ZERO_ONE: &str = "[0|1]";

pub const PATTERN_LONG: &str = r"\d+";
pub const PATTERN_SIGNED_LONG: &str = r"-?\d+";
pub const PATTERN_DOUBLE: &str = r"\d*\.?\d+";
pub const PATTERN_SIGNED_DOUBLE: &str = r"-?\d*\.?\d+";
pub const PATTERN_DOUBLE_WITH_EXPONENT: &str = r"\d*\.?\d+(?:[eE][-+]?\d+)?";
pub const PATTERN_SIGNED_DOUBLE_WITH_EXPONENT: &str = r"-?\d*\.?\d+(?:[eE][-+]?\d+)?";

pub const PATTERN_ALPHA_VARIABLE: &str = r"\p{Alpha}+";
pub const PATTERN_ALNUM_VARIABLE: &str = r"\p{Alnum}+";
pub const PATTERN_ANY_VARIABLE: &str = ".+";

pub const PATTERN_ZIP: &str = r"\d{5}";
pub const PATTERN_STATE: &str = r"\p{Alpha}{2}";
pub const PATTERN_MONTH_ABBR: &str = r"\p{Alpha}{3}";

/**************************** Parse failure reasons *************************/
// These strings form part of the external contract and are compared
// byte-for-byte by the streaming tracker. Do not edit casually.

pub const REASON_EXPECTING_DIGIT: &str = "Expecting digit";
pub const REASON_EXPECTING_DIGIT_EOI: &str = "Expecting digit, end of input";
pub const REASON_INSUFFICIENT_DAY_DIGITS: &str = "Insufficient digits in input (d)";
pub const REASON_INSUFFICIENT_MONTH_DIGITS: &str = "Insufficient digits in input (M)";
pub const REASON_ZERO_DAY_MONTH: &str = "0 value illegal for day/month";
pub const REASON_LARGE_DAY_MONTH: &str = "Value too large for day/month";
pub const REASON_EXPECTING_CHAR: &str = "Expecting constant char";
pub const REASON_EXPECTING_CHAR_EOI: &str = "Expecting constant char, end of input";
pub const REASON_MONTH_ABBR_INCOMPLETE: &str = "Month Abbreviation not complete";
pub const REASON_MONTH_ABBR_INCORRECT: &str = "Month Abbreviation incorrect";
pub const REASON_BAD_TIMEZONE_PREFIX: &str = "Expecting time zone - bad time zone: ";
pub const REASON_OFFSET_EOI: &str = "Expecting time zone offset, end of input";
pub const REASON_OFFSET_BAD: &str = "Expecting time zone offset, bad time zone offset";
pub const REASON_OFFSET_BAD_HOUR: &str = "Expecting time zone offset, invalid hour offset";
pub const REASON_OFFSET_BAD_MINUTE: &str = "Expecting time zone offset, invalid minute offset";
pub const REASON_EXTRANEOUS_INPUT: &str = "Expecting end of input, extraneous input found";

/**************************** Date/time limits ******************************/

pub const MAX_OFFSET_HOURS: u32 = 18;
pub const MAX_OFFSET_MINUTES: u32 = 59;
pub const MAX_MONTH: u32 = 12;
pub const MAX_DAY: u32 = 31;
pub const MAX_HOUR: u32 = 23;
pub const MAX_MINUTE_SECOND: u32 = 59;

/// Plausibility windows for reclassifying a Long as a date during reflection.
pub const MIN_PLAUSIBLE_YEAR: i64 = 1801;
pub const MAX_PLAUSIBLE_YEAR: i64 = 2029;
pub const MIN_PLAUSIBLE_YYYYMMDD: i64 = 19000101;
pub const MAX_PLAUSIBLE_YYYYMMDD: i64 = 20400100;

/**************************** Seed sets *************************************/

pub const GENDERS: [&str; 5] = ["F", "M", "FEMALE", "MALE", "UNKNOWN"];

pub const BOOLEAN_TRUE: &str = "true";
pub const BOOLEAN_FALSE: &str = "false";
pub const BOOLEAN_YES: &str = "yes";
pub const BOOLEAN_NO: &str = "no";
