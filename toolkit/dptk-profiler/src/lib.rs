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

extern crate dptk_core;
pub mod profile_analyzer;
pub mod profile_chars;
pub mod profile_constants;
pub mod profile_date_parse;
pub mod profile_dates;
pub mod profile_logical;
pub mod profile_patterns;
pub mod profile_result;
pub mod profile_shapes;
pub mod profile_tracker;

///
/// Profile a sequence of optional samples in one go and hand back the
/// [crate::profile_result::profile_result::ProfileResult].
///
/// Pass the column name and anything iterable over `Option<&str>`. An
/// optional third argument selects the day/month resolution mode.
///
/// # Example
/// ```
/// use dptk_profiler::dptk_profile;
///
/// let samples = vec![Some("true"), None, Some("false")];
/// let result = dptk_profile!("active", &samples).unwrap();
/// assert_eq!(result.sample_count, 3, "Wrong number of samples profiled!");
/// ```
///
#[macro_export]
macro_rules! dptk_profile {
    ( $name:expr, $samples:expr ) => {{
        use $crate::profile_analyzer::column_profiler::ColumnProfiler;
        use $crate::profile_dates::format_detector::DateResolution;
        let mut profiler = ColumnProfiler::new($name, DateResolution::None);
        let mut outcome = Ok(false);
        for sample in $samples {
            outcome = profiler.train(sample.as_deref());
            if outcome.is_err() {
                break;
            }
        }
        match outcome {
            Ok(_) => profiler.get_result(),
            Err(e) => Err(e),
        }
    }};
    ( $name:expr, $samples:expr, $resolution:expr ) => {{
        use $crate::profile_analyzer::column_profiler::ColumnProfiler;
        let mut profiler = ColumnProfiler::new($name, $resolution);
        let mut outcome = Ok(false);
        for sample in $samples {
            outcome = profiler.train(sample.as_deref());
            if outcome.is_err() {
                break;
            }
        }
        match outcome {
            Ok(_) => profiler.get_result(),
            Err(e) => Err(e),
        }
    }};
}

/*****************************************Tests****************************************/
#[cfg(test)]
mod tests {
    use crate::profile_analyzer::column_profiler::ColumnProfiler;
    use crate::profile_chars::char_classes::{CharClass, ProfileLocale};
    use crate::profile_constants::*;
    use crate::profile_date_parse::date_format::DateTimeFormat;
    use crate::profile_dates::format_detector::{
        determine_format_string, force_resolve, DateResolution,
    };
    use crate::profile_logical::logical_types::{
        is_valid_email, is_valid_url, looks_like_address, us_zips,
    };
    use crate::profile_patterns::pattern_registry::{promote, SemanticType, REGISTRY};
    use crate::profile_shapes::shape_levels::{compress, could_be_datetime};
    use dptk_core::strings::{format_compact, DPString};

    /**********************************Constants**************************************/
    const BOOLEAN_SAMPLES: [&str; 11] = [
        "false",
        "true",
        "TRUE",
        "    false   ",
        "FALSE ",
        "TRUE",
        "true",
        "false",
        "False",
        "True",
        "false",
    ];
    const ZONED_SAMPLES: [&str; 5] = [
        "01/26/2012 10:42:23 GMT",
        "01/30/2012 10:59:48 GMT",
        "01/25/2012 16:46:43 GMT",
        "01/25/2012 16:28:42 GMT",
        "01/24/2012 16:53:04 GMT",
    ];
    const DAY_FIRST_SAMPLES: [&str; 9] = [
        "22-01-2010",
        "13-02-2011",
        "14-03-2012",
        "15-04-2013",
        "16-05-2014",
        "17-06-2015",
        "18-07-2016",
        "19-08-2017",
        "12-01-2008",
    ];
    const STATE_SAMPLES: [&str; 21] = [
        "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
        "IA", "KS", "KY", "LA", "ME", "MD",
    ];
    const MONTH_SAMPLES: [&str; 21] = [
        "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC", "JAN",
        "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP",
    ];

    fn default_locale() -> ProfileLocale {
        ProfileLocale::default()
    }

    fn train_all(profiler: &mut ColumnProfiler, samples: &[&str]) {
        for sample in samples {
            profiler
                .train(Some(sample))
                .expect("training must not fail");
        }
    }

    /*********************************Test Cases**************************************/

    ///////////////////////////////////Classifier/////////////////////////////////////
    #[test]
    fn test_char_classification() {
        let locale = default_locale();
        assert_eq!(locale.classify('7'), CharClass::Digit, "Wrong class for digit!");
        assert_eq!(locale.classify('x'), CharClass::Alpha, "Wrong class for letter!");
        assert_eq!(
            locale.classify('.'),
            CharClass::DecimalSep,
            "Wrong class for decimal separator!"
        );
        assert_eq!(
            locale.classify(','),
            CharClass::GroupSep,
            "Wrong class for group separator!"
        );
        assert_eq!(locale.classify('-'), CharClass::Minus, "Wrong class for minus!");
        assert_eq!(locale.classify(':'), CharClass::Other, "Wrong class for colon!");
    }

    #[test]
    fn test_locale_substitution() {
        let locale = ProfileLocale::new("de_DE").unwrap();
        let normalized = locale.normalize_numeric("1.234,56");
        assert_eq!(
            normalized, "1234.56",
            "German grouping/decimal substitution failed!"
        );
        assert!(
            ProfileLocale::new("xx_XX").is_err(),
            "Unsupported locale must be rejected!"
        );
    }

    ///////////////////////////////////Shapes/////////////////////////////////////////
    #[test]
    fn test_shape_levels_date_like() {
        let shapes = compress("2004-01-01", &default_locale());
        println!("Shapes: {:?}", shapes);
        assert_eq!(
            shapes.level0.as_str(),
            "\\d{4}-\\d{2}-\\d{2}",
            "Wrong exact run-length shape!"
        );
    }

    #[test]
    fn test_shape_levels_numeric() {
        let locale = default_locale();
        let plain = compress("007", &locale);
        assert_eq!(plain.level0.as_str(), "\\d{3}", "Wrong L0 for digits!");
        assert_eq!(plain.level1.as_str(), PATTERN_LONG, "Wrong L1 for digits!");
        assert_eq!(
            plain.level2.as_str(),
            PATTERN_SIGNED_LONG,
            "Wrong L2 for digits!"
        );
        let negative = compress("-12.5", &locale);
        assert_eq!(
            negative.level1.as_str(),
            PATTERN_SIGNED_DOUBLE,
            "Wrong L1 for signed double!"
        );
        let exponent = compress("1.5e10", &locale);
        assert_eq!(
            exponent.level1.as_str(),
            PATTERN_DOUBLE_WITH_EXPONENT,
            "Wrong L1 for exponent form!"
        );
    }

    #[test]
    fn test_shape_levels_text() {
        let locale = default_locale();
        let boolean = compress("TRUE", &locale);
        assert_eq!(
            boolean.level0.as_str(),
            PATTERN_BOOLEAN_TRUE_FALSE,
            "Booleans compress to their own shape!"
        );
        let alnum = compress("AB123", &locale);
        assert_eq!(
            alnum.level1.as_str(),
            "\\p{Alnum}{5}",
            "Wrong L1 for alphanumeric run!"
        );
        assert_eq!(
            alnum.level2.as_str(),
            PATTERN_ALNUM_VARIABLE,
            "Wrong L2 for alphanumeric run!"
        );
        let free = compress("hello world", &locale);
        assert_eq!(free.level2.as_str(), PATTERN_ANY_VARIABLE, "Wrong L2 for text!");
    }

    #[test]
    fn test_could_be_datetime() {
        assert!(could_be_datetime("9:57"), "Time-like sample rejected!");
        assert!(could_be_datetime("22-01-2010"), "Date-like sample rejected!");
        assert!(!could_be_datetime("banana"), "Plain word accepted!");
        assert!(!could_be_datetime("a@b.com"), "Email accepted as datetime!");
    }

    ///////////////////////////////////Promotion//////////////////////////////////////
    #[test]
    fn test_promotion_joins() {
        assert_eq!(
            promote(PATTERN_LONG, PATTERN_SIGNED_LONG),
            Some(PATTERN_SIGNED_LONG),
            "Long + Signed Long must join to Signed Long!"
        );
        assert_eq!(
            promote(PATTERN_LONG, PATTERN_DOUBLE),
            Some(PATTERN_DOUBLE),
            "Long + Double must join to Double!"
        );
        assert_eq!(
            promote(PATTERN_SIGNED_LONG, PATTERN_DOUBLE),
            Some(PATTERN_SIGNED_DOUBLE),
            "Signed Long + Double must join to Signed Double!"
        );
        assert_eq!(
            promote(PATTERN_SIGNED_LONG, PATTERN_DOUBLE_WITH_EXPONENT),
            Some(PATTERN_SIGNED_DOUBLE_WITH_EXPONENT),
            "Sign must survive an exponent join!"
        );
        assert_eq!(
            promote(PATTERN_LONG, "\\p{Alpha}+"),
            None,
            "Non-numeric patterns have no join!"
        );
    }

    #[test]
    fn test_promotion_laws() {
        let lattice = [
            PATTERN_LONG,
            PATTERN_SIGNED_LONG,
            PATTERN_DOUBLE,
            PATTERN_SIGNED_DOUBLE,
            PATTERN_DOUBLE_WITH_EXPONENT,
            PATTERN_SIGNED_DOUBLE_WITH_EXPONENT,
        ];
        for left in &lattice {
            assert_eq!(
                promote(left, left),
                Some(*left),
                "Promotion must be idempotent!"
            );
            for right in &lattice {
                assert_eq!(
                    promote(left, right),
                    promote(right, left),
                    "Promotion must be commutative!"
                );
            }
        }
    }

    #[test]
    fn test_registry_lookup() {
        let entry = REGISTRY.get(PATTERN_LONG).expect("Long must be registered");
        assert_eq!(entry.base_type, SemanticType::Long, "Wrong type for \\d+!");
        assert!(
            REGISTRY.insertion_rank(PATTERN_BOOLEAN_TRUE_FALSE)
                < REGISTRY.insertion_rank(PATTERN_ANY_VARIABLE),
            "Booleans must rank before the catch-all pattern!"
        );
    }

    ///////////////////////////////////Date detector//////////////////////////////////
    #[test]
    fn test_determine_time_only() {
        let locale = default_locale();
        let format = determine_format_string("9:57", DateResolution::None, &locale);
        assert_eq!(
            format.as_deref(),
            Some("H:mm"),
            "Wrong format for single digit hours!"
        );
        let format = determine_format_string("10:42:23", DateResolution::None, &locale);
        assert_eq!(format.as_deref(), Some("HH:mm:ss"), "Wrong full time format!");
        assert_eq!(
            determine_format_string("10:62", DateResolution::None, &locale),
            None,
            "Oversize minutes must fail!"
        );
    }

    #[test]
    fn test_determine_ambiguous_date() {
        let locale = default_locale();
        let format = determine_format_string("2/12/98", DateResolution::None, &locale)
            .expect("ambiguous date must resolve to placeholders");
        assert_eq!(format.as_str(), "?/??/yy", "Wrong placeholder format!");
        assert_eq!(
            force_resolve(&format, true).as_str(),
            "d/MM/yy",
            "Day-first resolution failed!"
        );
        assert_eq!(
            force_resolve(&format, false).as_str(),
            "M/dd/yy",
            "Month-first resolution failed!"
        );
    }

    #[test]
    fn test_determine_day_anchored() {
        let locale = default_locale();
        let format = determine_format_string("22-01-2010", DateResolution::None, &locale);
        assert_eq!(format.as_deref(), Some("dd-MM-yyyy"), "Day > 12 must anchor!");
        let format = determine_format_string("01/26/2012", DateResolution::None, &locale);
        assert_eq!(
            format.as_deref(),
            Some("MM/dd/yyyy"),
            "Second field > 12 must be the day!"
        );
    }

    #[test]
    fn test_determine_year_first() {
        let locale = default_locale();
        let format = determine_format_string("2004-01-01", DateResolution::None, &locale);
        assert_eq!(
            format.as_deref(),
            Some("yyyy-MM-dd"),
            "Four digit first field must anchor the year!"
        );
        assert_eq!(
            determine_format_string("2004-13-01", DateResolution::None, &locale),
            None,
            "Impossible month must fail!"
        );
    }

    #[test]
    fn test_determine_offset_datetime() {
        let locale = default_locale();
        let format =
            determine_format_string("2004-01-01T00:00:00+05:00", DateResolution::None, &locale);
        assert_eq!(
            format.as_deref(),
            Some("yyyy-MM-dd'T'HH:mm:ssxxx"),
            "Wrong ISO offset format!"
        );
    }

    #[test]
    fn test_determine_zoned_datetime() {
        let locale = default_locale();
        let format =
            determine_format_string("01/26/2012 10:42:23 GMT", DateResolution::None, &locale);
        assert_eq!(
            format.as_deref(),
            Some("MM/dd/yyyy HH:mm:ss z"),
            "Wrong named zone format!"
        );
        assert_eq!(
            determine_format_string("01/26/2012 10:42:23 XYZ", DateResolution::None, &locale),
            None,
            "Unknown zone name must fail!"
        );
    }

    #[test]
    fn test_determine_month_abbreviation() {
        let locale = default_locale();
        let format = determine_format_string("22 Jan 2020", DateResolution::None, &locale);
        assert_eq!(format.as_deref(), Some("dd MMM yyyy"), "Wrong MMM format!");
        let format = determine_format_string("12-OCT-2010", DateResolution::None, &locale);
        assert_eq!(
            format.as_deref(),
            Some("dd-MMM-yyyy"),
            "A month abbreviation containing T must not split the sample!"
        );
    }

    #[test]
    fn test_determine_resolution_modes() {
        let locale = default_locale();
        let format = determine_format_string("2/12/98", DateResolution::DayFirst, &locale);
        assert_eq!(format.as_deref(), Some("d/MM/yy"), "DayFirst must resolve!");
        let format = determine_format_string("2/12/98", DateResolution::MonthFirst, &locale);
        assert_eq!(format.as_deref(), Some("M/dd/yy"), "MonthFirst must resolve!");
        // en_US resolves month first.
        let format = determine_format_string("2/12/98", DateResolution::Auto, &locale);
        assert_eq!(format.as_deref(), Some("M/dd/yy"), "Auto must follow locale!");
    }

    #[test]
    fn test_detector_total_on_garbage() {
        let locale = default_locale();
        let garbage = [
            "",
            "   ",
            "banana",
            "1/2/3/4",
            "12:34:56:78",
            "2/12\u{7}/98",
            "añ/12/98",
            "25:00",
            "2004-01",
        ];
        for sample in &garbage {
            assert_eq!(
                determine_format_string(sample, DateResolution::None, &locale),
                None,
                "{}",
                format_compact!("Garbage sample {:?} must yield no format!", sample)
            );
        }
    }

    ///////////////////////////////////Format validation//////////////////////////////
    #[test]
    fn test_validate_offset_scenarios() {
        let locale = default_locale();
        let descriptor = DateTimeFormat::cached("yyyy-MM-dd'T'HH:mm:ssxxx").unwrap();
        assert_eq!(
            descriptor.get_type(),
            SemanticType::OffsetDateTime,
            "Offset formats imply OffsetDateTime!"
        );
        assert!(
            descriptor.validate("2012-03-04T19:22:10+08:00", &locale).is_ok(),
            "Valid offset timestamp rejected!"
        );
        let failure = descriptor
            .validate("2012-03-04T19:22:10+08:0", &locale)
            .unwrap_err();
        println!("Failure: {:?}", failure);
        assert_eq!(
            failure.reason.as_str(),
            REASON_OFFSET_EOI,
            "Truncated offset must report end of input!"
        );
        let failure = descriptor
            .validate("2012-03-04T19:22:10+19:00", &locale)
            .unwrap_err();
        assert_eq!(
            failure.reason.as_str(),
            REASON_OFFSET_BAD_HOUR,
            "Oversize hour offset must be flagged!"
        );
        let failure = descriptor
            .validate("2012-03-04T19:22:10+08:60", &locale)
            .unwrap_err();
        assert_eq!(
            failure.reason.as_str(),
            REASON_OFFSET_BAD_MINUTE,
            "Oversize minute offset must be flagged!"
        );
    }

    #[test]
    fn test_validate_failure_reasons() {
        let locale = default_locale();
        let descriptor = DateTimeFormat::cached("yyyy-MM-dd").unwrap();
        let checks = [
            ("2010-0a-01", REASON_INSUFFICIENT_MONTH_DIGITS),
            ("2010-00-01", REASON_ZERO_DAY_MONTH),
            ("2010-13-01", REASON_LARGE_DAY_MONTH),
            ("2010/01/01", REASON_EXPECTING_CHAR),
            ("2010-01", REASON_EXPECTING_CHAR_EOI),
            ("2010-01-32", REASON_LARGE_DAY_MONTH),
            ("2010-01-012", REASON_EXTRANEOUS_INPUT),
            ("x010-01-01", REASON_EXPECTING_DIGIT),
        ];
        for (input, reason) in &checks {
            let failure = descriptor.validate(input, &locale).unwrap_err();
            println!("Input: {:?} Reason: {:?}", input, failure);
            assert_eq!(
                failure.reason.as_str(),
                *reason,
                "{}",
                format_compact!("Wrong failure reason for {:?}!", input)
            );
        }
        let short_day = DateTimeFormat::cached("dd/MM/yyyy").unwrap();
        let failure = short_day.validate("3/04/2011", &locale).unwrap_err();
        assert_eq!(
            failure.reason.as_str(),
            REASON_INSUFFICIENT_DAY_DIGITS,
            "Single digit day against dd must report insufficient digits!"
        );
    }

    #[test]
    fn test_validate_month_abbreviation() {
        let locale = default_locale();
        let descriptor = DateTimeFormat::cached("dd MMM yyyy").unwrap();
        assert!(
            descriptor.validate("22 Jan 2020", &locale).is_ok(),
            "Valid month abbreviation rejected!"
        );
        let failure = descriptor.validate("22 Jax 2020", &locale).unwrap_err();
        assert_eq!(
            failure.reason.as_str(),
            REASON_MONTH_ABBR_INCORRECT,
            "Unknown month abbreviation must be flagged!"
        );
        let failure = descriptor.validate("22 J1 2020", &locale).unwrap_err();
        assert_eq!(
            failure.reason.as_str(),
            REASON_MONTH_ABBR_INCOMPLETE,
            "Short month abbreviation must be flagged!"
        );
    }

    #[test]
    fn test_validate_zone_name() {
        let locale = default_locale();
        let descriptor = DateTimeFormat::cached("MM/dd/yyyy HH:mm:ss z").unwrap();
        assert_eq!(
            descriptor.get_type(),
            SemanticType::ZonedDateTime,
            "Named zones imply ZonedDateTime!"
        );
        assert!(
            descriptor.validate("01/26/2012 10:42:23 GMT", &locale).is_ok(),
            "Valid zone rejected!"
        );
        let failure = descriptor
            .validate("01/26/2012 10:42:23 XYZ", &locale)
            .unwrap_err();
        assert_eq!(
            failure.reason.as_str(),
            "Expecting time zone - bad time zone: XYZ",
            "Zone failures must carry the offending name!"
        );
    }

    #[test]
    fn test_format_queries_and_cache() {
        let descriptor = DateTimeFormat::cached("yyyy-MM-dd'T'HH:mm:ssxxx").unwrap();
        assert_eq!(
            descriptor.get_format_string().as_str(),
            "yyyy-MM-dd'T'HH:mm:ssxxx",
            "Canonical format must round trip!"
        );
        assert_eq!(
            descriptor.get_regexp().as_str(),
            "\\d{4}-\\d{2}-\\d{2}T\\d{2}:\\d{2}:\\d{2}[+-]\\d{2}:\\d{2}",
            "Wrong synthesized expression!"
        );
        assert_eq!(descriptor.hour_length(), 2, "Wrong hour length!");
        let again = DateTimeFormat::cached("yyyy-MM-dd'T'HH:mm:ssxxx").unwrap();
        assert_eq!(
            *descriptor, *again,
            "Cache insertion must be idempotent!"
        );
        let ambiguous = DateTimeFormat::cached("?/??/yy").unwrap();
        assert!(
            ambiguous.has_ambiguous_fields(),
            "Placeholder fields must be reported!"
        );
    }

    ///////////////////////////////////Logical checks/////////////////////////////////
    #[test]
    fn test_logical_syntax_checks() {
        assert!(is_valid_email("ada@example.com"), "Plain email rejected!");
        assert!(
            is_valid_email("ada@example.com; bob@example.org"),
            "Email list rejected!"
        );
        assert!(!is_valid_email("not-an-email"), "Garbage email accepted!");
        assert!(is_valid_url("https://example.com/x"), "URL rejected!");
        assert!(!is_valid_url("example.com"), "Scheme-less URL accepted!");
        assert!(looks_like_address("123 Main ST"), "Address rejected!");
        assert!(!looks_like_address("Main Street Blues"), "Non-address accepted!");
        assert!(us_zips().contains("10001"), "Known zip missing from set!");
    }

    ///////////////////////////////////Profiler scenarios/////////////////////////////
    #[test]
    fn test_profile_time_only() {
        let mut profiler = ColumnProfiler::new("when", DateResolution::None);
        profiler.train(Some("9:57")).unwrap();
        let result = profiler.get_result().unwrap();
        println!("{:#?}", result);
        assert_eq!(result.semantic_type, "LocalTime", "Wrong semantic type!");
        assert_eq!(
            result.format_string.as_deref(),
            Some("H:mm"),
            "Wrong inferred format!"
        );
        assert_eq!(result.match_count, 1, "Window replay must count the sample!");
    }

    #[test]
    fn test_profile_ambiguous_date() {
        let mut profiler = ColumnProfiler::new("shipped", DateResolution::None);
        profiler.train(Some("2/12/98")).unwrap();
        let result = profiler.get_result().unwrap();
        assert_eq!(result.semantic_type, "LocalDate", "Wrong semantic type!");
        assert_eq!(
            result.format_string.as_deref(),
            Some("?/??/yy"),
            "Placeholders must survive when unresolved!"
        );
    }

    #[test]
    fn test_profile_offset_datetime() {
        let mut profiler = ColumnProfiler::new("stamp", DateResolution::None);
        profiler.train(Some("2004-01-01T00:00:00+05:00")).unwrap();
        let result = profiler.get_result().unwrap();
        assert_eq!(result.semantic_type, "OffsetDateTime", "Wrong semantic type!");
        assert_eq!(
            result.format_string.as_deref(),
            Some("yyyy-MM-dd'T'HH:mm:ssxxx"),
            "Wrong inferred format!"
        );
    }

    #[test]
    fn test_profile_zoned_datetime() {
        let mut profiler = ColumnProfiler::new("logged", DateResolution::None);
        train_all(&mut profiler, &ZONED_SAMPLES);
        let result = profiler.get_result().unwrap();
        println!("{:#?}", result);
        assert_eq!(result.semantic_type, "ZonedDateTime", "Wrong semantic type!");
        assert_eq!(
            result.format_string.as_deref(),
            Some("MM/dd/yyyy HH:mm:ss z"),
            "Wrong inferred format!"
        );
        assert_eq!(result.match_count, 5, "All zoned samples must match!");
        assert_eq!(result.confidence, 1.0, "Wrong confidence!");
    }

    #[test]
    fn test_profile_day_first_dates() {
        let mut profiler = ColumnProfiler::new("posted", DateResolution::None);
        train_all(&mut profiler, &DAY_FIRST_SAMPLES);
        let result = profiler.get_result().unwrap();
        println!("{:#?}", result);
        assert_eq!(result.semantic_type, "LocalDate", "Wrong semantic type!");
        assert_eq!(
            result.pattern_regexp.as_str(),
            "\\d{2}-\\d{2}-\\d{4}",
            "Wrong synthesized pattern!"
        );
        assert_eq!(result.confidence, 1.0, "Wrong confidence!");
        assert_eq!(result.match_count, 9, "All nine dates must match!");
    }

    #[test]
    fn test_profile_booleans_with_nulls() {
        let mut profiler = ColumnProfiler::new("active", DateResolution::None);
        for (i, sample) in BOOLEAN_SAMPLES.iter().enumerate() {
            if i == 3 || i == 7 {
                profiler.train(None).unwrap();
            }
            profiler.train(Some(sample)).unwrap();
        }
        let result = profiler.get_result().unwrap();
        println!("{:#?}", result);
        assert_eq!(result.semantic_type, "Boolean", "Wrong semantic type!");
        assert_eq!(result.match_count, 11, "Wrong match count!");
        assert_eq!(result.null_count, 2, "Wrong null count!");
        assert_eq!(
            result.pattern_regexp.as_str(),
            "(?i)true|false",
            "Wrong boolean pattern!"
        );
        assert_eq!(result.min_value.as_deref(), Some("false"), "Wrong minimum!");
        assert_eq!(result.max_value.as_deref(), Some("true"), "Wrong maximum!");
    }

    #[test]
    fn test_profile_long_stream_locks_window() {
        let mut profiler = ColumnProfiler::new("id", DateResolution::None);
        for _ in 0..50 {
            let locked = profiler.train(None).unwrap();
            assert!(!locked, "Nulls alone must not lock a type!");
        }
        let mut lock_sample = 0;
        for i in 0..10_000u64 {
            let value = 100_000 + (i * 7919) % 900_000;
            let locked = profiler
                .train(Some(format_compact!("{}", value).as_str()))
                .unwrap();
            if locked && lock_sample == 0 {
                lock_sample = i + 1;
            }
        }
        assert_eq!(
            lock_sample,
            DEFAULT_SAMPLE_WINDOW as u64 + 1,
            "Type must lock right after the window fills!"
        );
        let result = profiler.get_result().unwrap();
        assert_eq!(result.semantic_type, "Long", "Wrong semantic type!");
        assert_eq!(result.confidence, 1.0, "Wrong confidence!");
        assert_eq!(
            result.cardinality.len(),
            DEFAULT_MAX_CARDINALITY,
            "Cardinality must saturate at its cap!"
        );
        assert_eq!(result.null_count, 50, "Wrong null count!");
    }

    #[test]
    fn test_invariant_sample_count_balance() {
        let mut profiler = ColumnProfiler::new("balance", DateResolution::None);
        for i in 0..21 {
            let sample = match i % 2 {
                0 => "true",
                _ => "false",
            };
            profiler.train(Some(sample)).unwrap();
        }
        profiler.train(Some("banana")).unwrap();
        profiler.train(None).unwrap();
        profiler.train(Some("   ")).unwrap();
        let result = profiler.get_result().unwrap();
        assert_eq!(
            result.sample_count,
            result.match_count + result.outlier_total() + result.null_count + result.blank_count,
            "Sample count invariant violated!"
        );
    }

    #[test]
    fn test_profile_zip_codes() {
        let mut profiler = ColumnProfiler::new("postal", DateResolution::None);
        for i in 0..21 {
            profiler
                .train(Some(format_compact!("{}", 10001 + i).as_str()))
                .unwrap();
        }
        let result = profiler.get_result().unwrap();
        println!("{:#?}", result);
        assert_eq!(result.semantic_type, "Long", "Wrong semantic type!");
        assert_eq!(result.type_qualifier.as_deref(), Some("ZIP"), "Wrong qualifier!");
        assert_eq!(result.pattern_regexp.as_str(), "\\d{5}", "Wrong zip pattern!");
    }

    #[test]
    fn test_zip_retraction_to_long() {
        let mut profiler = ColumnProfiler::new("code", DateResolution::None);
        for i in 0..21 {
            profiler
                .train(Some(format_compact!("{}", 10001 + i).as_str()))
                .unwrap();
        }
        // Nine values outside the zip set drag confidence under the bar.
        for i in 0..9 {
            profiler
                .train(Some(format_compact!("{}", 99901 + i).as_str()))
                .unwrap();
        }
        let result = profiler.get_result().unwrap();
        println!("{:#?}", result);
        assert_eq!(result.semantic_type, "Long", "Retraction must keep Long!");
        assert_eq!(result.type_qualifier, None, "Qualifier must be dropped!");
        assert_eq!(result.match_count, 30, "Migrated outliers must count as matches!");
        assert!(result.outliers.is_empty(), "Outliers must migrate to cardinality!");
        assert_eq!(result.confidence, 1.0, "Wrong post-retraction confidence!");
    }

    #[test]
    fn test_signed_long_upgrade() {
        let mut profiler = ColumnProfiler::new("delta", DateResolution::None);
        for i in 0..21 {
            profiler
                .train(Some(format_compact!("{}", 500 + i).as_str()))
                .unwrap();
        }
        for i in 0..9 {
            profiler
                .train(Some(format_compact!("-{}", 100 + i).as_str()))
                .unwrap();
        }
        let result = profiler.get_result().unwrap();
        assert_eq!(result.semantic_type, "Long", "Wrong semantic type!");
        assert_eq!(
            result.type_qualifier.as_deref(),
            Some("SIGNED"),
            "Negative values must upgrade to signed!"
        );
        assert_eq!(
            result.pattern_regexp.as_str(),
            PATTERN_SIGNED_LONG,
            "Wrong signed pattern!"
        );
    }

    #[test]
    fn test_year_reclassification() {
        let mut profiler = ColumnProfiler::new("model_year", DateResolution::None);
        for i in 0..21 {
            profiler
                .train(Some(format_compact!("{}", 1950 + i).as_str()))
                .unwrap();
        }
        let result = profiler.get_result().unwrap();
        println!("{:#?}", result);
        assert_eq!(result.semantic_type, "LocalDate", "Years must become dates!");
        assert_eq!(result.format_string.as_deref(), Some("yyyy"), "Wrong format!");
    }

    #[test]
    fn test_yyyymmdd_reclassification() {
        let mut profiler = ColumnProfiler::new("trade_date", DateResolution::None);
        for i in 0..21 {
            profiler
                .train(Some(format_compact!("{}", 20100101 + i).as_str()))
                .unwrap();
        }
        let result = profiler.get_result().unwrap();
        assert_eq!(result.semantic_type, "LocalDate", "Wrong semantic type!");
        assert_eq!(
            result.format_string.as_deref(),
            Some("yyyyMMdd"),
            "Wrong compact date format!"
        );
    }

    #[test]
    fn test_zero_one_boolean_reclassification() {
        let mut profiler = ColumnProfiler::new("flag", DateResolution::None);
        for i in 0..21 {
            let sample = match i % 2 {
                0 => "0",
                _ => "1",
            };
            profiler.train(Some(sample)).unwrap();
        }
        let result = profiler.get_result().unwrap();
        assert_eq!(result.semantic_type, "Boolean", "0/1 pairs must become booleans!");
        assert_eq!(
            result.pattern_regexp.as_str(),
            PATTERN_BOOLEAN_ZERO_ONE,
            "Wrong 0/1 pattern!"
        );
    }

    #[test]
    fn test_us_state_detection() {
        let mut profiler = ColumnProfiler::new("state", DateResolution::None);
        train_all(&mut profiler, &STATE_SAMPLES);
        let result = profiler.get_result().unwrap();
        println!("{:#?}", result);
        assert_eq!(result.semantic_type, "String", "Wrong semantic type!");
        assert_eq!(
            result.type_qualifier.as_deref(),
            Some("US_STATE"),
            "States must be detected!"
        );
        assert_eq!(
            result.pattern_regexp.as_str(),
            "\\p{Alpha}{2}",
            "Wrong state pattern!"
        );
    }

    #[test]
    fn test_month_abbreviation_detection() {
        let mut profiler = ColumnProfiler::new("month", DateResolution::None);
        train_all(&mut profiler, &MONTH_SAMPLES);
        let result = profiler.get_result().unwrap();
        assert_eq!(
            result.type_qualifier.as_deref(),
            Some("MONTHABBR"),
            "Month abbreviations must be detected!"
        );
    }

    #[test]
    fn test_gender_detection() {
        let mut profiler = ColumnProfiler::new("gender", DateResolution::None);
        for i in 0..21 {
            let sample = match i % 2 {
                0 => "M",
                _ => "F",
            };
            profiler.train(Some(sample)).unwrap();
        }
        let result = profiler.get_result().unwrap();
        assert_eq!(
            result.type_qualifier.as_deref(),
            Some("GENDER"),
            "Gender codes must be detected!"
        );
    }

    #[test]
    fn test_email_override() {
        let mut profiler = ColumnProfiler::new("contact", DateResolution::None);
        for i in 0..21 {
            profiler
                .train(Some(format_compact!("user{}@example.com", i).as_str()))
                .unwrap();
        }
        let result = profiler.get_result().unwrap();
        assert_eq!(result.semantic_type, "String", "Wrong semantic type!");
        assert_eq!(
            result.type_qualifier.as_deref(),
            Some("EMAIL"),
            "Emails must be detected in the window!"
        );
    }

    #[test]
    fn test_url_override() {
        let mut profiler = ColumnProfiler::new("homepage", DateResolution::None);
        for i in 0..21 {
            profiler
                .train(Some(format_compact!("https://example.com/page/{}", i).as_str()))
                .unwrap();
        }
        let result = profiler.get_result().unwrap();
        assert_eq!(
            result.type_qualifier.as_deref(),
            Some("URL"),
            "URLs must be detected in the window!"
        );
    }

    #[test]
    fn test_address_override() {
        let mut profiler = ColumnProfiler::new("street", DateResolution::None);
        for i in 0..21 {
            let marker = match i % 3 {
                0 => "ST",
                1 => "AVE",
                _ => "RD",
            };
            profiler
                .train(Some(format_compact!("{} Main {}", 100 + i, marker).as_str()))
                .unwrap();
        }
        let result = profiler.get_result().unwrap();
        assert_eq!(
            result.type_qualifier.as_deref(),
            Some("ADDRESS"),
            "Addresses must be detected in the window!"
        );
    }

    #[test]
    fn test_date_format_repair() {
        let mut profiler = ColumnProfiler::new("updated", DateResolution::None);
        for i in 0..21 {
            profiler
                .train(Some(format_compact!("{}/01/2010", 13 + (i % 19)).as_str()))
                .unwrap();
        }
        let before = profiler.get_result().unwrap();
        assert_eq!(
            before.format_string.as_deref(),
            Some("dd/MM/yyyy"),
            "Doubled day field expected before repair!"
        );
        profiler.train(Some("3/04/2011")).unwrap();
        let result = profiler.get_result().unwrap();
        println!("{:#?}", result);
        assert_eq!(
            result.format_string.as_deref(),
            Some("d/MM/yyyy"),
            "Repair must shrink the day field!"
        );
        assert_eq!(
            result.outlier_total(),
            0,
            "The repaired sample must not be an outlier!"
        );
    }

    #[test]
    fn test_backout_long_to_double() {
        let mut profiler = ColumnProfiler::new("amount", DateResolution::None);
        for i in 0..21 {
            profiler
                .train(Some(format_compact!("{}", 100 + i).as_str()))
                .unwrap();
        }
        for i in 0..DEFAULT_MAX_OUTLIERS {
            profiler
                .train(Some(format_compact!("{}.5", 200 + i).as_str()))
                .unwrap();
        }
        let result = profiler.get_result().unwrap();
        println!("{:#?}", result);
        assert_eq!(
            result.semantic_type, "Double",
            "Numeric outliers must back a Long out to Double!"
        );
        assert!(result.outliers.is_empty(), "Backout must merge the outliers!");
        assert_eq!(
            result.match_count,
            21 + DEFAULT_MAX_OUTLIERS as u64,
            "Merged outliers must count as matches!"
        );
    }

    #[test]
    fn test_backout_alpha_to_alnum() {
        let names = [
            "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india",
            "juliet", "kilo", "lima", "mike", "november", "oscar", "papa", "quebec", "romeo",
            "sierra", "tango", "uniform",
        ];
        let mut profiler = ColumnProfiler::new("callsign", DateResolution::None);
        train_all(&mut profiler, &names);
        for i in 0..DEFAULT_MAX_OUTLIERS {
            profiler
                .train(Some(format_compact!("unit{:02}", i).as_str()))
                .unwrap();
        }
        let result = profiler.get_result().unwrap();
        println!("{:#?}", result);
        assert_eq!(result.semantic_type, "String", "Wrong semantic type!");
        assert!(
            result.pattern_regexp.starts_with("\\p{Alnum}{"),
            "{}",
            format_compact!(
                "Alpha pattern must widen to bounded alnum, got {}!",
                result.pattern_regexp
            )
        );
    }

    #[test]
    fn test_string_length_finalization() {
        let mut profiler = ColumnProfiler::new("word", DateResolution::None);
        let words = [
            "cat", "house", "garden", "sun", "mountain", "sea", "cloud", "stone", "river", "tree",
            "bird", "fish", "lamp", "chair", "table", "brick", "glass", "paper", "pen", "book",
            "door",
        ];
        train_all(&mut profiler, &words);
        let result = profiler.get_result().unwrap();
        println!("{:#?}", result);
        assert_eq!(result.semantic_type, "String", "Wrong semantic type!");
        assert_eq!(
            result.pattern_regexp.as_str(),
            "\\p{Alpha}{3,8}",
            "Variable alpha must acquire length bounds!"
        );
    }

    #[test]
    fn test_all_null_and_blank_columns() {
        let mut nulls = ColumnProfiler::new("empty", DateResolution::None);
        for _ in 0..12 {
            nulls.train(None).unwrap();
        }
        let result = nulls.get_result().unwrap();
        assert_eq!(result.type_qualifier.as_deref(), Some("NULL"), "Wrong qualifier!");
        assert_eq!(result.confidence, 1.0, "Twelve nulls must be confident!");

        let mut sparse = ColumnProfiler::new("sparse", DateResolution::None);
        for _ in 0..5 {
            sparse.train(None).unwrap();
        }
        let result = sparse.get_result().unwrap();
        assert_eq!(result.confidence, 0.0, "Five nulls are not enough for confidence!");

        let mut mixed = ColumnProfiler::new("mixed", DateResolution::None);
        for i in 0..12 {
            match i % 2 {
                0 => mixed.train(None).unwrap(),
                _ => mixed.train(Some("   ")).unwrap(),
            };
        }
        let result = mixed.get_result().unwrap();
        assert_eq!(
            result.type_qualifier.as_deref(),
            Some("BLANKORNULL"),
            "Wrong qualifier for mixed blanks and nulls!"
        );
    }

    #[test]
    fn test_configuration_guards() {
        let mut profiler = ColumnProfiler::new("cfg", DateResolution::None);
        assert!(
            profiler.set_sample_size(10).is_err(),
            "Window below the floor must be rejected!"
        );
        profiler.set_sample_size(25).unwrap();
        profiler.set_max_cardinality(100).unwrap();
        profiler.set_max_outliers(10).unwrap();
        profiler.set_collect_statistics(false).unwrap();
        assert!(
            profiler.set_locale("xx_XX").is_err(),
            "Unknown locale must be rejected!"
        );
        profiler.train(Some("42")).unwrap();
        assert!(
            profiler.set_sample_size(30).is_err(),
            "Configuration after training must be rejected!"
        );
        assert!(
            profiler.set_max_cardinality(10).is_err(),
            "Configuration after training must be rejected!"
        );
    }

    #[test]
    fn test_key_detection() {
        let mut profiler = ColumnProfiler::new("pk", DateResolution::None);
        for i in 0..1_201u64 {
            profiler
                .train(Some(format_compact!("{}", 100_000 + i).as_str()))
                .unwrap();
        }
        let result = profiler.get_result().unwrap();
        println!(
            "samples {} cardinality {} key {}",
            result.sample_count,
            result.cardinality.len(),
            result.is_key
        );
        assert_eq!(result.semantic_type, "Long", "Wrong semantic type!");
        assert!(result.is_key, "A dense unique Long column must be a key candidate!");

        let mut with_nulls = ColumnProfiler::new("pk2", DateResolution::None);
        for i in 0..1_201u64 {
            with_nulls
                .train(Some(format_compact!("{}", 100_000 + i).as_str()))
                .unwrap();
        }
        with_nulls.train(None).unwrap();
        let result = with_nulls.get_result().unwrap();
        assert!(!result.is_key, "Nulls must disqualify a key candidate!");
    }

    #[test]
    fn test_round_trip_through_format() {
        use dptk_core::search::dp_search::string_is_full_match;
        let mut profiler = ColumnProfiler::new("posted", DateResolution::None);
        train_all(&mut profiler, &DAY_FIRST_SAMPLES);
        let result = profiler.get_result().unwrap();
        for sample in &DAY_FIRST_SAMPLES {
            assert!(
                string_is_full_match(sample, result.pattern_regexp.as_str()),
                "{}",
                format_compact!("Accepted sample {:?} must match the pattern!", sample)
            );
        }
    }

    #[test]
    fn test_numeric_fusion_in_window() {
        let mut profiler = ColumnProfiler::new("metric", DateResolution::None);
        for i in 0..11 {
            profiler
                .train(Some(format_compact!("{}", 100 + i).as_str()))
                .unwrap();
        }
        for i in 0..10 {
            profiler
                .train(Some(format_compact!("-{}.25", 50 + i).as_str()))
                .unwrap();
        }
        let result = profiler.get_result().unwrap();
        println!("{:#?}", result);
        assert_eq!(
            result.semantic_type, "Double",
            "Mixed longs and signed doubles must fuse to Double!"
        );
        assert_eq!(result.confidence, 1.0, "Fused windows must fully match!");
    }

    #[test]
    fn test_statistics_collection_toggle() {
        let mut profiler = ColumnProfiler::new("nostats", DateResolution::None);
        profiler.set_collect_statistics(false).unwrap();
        for i in 0..21 {
            profiler
                .train(Some(format_compact!("{}", 100 + i).as_str()))
                .unwrap();
        }
        let result = profiler.get_result().unwrap();
        assert_eq!(result.min_value, None, "Statistics were disabled!");
        assert_eq!(result.sum, None, "Statistics were disabled!");

        let mut profiler = ColumnProfiler::new("stats", DateResolution::None);
        for i in 0..21 {
            profiler
                .train(Some(format_compact!("{}", 100 + i).as_str()))
                .unwrap();
        }
        let result = profiler.get_result().unwrap();
        assert_eq!(result.min_value.as_deref(), Some("100"), "Wrong minimum!");
        assert_eq!(result.max_value.as_deref(), Some("120"), "Wrong maximum!");
        let expected_sum: i64 = (100..121).sum();
        assert_eq!(
            result.sum.as_deref(),
            Some(format_compact!("{}", expected_sum).as_str()),
            "Wrong arbitrary precision sum!"
        );
    }

    #[test]
    fn test_leading_zero_tracking() {
        let mut profiler = ColumnProfiler::new("padded", DateResolution::None);
        for i in 0..21 {
            profiler
                .train(Some(format_compact!("{:05}", 42 + i).as_str()))
                .unwrap();
        }
        let result = profiler.get_result().unwrap();
        assert_eq!(
            result.total_leading_zeros, 21,
            "Zero padded numbers must be counted!"
        );
    }

    #[test]
    fn test_profile_macro() {
        let samples: Vec<Option<DPString>> = vec![
            Some(DPString::from("true")),
            None,
            Some(DPString::from("false")),
        ];
        let result = dptk_profile!("active", &samples).unwrap();
        assert_eq!(result.sample_count, 3, "Wrong macro sample count!");
        assert_eq!(result.null_count, 1, "Wrong macro null count!");
        assert_eq!(result.semantic_type, "Boolean", "Wrong macro semantic type!");
    }
}
