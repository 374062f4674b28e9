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

pub mod date_format {
    use crate::profile_chars::char_classes::ProfileLocale;
    use crate::profile_constants::*;
    use crate::profile_logical::logical_types::is_zone_name;
    use crate::profile_patterns::pattern_registry::SemanticType;
    use dptk_core::cache::{DPCache, Lazy};
    use dptk_core::strings::{format_compact, DPString};
    use std::sync::{Arc, Mutex};

    /**************************** Globals ***************************************/

    ///
    /// Process-wide descriptor cache keyed by format string. Insertion is
    /// idempotent: compiling the same format twice yields equal descriptors,
    /// so concurrent lookup-or-insert is harmless.
    ///
    static FORMAT_CACHE: Lazy<Mutex<DPCache<DPString, Arc<DateTimeFormat>>>> =
        Lazy::new(|| Mutex::new(DPCache::with_capacity(32)));

    /**************************** Types *****************************************/

    ///
    /// One compiled token of a format string.
    ///
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FormatToken {
        /// `y`/`yy`/`yyyy`; the payload is the digit width (1, 2 or 4).
        Year(u8),
        /// `M`/`MM`.
        Month(u8),
        /// `MMM`.
        MonthAbbr,
        /// `d`/`dd`.
        Day(u8),
        /// `H`/`HH`.
        Hour(u8),
        /// `mm`.
        Minute,
        /// `ss`.
        Second,
        /// `?`/`??`: an ambiguous day-or-month field.
        Unknown(u8),
        /// A constant character, including quoted `'T'`.
        Literal(char),
        /// `x` .. `xxxxx`: ISO-8601 offset of increasing verbosity.
        Offset(u8),
        /// `z`: a named zone consuming the remainder of the input.
        ZoneName,
    }

    ///
    /// A parse failure: the reason text forms part of the external contract
    /// and the offset is the character position within the input.
    ///
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct FormatParseError {
        pub reason: DPString,
        pub offset: usize,
    }

    impl FormatParseError {
        fn new(reason: &str, offset: usize) -> FormatParseError {
            FormatParseError {
                reason: DPString::from(reason),
                offset,
            }
        }
    }

    ///
    /// Field values extracted by a successful validation. Fields the format
    /// does not carry stay zero. Ambiguous `?` fields land positionally in
    /// `month` then `day` slots.
    ///
    #[derive(Debug, Default, Clone, PartialEq, Eq)]
    pub struct ParsedDateTime {
        pub year: i32,
        pub month: u32,
        pub day: u32,
        pub hour: u32,
        pub minute: u32,
        pub second: u32,
        pub offset_seconds: Option<i32>,
        pub zone: Option<DPString>,
    }

    impl ParsedDateTime {
        ///
        /// Deterministic ordering key for extreme tracking: calendar fields
        /// from most to least significant.
        ///
        pub fn compare_key(&self) -> (i32, u32, u32, u32, u32, u32) {
            (
                self.year,
                self.month,
                self.day,
                self.hour,
                self.minute,
                self.second,
            )
        }
    }

    ///
    /// Cached format descriptor: the compiled token sequence plus the
    /// structural attributes the profiler queries.
    ///
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct DateTimeFormat {
        format: DPString,
        tokens: Vec<FormatToken>,
        date_elements: u8,
        time_elements: u8,
        day_offset: i8,
        day_length: u8,
        month_offset: i8,
        month_length: u8,
        year_offset: i8,
        year_length: u8,
        hour_length: u8,
        time_first: bool,
        date_separator: Option<char>,
        datetime_separator: Option<char>,
        timezone: DPString,
    }

    /**************************** Compilation ***********************************/

    impl DateTimeFormat {
        ///
        /// Compile a format string into a descriptor. Formats the profiler
        /// itself synthesized always compile; failure here is a usage error.
        ///
        pub fn compile(format: &str) -> Result<DateTimeFormat, DPString> {
            let mut tokens: Vec<FormatToken> = Vec::with_capacity(12);
            let chars: Vec<char> = format.chars().collect();
            let mut i = 0;
            while i < chars.len() {
                let c = chars[i];
                let run = run_length(&chars, i);
                match c {
                    'y' => {
                        if run != 1 && run != 2 && run != 4 {
                            return Err(format_compact!("Bad year width in format: {}", format));
                        }
                        tokens.push(FormatToken::Year(run as u8));
                        i += run;
                    }
                    'M' => match run {
                        1 | 2 => {
                            tokens.push(FormatToken::Month(run as u8));
                            i += run;
                        }
                        3 => {
                            tokens.push(FormatToken::MonthAbbr);
                            i += 3;
                        }
                        _ => return Err(format_compact!("Bad month width in format: {}", format)),
                    },
                    'd' => {
                        if run > 2 {
                            return Err(format_compact!("Bad day width in format: {}", format));
                        }
                        tokens.push(FormatToken::Day(run as u8));
                        i += run;
                    }
                    'H' => {
                        if run > 2 {
                            return Err(format_compact!("Bad hour width in format: {}", format));
                        }
                        tokens.push(FormatToken::Hour(run as u8));
                        i += run;
                    }
                    'm' => {
                        if run != 2 {
                            return Err(format_compact!("Bad minute width in format: {}", format));
                        }
                        tokens.push(FormatToken::Minute);
                        i += 2;
                    }
                    's' => {
                        if run != 2 {
                            return Err(format_compact!("Bad second width in format: {}", format));
                        }
                        tokens.push(FormatToken::Second);
                        i += 2;
                    }
                    '?' => {
                        if run > 2 {
                            return Err(format_compact!(
                                "Bad placeholder width in format: {}",
                                format
                            ));
                        }
                        tokens.push(FormatToken::Unknown(run as u8));
                        i += run;
                    }
                    'x' => {
                        if run > 5 {
                            return Err(format_compact!("Bad offset width in format: {}", format));
                        }
                        tokens.push(FormatToken::Offset(run as u8));
                        i += run;
                    }
                    'z' => {
                        tokens.push(FormatToken::ZoneName);
                        i += 1;
                    }
                    '\'' => {
                        let mut j = i + 1;
                        while j < chars.len() && chars[j] != '\'' {
                            tokens.push(FormatToken::Literal(chars[j]));
                            j += 1;
                        }
                        if j >= chars.len() {
                            return Err(format_compact!("Unbalanced quote in format: {}", format));
                        }
                        i = j + 1;
                    }
                    _ => {
                        tokens.push(FormatToken::Literal(c));
                        i += 1;
                    }
                }
            }
            DateTimeFormat::from_tokens(format, tokens)
        }

        fn from_tokens(format: &str, tokens: Vec<FormatToken>) -> Result<DateTimeFormat, DPString> {
            let mut descriptor = DateTimeFormat {
                format: DPString::from(format),
                tokens: Vec::new(),
                date_elements: 0,
                time_elements: 0,
                day_offset: -1,
                day_length: 0,
                month_offset: -1,
                month_length: 0,
                year_offset: -1,
                year_length: 0,
                hour_length: 0,
                time_first: false,
                date_separator: None,
                datetime_separator: None,
                timezone: DPString::from(""),
            };
            let mut years = 0;
            let mut hours = 0;
            let mut saw_time = false;
            let mut saw_date = false;
            for token in &tokens {
                match token {
                    FormatToken::Year(len) => {
                        years += 1;
                        descriptor.year_offset = descriptor.date_elements as i8;
                        descriptor.year_length = *len;
                        descriptor.date_elements += 1;
                        saw_date = true;
                    }
                    FormatToken::Month(len) => {
                        descriptor.month_offset = descriptor.date_elements as i8;
                        descriptor.month_length = *len;
                        descriptor.date_elements += 1;
                        saw_date = true;
                    }
                    FormatToken::MonthAbbr => {
                        descriptor.month_offset = descriptor.date_elements as i8;
                        descriptor.month_length = 3;
                        descriptor.date_elements += 1;
                        saw_date = true;
                    }
                    FormatToken::Day(len) => {
                        descriptor.day_offset = descriptor.date_elements as i8;
                        descriptor.day_length = *len;
                        descriptor.date_elements += 1;
                        saw_date = true;
                    }
                    FormatToken::Unknown(_) => {
                        descriptor.date_elements += 1;
                        saw_date = true;
                    }
                    FormatToken::Hour(len) => {
                        hours += 1;
                        descriptor.hour_length = *len;
                        descriptor.time_elements += 1;
                        if !saw_date {
                            descriptor.time_first = true;
                        }
                        saw_time = true;
                    }
                    FormatToken::Minute | FormatToken::Second => {
                        descriptor.time_elements += 1;
                        saw_time = true;
                    }
                    FormatToken::Literal(c) => {
                        if (*c == '/' || *c == '-' || *c == ' ')
                            && saw_date
                            && !saw_time
                            && descriptor.date_separator.is_none()
                        {
                            descriptor.date_separator = Some(*c);
                        }
                    }
                    FormatToken::Offset(len) => {
                        descriptor.timezone = DPString::from(match len {
                            1 => "x",
                            2 => "xx",
                            3 => "xxx",
                            4 => "xxxx",
                            _ => "xxxxx",
                        });
                    }
                    FormatToken::ZoneName => {
                        descriptor.timezone = DPString::from(" z");
                    }
                }
            }
            if years > 1 {
                return Err(format_compact!(
                    "More than one year field in format: {}",
                    format
                ));
            }
            if hours > 1 {
                return Err(format_compact!(
                    "More than one hour field in format: {}",
                    format
                ));
            }
            // Locate the date/time separator when both portions are present.
            if saw_date && saw_time {
                descriptor.datetime_separator = match format.contains("'T'") {
                    true => Some('T'),
                    false => Some(' '),
                };
            }
            descriptor.tokens = tokens;
            Ok(descriptor)
        }

        ///
        /// Fetch (or compile and cache) the descriptor for a format string.
        ///
        pub fn cached(format: &str) -> Result<Arc<DateTimeFormat>, DPString> {
            let mut cache = match FORMAT_CACHE.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(descriptor) = cache.get(format) {
                return Ok(Arc::clone(descriptor));
            }
            let compiled = Arc::new(DateTimeFormat::compile(format)?);
            cache.insert(DPString::from(format), Arc::clone(&compiled));
            Ok(compiled)
        }

        /**************************** Queries ***********************************/

        pub fn get_format_string(&self) -> DPString {
            let mut out = DPString::with_capacity(self.format.len());
            for token in &self.tokens {
                match token {
                    FormatToken::Year(len) => push_repeat(&mut out, 'y', *len),
                    FormatToken::Month(len) => push_repeat(&mut out, 'M', *len),
                    FormatToken::MonthAbbr => out.push_str("MMM"),
                    FormatToken::Day(len) => push_repeat(&mut out, 'd', *len),
                    FormatToken::Hour(len) => push_repeat(&mut out, 'H', *len),
                    FormatToken::Minute => out.push_str("mm"),
                    FormatToken::Second => out.push_str("ss"),
                    FormatToken::Unknown(len) => push_repeat(&mut out, '?', *len),
                    FormatToken::Literal('T') => out.push_str("'T'"),
                    FormatToken::Literal(c) => out.push(*c),
                    FormatToken::Offset(len) => push_repeat(&mut out, 'x', *len),
                    FormatToken::ZoneName => out.push('z'),
                }
            }
            out
        }

        ///
        /// The semantic type this format implies.
        ///
        pub fn get_type(&self) -> SemanticType {
            if self.timezone.as_str() == " z" {
                return SemanticType::ZonedDateTime;
            }
            if self.timezone.starts_with('x') {
                return SemanticType::OffsetDateTime;
            }
            match (self.date_elements > 0, self.time_elements > 0) {
                (true, true) => SemanticType::LocalDateTime,
                (true, false) => SemanticType::LocalDate,
                _ => SemanticType::LocalTime,
            }
        }

        ///
        /// Synthesize a regular expression matching this format.
        ///
        pub fn get_regexp(&self) -> DPString {
            let mut out = DPString::with_capacity(self.format.len() * 2);
            for token in &self.tokens {
                match token {
                    FormatToken::Year(len) => match len {
                        4 => out.push_str(r"\d{4}"),
                        2 => out.push_str(r"\d{2}"),
                        _ => out.push_str(r"\d{1,2}"),
                    },
                    FormatToken::Month(len) | FormatToken::Day(len) | FormatToken::Hour(len)
                    | FormatToken::Unknown(len) => match len {
                        1 => out.push_str(r"\d{1,2}"),
                        _ => out.push_str(r"\d{2}"),
                    },
                    FormatToken::MonthAbbr => out.push_str(r"\p{Alpha}{3}"),
                    FormatToken::Minute | FormatToken::Second => out.push_str(r"\d{2}"),
                    FormatToken::Literal(c) => push_escaped(&mut out, *c),
                    FormatToken::Offset(len) => out.push_str(match len {
                        1 => r"[+-]\d{2}",
                        2 => r"[+-]\d{4}",
                        3 => r"[+-]\d{2}:\d{2}",
                        4 => r"[+-]\d{6}",
                        _ => r"[+-]\d{2}:\d{2}:\d{2}",
                    }),
                    FormatToken::ZoneName => out.push_str(r"[A-Z]+"),
                }
            }
            out
        }

        pub fn hour_length(&self) -> u8 {
            self.hour_length
        }

        pub fn time_first(&self) -> bool {
            self.time_first
        }

        pub fn date_separator(&self) -> Option<char> {
            self.date_separator
        }

        pub fn datetime_separator(&self) -> Option<char> {
            self.datetime_separator
        }

        pub fn timezone(&self) -> &str {
            self.timezone.as_str()
        }

        pub fn date_elements(&self) -> u8 {
            self.date_elements
        }

        pub fn time_elements(&self) -> u8 {
            self.time_elements
        }

        pub fn day_offset(&self) -> i8 {
            self.day_offset
        }

        pub fn day_length(&self) -> u8 {
            self.day_length
        }

        pub fn month_offset(&self) -> i8 {
            self.month_offset
        }

        pub fn month_length(&self) -> u8 {
            self.month_length
        }

        pub fn year_offset(&self) -> i8 {
            self.year_offset
        }

        pub fn year_length(&self) -> u8 {
            self.year_length
        }

        pub fn has_ambiguous_fields(&self) -> bool {
            self.tokens
                .iter()
                .any(|t| matches!(t, FormatToken::Unknown(_)))
        }

        ///
        /// Rebuild this format with one doubled day or month field shrunk to
        /// its single-digit form; the tracker's one-shot repair path.
        ///
        pub fn repaired_format(&self, day_field: bool) -> Option<DPString> {
            let mut tokens = self.tokens.clone();
            let target = tokens.iter_mut().find_map(|t| match (day_field, &t) {
                (true, FormatToken::Day(2)) => Some(t),
                (false, FormatToken::Month(2)) => Some(t),
                _ => None,
            })?;
            *target = match day_field {
                true => FormatToken::Day(1),
                false => FormatToken::Month(1),
            };
            let rebuilt = DateTimeFormat {
                tokens,
                ..self.clone()
            };
            Some(rebuilt.get_format_string())
        }

        /**************************** Validation ********************************/

        ///
        /// Walk the format and the input in lockstep, returning the extracted
        /// field values or the first failure with its reason and offset.
        ///
        pub fn validate(
            &self,
            input: &str,
            locale: &ProfileLocale,
        ) -> Result<ParsedDateTime, FormatParseError> {
            let chars: Vec<char> = input.trim().chars().collect();
            let mut walker = Walker {
                chars: &chars,
                pos: 0,
            };
            let mut parsed = ParsedDateTime::default();
            let mut unknown_slot = 0;
            for token in &self.tokens {
                match token {
                    FormatToken::Year(len) => {
                        let digits = match len {
                            4 => walker.take_exact_digits(4, REASON_EXPECTING_DIGIT)?,
                            2 => walker.take_exact_digits(2, REASON_EXPECTING_DIGIT)?,
                            _ => walker.take_flex_digits()?,
                        };
                        parsed.year = digits as i32;
                    }
                    FormatToken::Month(len) => {
                        let value = match len {
                            2 => walker.take_doubled_digits(REASON_INSUFFICIENT_MONTH_DIGITS)?,
                            _ => walker.take_flex_digits()?,
                        };
                        check_day_month(value, MAX_MONTH, walker.pos)?;
                        parsed.month = value;
                    }
                    FormatToken::Day(len) => {
                        let value = match len {
                            2 => walker.take_doubled_digits(REASON_INSUFFICIENT_DAY_DIGITS)?,
                            _ => walker.take_flex_digits()?,
                        };
                        check_day_month(value, MAX_DAY, walker.pos)?;
                        parsed.day = value;
                    }
                    FormatToken::MonthAbbr => {
                        let start = walker.pos;
                        let abbr = walker.take_letters(3)?;
                        match locale.month_abbr_index(&abbr) {
                            Some(month) => parsed.month = month,
                            None => {
                                return Err(FormatParseError::new(
                                    REASON_MONTH_ABBR_INCORRECT,
                                    start,
                                ))
                            }
                        }
                    }
                    FormatToken::Hour(len) => {
                        parsed.hour = match len {
                            2 => walker.take_exact_digits(2, REASON_EXPECTING_DIGIT)?,
                            _ => walker.take_flex_digits()?,
                        };
                    }
                    FormatToken::Minute => {
                        parsed.minute = walker.take_exact_digits(2, REASON_EXPECTING_DIGIT)?;
                    }
                    FormatToken::Second => {
                        parsed.second = walker.take_exact_digits(2, REASON_EXPECTING_DIGIT)?;
                    }
                    FormatToken::Unknown(len) => {
                        let value = match len {
                            2 => walker.take_exact_digits(2, REASON_EXPECTING_DIGIT)?,
                            _ => walker.take_flex_digits()?,
                        };
                        // Positional landing: first unknown is the month slot.
                        match unknown_slot {
                            0 => parsed.month = value,
                            1 => parsed.day = value,
                            _ => parsed.year = value as i32,
                        }
                        unknown_slot += 1;
                    }
                    FormatToken::Literal(expected) => {
                        walker.take_literal(*expected)?;
                    }
                    FormatToken::Offset(len) => {
                        parsed.offset_seconds = Some(walker.take_offset(*len)?);
                    }
                    FormatToken::ZoneName => {
                        let start = walker.pos;
                        let name: DPString = walker.take_rest();
                        if !is_zone_name(name.trim()) {
                            return Err(FormatParseError {
                                reason: format_compact!(
                                    "{}{}",
                                    REASON_BAD_TIMEZONE_PREFIX,
                                    name.trim()
                                ),
                                offset: start,
                            });
                        }
                        parsed.zone = Some(DPString::from(name.trim()));
                    }
                }
            }
            if walker.pos < walker.chars.len() {
                return Err(FormatParseError::new(REASON_EXTRANEOUS_INPUT, walker.pos));
            }
            Ok(parsed)
        }
    }

    fn run_length(chars: &[char], start: usize) -> usize {
        let c = chars[start];
        chars[start..].iter().take_while(|&&x| x == c).count()
    }

    fn check_day_month(value: u32, max: u32, offset: usize) -> Result<(), FormatParseError> {
        if value == 0 {
            return Err(FormatParseError::new(REASON_ZERO_DAY_MONTH, offset));
        }
        if value > max {
            return Err(FormatParseError::new(REASON_LARGE_DAY_MONTH, offset));
        }
        Ok(())
    }

    fn push_repeat(out: &mut DPString, c: char, count: u8) {
        for _ in 0..count {
            out.push(c);
        }
    }

    fn push_escaped(out: &mut DPString, c: char) {
        if r".^$*+?()[]{}|\".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }

    ///
    /// Cursor over the input characters with the failure vocabulary of the
    /// parse contract baked into each step.
    ///
    struct Walker<'a> {
        chars: &'a [char],
        pos: usize,
    }

    impl<'a> Walker<'a> {
        fn peek(&self) -> Option<char> {
            self.chars.get(self.pos).copied()
        }

        fn take_digit(&mut self, reason: &str) -> Result<u32, FormatParseError> {
            match self.peek() {
                None => Err(FormatParseError::new(REASON_EXPECTING_DIGIT_EOI, self.pos)),
                Some(c) if c.is_ascii_digit() => {
                    self.pos += 1;
                    Ok(c.to_digit(10).unwrap_or(0))
                }
                Some(_) => Err(FormatParseError::new(reason, self.pos)),
            }
        }

        fn take_exact_digits(&mut self, count: usize, reason: &str) -> Result<u32, FormatParseError> {
            let mut value = 0;
            for _ in 0..count {
                value = value * 10 + self.take_digit(reason)?;
            }
            Ok(value)
        }

        ///
        /// One or two digits, greedy.
        ///
        fn take_flex_digits(&mut self) -> Result<u32, FormatParseError> {
            let mut value = self.take_digit(REASON_EXPECTING_DIGIT)?;
            if let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    self.pos += 1;
                    value = value * 10 + c.to_digit(10).unwrap_or(0);
                }
            }
            Ok(value)
        }

        ///
        /// Exactly two digits for a doubled day/month field. A lone digit
        /// raises the dedicated "insufficient digits" reason the tracker keys
        /// its repair on.
        ///
        fn take_doubled_digits(&mut self, short_reason: &str) -> Result<u32, FormatParseError> {
            let first = self.take_digit(REASON_EXPECTING_DIGIT)?;
            match self.peek() {
                Some(c) if c.is_ascii_digit() => {
                    self.pos += 1;
                    Ok(first * 10 + c.to_digit(10).unwrap_or(0))
                }
                _ => Err(FormatParseError::new(short_reason, self.pos)),
            }
        }

        fn take_letters(&mut self, count: usize) -> Result<DPString, FormatParseError> {
            let mut out = DPString::with_capacity(count);
            for _ in 0..count {
                match self.peek() {
                    Some(c) if c.is_ascii_alphabetic() => {
                        out.push(c);
                        self.pos += 1;
                    }
                    _ => {
                        return Err(FormatParseError::new(
                            REASON_MONTH_ABBR_INCOMPLETE,
                            self.pos,
                        ))
                    }
                }
            }
            Ok(out)
        }

        fn take_literal(&mut self, expected: char) -> Result<(), FormatParseError> {
            match self.peek() {
                None => Err(FormatParseError::new(REASON_EXPECTING_CHAR_EOI, self.pos)),
                Some(c) if c == expected => {
                    self.pos += 1;
                    Ok(())
                }
                Some(_) => Err(FormatParseError::new(REASON_EXPECTING_CHAR, self.pos)),
            }
        }

        fn take_offset_digit(&mut self) -> Result<u32, FormatParseError> {
            match self.peek() {
                None => Err(FormatParseError::new(REASON_OFFSET_EOI, self.pos)),
                Some(c) if c.is_ascii_digit() => {
                    self.pos += 1;
                    Ok(c.to_digit(10).unwrap_or(0))
                }
                Some(_) => Err(FormatParseError::new(REASON_OFFSET_BAD, self.pos)),
            }
        }

        fn take_offset_colon(&mut self) -> Result<(), FormatParseError> {
            match self.peek() {
                None => Err(FormatParseError::new(REASON_OFFSET_EOI, self.pos)),
                Some(':') => {
                    self.pos += 1;
                    Ok(())
                }
                Some(_) => Err(FormatParseError::new(REASON_OFFSET_BAD, self.pos)),
            }
        }

        ///
        /// Sign plus the positional-digit template of the given offset form.
        ///
        fn take_offset(&mut self, verbosity: u8) -> Result<i32, FormatParseError> {
            let sign = match self.peek() {
                None => return Err(FormatParseError::new(REASON_OFFSET_EOI, self.pos)),
                Some('+') => 1,
                Some('-') => -1,
                Some(_) => return Err(FormatParseError::new(REASON_OFFSET_BAD, self.pos)),
            };
            self.pos += 1;
            let template = match verbosity {
                1 => "hh",
                2 => "hhmm",
                3 => "hh:mm",
                4 => "hhmmss",
                _ => "hh:mm:ss",
            };
            let mut hours = 0;
            let mut minutes = 0;
            let mut seconds = 0;
            for slot in template.chars() {
                match slot {
                    'h' => hours = hours * 10 + self.take_offset_digit()?,
                    'm' => minutes = minutes * 10 + self.take_offset_digit()?,
                    's' => seconds = seconds * 10 + self.take_offset_digit()?,
                    _ => self.take_offset_colon()?,
                }
            }
            if hours > MAX_OFFSET_HOURS {
                return Err(FormatParseError::new(REASON_OFFSET_BAD_HOUR, self.pos));
            }
            if minutes > MAX_OFFSET_MINUTES || seconds > MAX_OFFSET_MINUTES {
                return Err(FormatParseError::new(REASON_OFFSET_BAD_MINUTE, self.pos));
            }
            Ok(sign * (hours * 3600 + minutes * 60 + seconds) as i32)
        }

        fn take_rest(&mut self) -> DPString {
            let rest: DPString = self.chars[self.pos..].iter().copied().collect();
            self.pos = self.chars.len();
            rest
        }
    }
}
