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

pub mod format_detector {
    use crate::profile_chars::char_classes::ProfileLocale;
    use crate::profile_constants::*;
    use crate::profile_logical::logical_types::is_zone_name;
    use dptk_core::strings::{DPString, SampleStringExtensions};

    /**************************** Constants**************************************/

    const DATE_SEPARATORS: [char; 3] = ['/', '-', ' '];

    /**************************** Types *****************************************/

    ///
    /// How the detector resolves day/month ambiguity in all-numeric dates.
    ///
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum DateResolution {
        DayFirst,
        MonthFirst,
        /// Resolve by the profiler locale's convention.
        Auto,
        /// Leave `?` placeholders in the format.
        #[default]
        None,
    }

    /**************************** Helpers ***************************************/

    fn acceptable_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == ':' || c == '/' || c == '-' || c == '+' || c == ' '
    }

    fn push_repeated(out: &mut DPString, c: char, count: usize) {
        for _ in 0..count {
            out.push(c);
        }
    }

    ///
    /// Strip a trailing named-zone token. Returns the remaining text and
    /// whether a zone was present. A trailing all-alpha token that is not a
    /// recognized zone name sinks the whole determination.
    ///
    fn strip_zone(input: &str) -> Option<(&str, bool)> {
        let tail = input.last_token();
        if tail.is_empty() || !tail.chars().all(|c| c.is_ascii_alphabetic()) {
            return Some((input, false));
        }
        // A lone alpha token cannot be a zone suffix; leave it for the date
        // scanner (it may be a month abbreviation or garbage it will reject).
        if tail.len() == input.trim().len() {
            return Some((input, false));
        }
        if !is_zone_name(tail) {
            return None;
        }
        let remainder = input[..input.len() - tail.len()].trim_end();
        Some((remainder, true))
    }

    ///
    /// Locate and classify a trailing ISO-8601 offset. Returns the remaining
    /// text and the offset token (`x` .. `xxxxx`), or fails the determination
    /// if a sign is present with a malformed body.
    ///
    fn strip_offset(input: &str) -> Option<(&str, Option<&'static str>)> {
        // A sign only starts an offset when it directly follows a time
        // field, i.e. everything between the last ':' and the sign is the
        // digits of that field. This keeps '-' separated dates intact.
        let mut start: Option<usize> = None;
        for (i, c) in input.char_indices().rev() {
            if c != '+' && c != '-' {
                continue;
            }
            let head = &input[..i];
            let last_colon = match head.rfind(':') {
                Some(p) => p,
                None => continue,
            };
            let field = &head[last_colon + 1..];
            if field.is_empty() || field.len() > 2 || !field.chars().all(|d| d.is_ascii_digit()) {
                continue;
            }
            start = Some(i);
            break;
        }
        let start = match start {
            Some(p) => p,
            None => return Some((input, None)),
        };
        let token = classify_offset(&input[start + 1..])?;
        Some((input[..start].trim_end(), Some(token)))
    }

    fn classify_offset(body: &str) -> Option<&'static str> {
        let digits: Vec<&str> = body.split(':').collect();
        let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        match digits.as_slice() {
            [hhmm] if all_digits(hhmm) => match hhmm.len() {
                2 => validate_offset(hhmm, "", "").map(|_| "x"),
                4 => validate_offset(&hhmm[..2], &hhmm[2..], "").map(|_| "xx"),
                6 => validate_offset(&hhmm[..2], &hhmm[2..4], &hhmm[4..]).map(|_| "xxxx"),
                _ => None,
            },
            [hh, mm] if all_digits(hh) && all_digits(mm) => {
                if hh.len() != 2 || mm.len() != 2 {
                    return None;
                }
                validate_offset(hh, mm, "").map(|_| "xxx")
            }
            [hh, mm, ss] if all_digits(hh) && all_digits(mm) && all_digits(ss) => {
                if hh.len() != 2 || mm.len() != 2 || ss.len() != 2 {
                    return None;
                }
                validate_offset(hh, mm, ss).map(|_| "xxxxx")
            }
            _ => None,
        }
    }

    fn validate_offset(hh: &str, mm: &str, ss: &str) -> Option<()> {
        let hour: u32 = hh.parse().ok()?;
        if hour > MAX_OFFSET_HOURS {
            return None;
        }
        if !mm.is_empty() && mm.parse::<u32>().ok()? > MAX_OFFSET_MINUTES {
            return None;
        }
        if !ss.is_empty() && ss.parse::<u32>().ok()? > MAX_OFFSET_MINUTES {
            return None;
        }
        Some(())
    }

    ///
    /// Derive the time-portion format: `H:mm`, `HH:mm`, `H:mm:ss`, `HH:mm:ss`.
    ///
    fn determine_time_format(time_part: &str) -> Option<DPString> {
        let fields: Vec<&str> = time_part.split(':').collect();
        if fields.len() < 2 || fields.len() > 3 {
            return None;
        }
        for field in &fields {
            if field.is_empty() || !field.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
        }
        let hours = fields[0];
        if hours.len() > 2 || hours.parse::<u32>().ok()? > MAX_HOUR {
            return None;
        }
        let mut format = DPString::from(match hours.len() {
            1 => "H",
            _ => "HH",
        });
        for (index, field) in fields[1..].iter().enumerate() {
            if field.len() != 2 || field.parse::<u32>().ok()? > MAX_MINUTE_SECOND {
                return None;
            }
            format.push(':');
            format.push_str(match index {
                0 => "mm",
                _ => "ss",
            });
        }
        Some(format)
    }

    ///
    /// One scanned date field: an all-digit run or a month abbreviation.
    ///
    #[derive(Debug)]
    enum DateField {
        Digits { width: usize, value: u32 },
        MonthAbbr,
    }

    fn scan_date_field(token: &str, locale: &ProfileLocale) -> Option<DateField> {
        if token.chars().all(|c| c.is_ascii_digit()) && !token.is_empty() {
            let width = token.len();
            if width != 1 && width != 2 && width != 4 {
                return None;
            }
            return Some(DateField::Digits {
                width,
                value: token.parse().ok()?,
            });
        }
        if token.len() == 3 && token.chars().all(|c| c.is_ascii_alphabetic()) {
            locale.month_abbr_index(token)?;
            return Some(DateField::MonthAbbr);
        }
        None
    }

    fn day_token(width: usize) -> &'static str {
        match width {
            1 => "d",
            _ => "dd",
        }
    }

    fn month_token(width: usize) -> &'static str {
        match width {
            1 => "M",
            _ => "MM",
        }
    }

    fn placeholder_token(out: &mut DPString, width: usize) {
        push_repeated(out, '?', width);
    }

    ///
    /// Derive the date-portion format from three separator-delimited fields.
    ///
    fn determine_date_format(date_part: &str, locale: &ProfileLocale) -> Option<DPString> {
        let sep = pick_separator(date_part)?;
        let tokens: Vec<&str> = date_part.split(sep).collect();
        if tokens.len() != 3 {
            return None;
        }
        let fields: Vec<DateField> = tokens
            .iter()
            .map(|t| scan_date_field(t, locale))
            .collect::<Option<Vec<DateField>>>()?;

        let mut format = DPString::with_capacity(12);
        match (&fields[0], &fields[1], &fields[2]) {
            // Month abbreviation in the middle: day and year by position.
            (
                DateField::Digits {
                    width: w0,
                    value: v0,
                },
                DateField::MonthAbbr,
                DateField::Digits {
                    width: w2,
                    value: _,
                },
            ) => {
                if *w0 == 4 {
                    // yyyy MMM dd
                    format.push_str("yyyy");
                    format.push(sep);
                    format.push_str("MMM");
                    format.push(sep);
                    format.push_str(day_token(*w2));
                } else {
                    if *v0 == 0 || *v0 > MAX_DAY {
                        return None;
                    }
                    format.push_str(day_token(*w0));
                    format.push(sep);
                    format.push_str("MMM");
                    format.push(sep);
                    format.push_str(year_token(*w2)?);
                }
            }
            // Month abbreviation first: MMM d yyyy.
            (
                DateField::MonthAbbr,
                DateField::Digits {
                    width: w1,
                    value: v1,
                },
                DateField::Digits {
                    width: w2,
                    value: _,
                },
            ) => {
                if *v1 == 0 || *v1 > MAX_DAY {
                    return None;
                }
                format.push_str("MMM");
                format.push(sep);
                format.push_str(day_token(*w1));
                format.push(sep);
                format.push_str(year_token(*w2)?);
            }
            (
                DateField::Digits {
                    width: w0,
                    value: v0,
                },
                DateField::Digits {
                    width: w1,
                    value: v1,
                },
                DateField::Digits {
                    width: w2,
                    value: v2,
                },
            ) => {
                all_numeric_date(&mut format, sep, (*w0, *v0), (*w1, *v1), (*w2, *v2))?;
            }
            _ => return None,
        }
        Some(format)
    }

    fn year_token(width: usize) -> Option<&'static str> {
        match width {
            2 => Some("yy"),
            4 => Some("yyyy"),
            _ => None,
        }
    }

    fn pick_separator(date_part: &str) -> Option<char> {
        let mut found: Option<char> = None;
        for sep in DATE_SEPARATORS {
            if date_part.contains(sep) {
                if found.is_some() {
                    // Mixed separators within the date portion.
                    return None;
                }
                found = Some(sep);
            }
        }
        found
    }

    ///
    /// The all-numeric three-field disambiguation rules. A 4-digit field
    /// anchors the year; otherwise field magnitudes decide what can be a day,
    /// and anything still unresolved becomes a `?` placeholder run.
    ///
    fn all_numeric_date(
        format: &mut DPString,
        sep: char,
        f0: (usize, u32),
        f1: (usize, u32),
        f2: (usize, u32),
    ) -> Option<()> {
        let ((w0, v0), (w1, v1), (w2, v2)) = (f0, f1, f2);
        if w0 == 4 {
            // yyyy s MM s dd: the remaining fields must be 2 digits.
            if w1 != 2 || w2 != 2 {
                return None;
            }
            if v1 == 0 || v1 > MAX_MONTH || v2 == 0 || v2 > MAX_DAY {
                return None;
            }
            format.push_str("yyyy");
            format.push(sep);
            format.push_str("MM");
            format.push(sep);
            format.push_str("dd");
            return Some(());
        }
        if v0 > MAX_DAY && w0 == 2 && v2 <= MAX_DAY {
            // yy MM dd with the year leading.
            if v1 == 0 || v1 > MAX_MONTH || v2 == 0 || v2 > MAX_DAY {
                return None;
            }
            format.push_str("yy");
            format.push(sep);
            format.push_str(month_token(w1));
            format.push(sep);
            format.push_str(day_token(w2));
            return Some(());
        }
        if v0 > MAX_DAY || v1 > MAX_DAY {
            return None;
        }
        if v0 > MAX_MONTH && v1 > MAX_MONTH {
            return None;
        }
        let day_anchored = v0 > MAX_MONTH || v1 > MAX_MONTH;
        if v0 > MAX_MONTH {
            // First field must be the day.
            format.push_str(day_token(w0));
            format.push(sep);
            format.push_str(month_token(w1));
        } else if v1 > MAX_MONTH {
            // Second field must be the day.
            format.push_str(month_token(w0));
            format.push(sep);
            format.push_str(day_token(w1));
        } else {
            placeholder_token(format, w0);
            format.push(sep);
            placeholder_token(format, w1);
        }
        format.push(sep);
        if w2 == 4 {
            format.push_str("yyyy");
        } else if v2 > MAX_DAY || day_anchored {
            // The trailing field can only be the year.
            push_repeated(format, 'y', w2);
        } else {
            // Nothing anchors the year either.
            placeholder_token(format, w2);
        }
        Some(())
    }

    ///
    /// Derive a format pattern from a single textual sample, or return `None`
    /// on any structural violation. This function is total on trimmed input:
    /// it never panics and never raises.
    ///
    pub fn determine_format_string(
        sample: &str,
        resolution: DateResolution,
        locale: &ProfileLocale,
    ) -> Option<DPString> {
        let trimmed = sample.trim();
        if trimmed.is_empty() || trimmed.has_junk() {
            return None;
        }
        if !trimmed.chars().all(acceptable_char) {
            return None;
        }

        let (remainder, has_zone) = strip_zone(trimmed)?;
        let (remainder, offset) = strip_offset(remainder)?;
        if remainder.is_empty() {
            return None;
        }

        let (date_part, time_part, time_first, datetime_sep) = split_date_time(remainder)?;

        let time_format = match time_part {
            Some(part) => Some(determine_time_format(part)?),
            None => None,
        };
        let date_format = match date_part {
            Some(part) => Some(determine_date_format(part, locale)?),
            None => None,
        };

        // A timezone needs a time to attach to.
        if (has_zone || offset.is_some()) && time_format.is_none() {
            return None;
        }

        let mut format = DPString::with_capacity(32);
        match (&date_format, &time_format) {
            (Some(date), Some(time)) => match (time_first, datetime_sep) {
                (true, _) => {
                    format.push_str(time);
                    format.push(' ');
                    format.push_str(date);
                }
                (false, 'T') => {
                    format.push_str(date);
                    format.push_str("'T'");
                    format.push_str(time);
                }
                (false, _) => {
                    format.push_str(date);
                    format.push(' ');
                    format.push_str(time);
                }
            },
            (Some(date), None) => format.push_str(date),
            (None, Some(time)) => format.push_str(time),
            (None, None) => return None,
        }

        if let Some(token) = offset {
            format.push_str(token);
        }
        if has_zone {
            format.push_str(" z");
        }

        let resolved = match resolution {
            DateResolution::None => format,
            DateResolution::DayFirst => force_resolve(&format, true),
            DateResolution::MonthFirst => force_resolve(&format, false),
            DateResolution::Auto => force_resolve(&format, locale.day_first()),
        };
        Some(resolved)
    }

    ///
    /// Partition the remainder into date and time portions. Supports `T`
    /// separated ISO forms and space separated forms in either order.
    ///
    fn split_date_time(input: &str) -> Option<(Option<&str>, Option<&str>, bool, char)> {
        // An ISO 'T' separator sits between two digits; a 'T' inside a month
        // abbreviation (OCT) does not.
        let iso_t = input.char_indices().find(|(i, c)| {
            *c == 'T'
                && *i > 0
                && input.as_bytes()[i - 1].is_ascii_digit()
                && input.as_bytes().get(i + 1).is_some_and(|b| b.is_ascii_digit())
        });
        if let Some((t_pos, _)) = iso_t {
            let left = &input[..t_pos];
            let right = &input[t_pos + 1..];
            if left.is_empty() || right.is_empty() || left.contains(':') {
                return None;
            }
            return Some((Some(left), Some(right), false, 'T'));
        }
        if !input.contains(':') {
            return Some((Some(input), None, false, ' '));
        }
        let tokens: Vec<&str> = input.split(' ').filter(|t| !t.is_empty()).collect();
        if tokens.len() == 1 {
            // Pure time.
            return Some((None, Some(tokens[0]), true, ' '));
        }
        let time_index = tokens.iter().position(|t| t.contains(':'))?;
        if tokens.iter().filter(|t| t.contains(':')).count() != 1 {
            return None;
        }
        let time_first = time_index == 0;
        // The time must sit at one end; a time wedged between date fields is
        // not a recognized structure.
        if !time_first && time_index != tokens.len() - 1 {
            return None;
        }
        let time = tokens[time_index];
        let date = match time_first {
            true => input[input.find(time)? + time.len()..].trim(),
            false => input[..input.rfind(time)?].trim(),
        };
        if date.is_empty() {
            return None;
        }
        Some((Some(date), Some(time), time_first, ' '))
    }

    ///
    /// Rewrite every `?` placeholder run as concrete day/month/year tokens.
    /// The first two runs become day and month per `day_first`; a third run
    /// can only be the two-digit year.
    ///
    pub fn force_resolve(format: &str, day_first: bool) -> DPString {
        let mut out = DPString::with_capacity(format.len());
        let mut run = 0usize;
        let mut runs_seen = 0usize;
        let chars: Vec<char> = format.chars().collect();
        for (i, c) in chars.iter().enumerate() {
            if *c == '?' {
                run += 1;
                let next_is_placeholder = chars.get(i + 1) == Some(&'?');
                if !next_is_placeholder {
                    let token = match runs_seen {
                        0 => match day_first {
                            true => 'd',
                            false => 'M',
                        },
                        1 => match day_first {
                            true => 'M',
                            false => 'd',
                        },
                        _ => 'y',
                    };
                    push_repeated(&mut out, token, run);
                    runs_seen += 1;
                    run = 0;
                }
                continue;
            }
            out.push(*c);
        }
        out
    }
}
