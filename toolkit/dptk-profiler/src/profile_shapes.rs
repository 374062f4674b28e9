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

pub mod shape_levels {
    use crate::profile_chars::char_classes::{CharClass, ProfileLocale};
    use crate::profile_constants::*;
    use dptk_core::strings::{format_compact, DPString};

    /**************************** Constants**************************************/

    const REGEX_SPECIALS: &str = r".^$*+?()[]{}|\";
    const DATE_SEPARATORS: &str = ":/- ";
    const MIN_DATETIME_LENGTH: usize = 3;
    const MAX_DATETIME_LENGTH: usize = 35;
    const MIN_DATETIME_DIGITS: usize = 3;

    /**************************** Types *****************************************/

    ///
    /// Per-sample facts gathered while compressing. The analyzer consults
    /// these instead of rescanning the sample.
    ///
    #[derive(Debug, Default, Clone)]
    pub struct ShapeSignal {
        pub digits: usize,
        pub alphas: usize,
        pub others: usize,
        pub is_numeric: bool,
        pub negative: bool,
        pub has_decimal: bool,
        pub has_exponent: bool,
        pub has_group: bool,
    }

    ///
    /// The three progressively coarser shape descriptors derived from one
    /// trimmed sample. Level 0 preserves exact run lengths, level 1 collapses
    /// them, level 2 is the most general form the sample could satisfy.
    ///
    #[derive(Debug, Clone)]
    pub struct ShapeTriple {
        pub level0: DPString,
        pub level1: DPString,
        pub level2: DPString,
        pub signal: ShapeSignal,
    }

    /**************************** Helpers ***************************************/

    fn push_escaped(out: &mut DPString, c: char) {
        if REGEX_SPECIALS.contains(c) {
            out.push('\\');
        }
        out.push(c);
    }

    fn push_run(out: &mut DPString, class: CharClass, len: usize) {
        let atom = match class {
            CharClass::Digit => "\\d",
            CharClass::Alpha => "\\p{Alpha}",
            _ => return,
        };
        out.push_str(atom);
        if len > 1 {
            out.push_str(format_compact!("{{{}}}", len).as_str());
        }
    }

    fn push_collapsed_run(out: &mut DPString, class: CharClass) {
        match class {
            CharClass::Digit => out.push_str("\\d+"),
            CharClass::Alpha => out.push_str("\\p{Alpha}+"),
            _ => (),
        }
    }

    ///
    /// Strict numeric scan: optional minus, digit runs with embedded group
    /// separators, at most one decimal separator, optional exponent tail.
    /// Returns false the moment anything else shows up.
    ///
    fn scan_numeric(trimmed: &str, locale: &ProfileLocale, signal: &mut ShapeSignal) -> bool {
        let mut chars = trimmed.chars().peekable();
        let mut saw_digit = false;
        if let Some(&c) = chars.peek() {
            if locale.classify(c) == CharClass::Minus {
                signal.negative = true;
                chars.next();
            }
        }
        while let Some(&c) = chars.peek() {
            match locale.classify(c) {
                CharClass::Digit => {
                    saw_digit = true;
                    chars.next();
                }
                CharClass::GroupSep => {
                    if !saw_digit {
                        return false;
                    }
                    signal.has_group = true;
                    chars.next();
                }
                CharClass::DecimalSep => {
                    if signal.has_decimal {
                        return false;
                    }
                    signal.has_decimal = true;
                    chars.next();
                }
                CharClass::Alpha => {
                    if c != 'e' && c != 'E' {
                        return false;
                    }
                    if !saw_digit {
                        return false;
                    }
                    chars.next();
                    // exponent tail: optional sign then at least one digit
                    if let Some(&sign) = chars.peek() {
                        if sign == '+' || sign == '-' {
                            chars.next();
                        }
                    }
                    let mut exp_digits = 0;
                    while let Some(&d) = chars.peek() {
                        if d.is_ascii_digit() {
                            exp_digits += 1;
                            chars.next();
                        } else {
                            return false;
                        }
                    }
                    if exp_digits == 0 {
                        return false;
                    }
                    signal.has_exponent = true;
                    return true;
                }
                _ => return false,
            }
        }
        saw_digit
    }

    fn numeric_level1(signal: &ShapeSignal) -> &'static str {
        match (signal.has_decimal, signal.has_exponent, signal.negative) {
            (false, false, false) => PATTERN_LONG,
            (false, false, true) => PATTERN_SIGNED_LONG,
            (_, true, false) => PATTERN_DOUBLE_WITH_EXPONENT,
            (_, true, true) => PATTERN_SIGNED_DOUBLE_WITH_EXPONENT,
            (true, false, false) => PATTERN_DOUBLE,
            (true, false, true) => PATTERN_SIGNED_DOUBLE,
        }
    }

    fn numeric_level2(signal: &ShapeSignal) -> &'static str {
        match (signal.has_decimal, signal.has_exponent) {
            (false, false) => PATTERN_SIGNED_LONG,
            (_, true) => PATTERN_SIGNED_DOUBLE_WITH_EXPONENT,
            (true, false) => PATTERN_SIGNED_DOUBLE,
        }
    }

    ///
    /// Fold one trimmed sample into its three shape strings.
    ///
    pub fn compress(trimmed: &str, locale: &ProfileLocale) -> ShapeTriple {
        let mut signal = ShapeSignal::default();
        for c in trimmed.chars() {
            match locale.classify(c) {
                CharClass::Digit => signal.digits += 1,
                CharClass::Alpha => signal.alphas += 1,
                _ => signal.others += 1,
            }
        }

        // Boolean word pairs compress to their own shape at every level.
        if trimmed.eq_ignore_ascii_case(BOOLEAN_TRUE) || trimmed.eq_ignore_ascii_case(BOOLEAN_FALSE)
        {
            return ShapeTriple {
                level0: DPString::from(PATTERN_BOOLEAN_TRUE_FALSE),
                level1: DPString::from(PATTERN_BOOLEAN_TRUE_FALSE),
                level2: DPString::from(PATTERN_BOOLEAN_TRUE_FALSE),
                signal,
            };
        }
        if trimmed.eq_ignore_ascii_case(BOOLEAN_YES) || trimmed.eq_ignore_ascii_case(BOOLEAN_NO) {
            return ShapeTriple {
                level0: DPString::from(PATTERN_BOOLEAN_YES_NO),
                level1: DPString::from(PATTERN_BOOLEAN_YES_NO),
                level2: DPString::from(PATTERN_BOOLEAN_YES_NO),
                signal,
            };
        }

        signal.is_numeric = scan_numeric(trimmed, locale, &mut signal);

        let level0 = build_level0(trimmed, locale);
        let level1 = build_level1(trimmed, locale, &signal);
        let level2 = build_level2(&signal);

        ShapeTriple {
            level0,
            level1,
            level2,
            signal,
        }
    }

    fn build_level0(trimmed: &str, locale: &ProfileLocale) -> DPString {
        let mut out = DPString::with_capacity(trimmed.len() + 8);
        let mut run_class: Option<CharClass> = None;
        let mut run_len = 0;
        for c in trimmed.chars() {
            let class = locale.classify(c);
            match class {
                CharClass::Digit | CharClass::Alpha => {
                    if run_class == Some(class) {
                        run_len += 1;
                        continue;
                    }
                    if let Some(rc) = run_class {
                        push_run(&mut out, rc, run_len);
                    }
                    run_class = Some(class);
                    run_len = 1;
                }
                _ => {
                    if let Some(rc) = run_class {
                        push_run(&mut out, rc, run_len);
                        run_class = None;
                        run_len = 0;
                    }
                    match class {
                        CharClass::Minus => out.push('-'),
                        _ => push_escaped(&mut out, c),
                    }
                }
            }
        }
        if let Some(rc) = run_class {
            push_run(&mut out, rc, run_len);
        }
        out
    }

    fn build_level1(trimmed: &str, locale: &ProfileLocale, signal: &ShapeSignal) -> DPString {
        if signal.is_numeric {
            return DPString::from(numeric_level1(signal));
        }
        if signal.alphas > 0 && signal.alphas + signal.digits == trimmed.chars().count() {
            if signal.digits == 0 {
                return DPString::from(PATTERN_ALPHA_VARIABLE);
            }
            return format_compact!("\\p{{Alnum}}{{{}}}", signal.alphas + signal.digits);
        }
        // No registered general pattern applies: collapse run lengths to '+'.
        let mut out = DPString::with_capacity(trimmed.len() + 8);
        let mut run_class: Option<CharClass> = None;
        for c in trimmed.chars() {
            let class = locale.classify(c);
            match class {
                CharClass::Digit | CharClass::Alpha => {
                    if run_class == Some(class) {
                        continue;
                    }
                    push_collapsed_run(&mut out, class);
                    run_class = Some(class);
                }
                _ => {
                    run_class = None;
                    match class {
                        CharClass::Minus => out.push('-'),
                        _ => push_escaped(&mut out, c),
                    }
                }
            }
        }
        out
    }

    fn build_level2(signal: &ShapeSignal) -> DPString {
        if signal.is_numeric {
            return DPString::from(numeric_level2(signal));
        }
        if signal.alphas > 0 && signal.others == 0 {
            if signal.digits == 0 {
                return DPString::from(PATTERN_ALPHA_VARIABLE);
            }
            return DPString::from(PATTERN_ALNUM_VARIABLE);
        }
        DPString::from(PATTERN_ANY_VARIABLE)
    }

    ///
    /// Cheap pre-filter deciding whether a sample could plausibly be a
    /// date or time. The real verdict belongs to the format detector; this
    /// only keeps the window counter honest.
    ///
    pub fn could_be_datetime(trimmed: &str) -> bool {
        let len = trimmed.chars().count();
        if len < MIN_DATETIME_LENGTH || len > MAX_DATETIME_LENGTH {
            return false;
        }
        let mut digits = 0;
        let mut separators = 0;
        for c in trimmed.chars() {
            if c.is_ascii_digit() {
                digits += 1;
            } else if DATE_SEPARATORS.contains(c) {
                separators += 1;
            } else if !c.is_ascii_alphabetic() && c != '+' {
                return false;
            }
        }
        digits >= MIN_DATETIME_DIGITS && separators > 0
    }
}
