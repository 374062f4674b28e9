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

pub mod char_classes {
    use ::phf::Map;
    use ::phf_macros::phf_map;
    use dptk_core::core::DPResult;
    use dptk_core::strings::{format_compact, DPString};

    ///
    /// Coarse character classification. Every codepoint of every sample maps
    /// to exactly one of these before the shape compressor sees it.
    ///
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum CharClass {
        Digit,
        Alpha,
        DecimalSep,
        GroupSep,
        Minus,
        Other,
    }

    ///
    /// The slice of locale data the profiler actually consumes: number
    /// symbols, short month names and the day/month ordering convention.
    /// Anything fancier is out of scope.
    ///
    #[derive(Debug)]
    pub struct LocaleData {
        pub decimal_sep: char,
        pub group_sep: char,
        pub minus: char,
        pub day_first: bool,
        pub short_months: [&'static str; 12],
    }

    const EN_MONTHS: [&'static str; 12] = [
        "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
    ];
    const DE_MONTHS: [&'static str; 12] = [
        "JAN", "FEB", "MRZ", "APR", "MAI", "JUN", "JUL", "AUG", "SEP", "OKT", "NOV", "DEZ",
    ];
    const FR_MONTHS: [&'static str; 12] = [
        "JANV", "FEVR", "MARS", "AVR", "MAI", "JUIN", "JUIL", "AOUT", "SEPT", "OCT", "NOV", "DEC",
    ];
    const ES_MONTHS: [&'static str; 12] = [
        "ENE", "FEB", "MAR", "ABR", "MAY", "JUN", "JUL", "AGO", "SEP", "OCT", "NOV", "DIC",
    ];

    static LOCALES: Map<&'static str, LocaleData> = phf_map! {
        "en_US" => LocaleData {
            decimal_sep: '.',
            group_sep: ',',
            minus: '-',
            day_first: false,
            short_months: EN_MONTHS,
        },
        "en_GB" => LocaleData {
            decimal_sep: '.',
            group_sep: ',',
            minus: '-',
            day_first: true,
            short_months: EN_MONTHS,
        },
        "de_DE" => LocaleData {
            decimal_sep: ',',
            group_sep: '.',
            minus: '-',
            day_first: true,
            short_months: DE_MONTHS,
        },
        "fr_FR" => LocaleData {
            decimal_sep: ',',
            group_sep: ' ',
            minus: '-',
            day_first: true,
            short_months: FR_MONTHS,
        },
        "es_ES" => LocaleData {
            decimal_sep: ',',
            group_sep: '.',
            minus: '-',
            day_first: true,
            short_months: ES_MONTHS,
        },
    };

    pub const DEFAULT_LOCALE: &str = "en_US";

    ///
    /// Character classifier bound to one locale's number symbols.
    ///
    /// The profiler holds exactly one of these; it never changes once the
    /// first sample has been trained.
    ///
    #[derive(Debug)]
    pub struct ProfileLocale {
        tag: DPString,
        data: &'static LocaleData,
    }

    impl ProfileLocale {
        pub fn new(tag: &str) -> DPResult<ProfileLocale> {
            match LOCALES.get(tag) {
                Some(data) => Ok(ProfileLocale {
                    tag: DPString::from(tag),
                    data,
                }),
                None => Err(format_compact!("Unsupported locale: {}!", tag)),
            }
        }

        pub fn tag(&self) -> &str {
            self.tag.as_str()
        }

        pub fn day_first(&self) -> bool {
            self.data.day_first
        }

        pub fn decimal_sep(&self) -> char {
            self.data.decimal_sep
        }

        pub fn group_sep(&self) -> char {
            self.data.group_sep
        }

        ///
        /// Map one codepoint to its coarse class under this locale.
        ///
        #[inline(always)]
        pub fn classify(&self, c: char) -> CharClass {
            if c.is_ascii_digit() {
                return CharClass::Digit;
            }
            if c == self.data.decimal_sep {
                return CharClass::DecimalSep;
            }
            if c == self.data.group_sep {
                return CharClass::GroupSep;
            }
            if c == self.data.minus || c == '-' {
                return CharClass::Minus;
            }
            if c.is_alphabetic() {
                return CharClass::Alpha;
            }
            CharClass::Other
        }

        ///
        /// 1-based month number for a short month name, if the token is one.
        /// Comparison is uppercased; callers pass raw tokens.
        ///
        pub fn month_abbr_index(&self, token: &str) -> Option<u32> {
            let upper = token.to_uppercase();
            self.data
                .short_months
                .iter()
                .position(|m| *m == upper)
                .map(|i| (i + 1) as u32)
        }

        pub fn short_months(&self) -> &'static [&'static str; 12] {
            &self.data.short_months
        }

        ///
        /// Rewrite a numeric sample into parseable ASCII form: group
        /// separators dropped, the locale decimal separator replaced with
        /// `.`, the locale minus replaced with `-`.
        ///
        pub fn normalize_numeric(&self, sample: &str) -> DPString {
            let mut normalized = DPString::with_capacity(sample.len());
            for c in sample.chars() {
                match self.classify(c) {
                    CharClass::GroupSep => continue,
                    CharClass::DecimalSep => normalized.push('.'),
                    CharClass::Minus => normalized.push('-'),
                    _ => normalized.push(c),
                }
            }
            normalized
        }
    }

    impl Default for ProfileLocale {
        fn default() -> Self {
            // The default locale is always present in the table.
            ProfileLocale::new(DEFAULT_LOCALE).unwrap()
        }
    }
}
