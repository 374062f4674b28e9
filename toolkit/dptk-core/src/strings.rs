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
use chardetng::EncodingDetector;
pub use compact_str::{format_compact, CompactString, CompactStringExt, ToCompactString};
use encoding_rs::Encoding;
use unicode_segmentation::UnicodeSegmentation;

/**************************** Constants**************************************/
const MIN_ASCII_READABLE: char = ' ';
const MAX_ASCII_READABLE: char = '~';
pub const EMPTY_STRING: &str = "";

/**************************** Types *****************************************/
pub type DPString = CompactString;

/**************************** Traits ****************************************/

pub trait AsStr {
    fn as_str(&self) -> &str;
}

pub trait DPStringConversions: ToString {
    fn to_dpstring(&self) -> DPString {
        DPString::from(self.to_string())
    }

    fn to_raw(&self) -> Vec<u8> {
        self.to_string().as_bytes().to_vec()
    }
}

///
/// Sample-oriented helpers shared by the shape compressor, the date format
/// detector and the streaming tracker. Every profiled value passes through
/// these before anything downstream looks at it.
///
pub trait SampleStringExtensions {
    fn as_sample(&self) -> &str;

    ///
    /// A blank sample is any sample whose trimmed length is 0.
    ///
    #[inline(always)]
    fn is_blank(&self) -> bool {
        self.as_sample().trim().is_empty()
    }

    ///
    /// Length of the sample after trimming outer whitespace.
    ///
    #[inline(always)]
    fn trimmed_len(&self) -> usize {
        self.as_sample().trim().chars().count()
    }

    ///
    /// Whether the sample contains any codepoint that could never appear in a
    /// recognized date/time format. Control characters and anything outside
    /// the printable ASCII window count as junk.
    ///
    #[inline(always)]
    fn has_junk(&self) -> bool {
        self.as_sample()
            .chars()
            .any(|c| c < MIN_ASCII_READABLE || c > MAX_ASCII_READABLE)
    }

    ///
    /// Uppercase + trim normalization applied on every reference-set lookup.
    ///
    #[inline(always)]
    fn to_lookup_key(&self) -> DPString {
        DPString::from(self.as_sample().trim().to_uppercase())
    }

    ///
    /// Whether the sample is a digit string carrying a redundant leading zero.
    ///
    #[inline(always)]
    fn has_leading_zero(&self) -> bool {
        let trimmed = self.as_sample().trim();
        trimmed.len() > 1 && trimmed.starts_with('0')
    }

    ///
    /// Whether every codepoint of the trimmed sample is an ASCII digit.
    ///
    #[inline(always)]
    fn is_all_digits(&self) -> bool {
        let trimmed = self.as_sample().trim();
        !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
    }

    ///
    /// The final whitespace-delimited token of the sample, if any.
    /// The address detector inspects this for street-type markers.
    ///
    #[inline(always)]
    fn last_token(&self) -> &str {
        self.as_sample()
            .trim()
            .rsplit(char::is_whitespace)
            .next()
            .unwrap_or(EMPTY_STRING)
    }

    fn count_graphemes(&self) -> usize;
}

impl SampleStringExtensions for DPString {
    #[inline(always)]
    fn as_sample(&self) -> &str {
        self.as_str()
    }

    #[inline(always)]
    fn count_graphemes(&self) -> usize {
        self.graphemes(true).count()
    }
}

impl SampleStringExtensions for str {
    #[inline(always)]
    fn as_sample(&self) -> &str {
        self
    }

    #[inline(always)]
    fn count_graphemes(&self) -> usize {
        self.graphemes(true).count()
    }
}

impl DPStringConversions for DPString {}
impl AsStr for DPString {
    fn as_str(&self) -> &str {
        self.as_str()
    }
}

impl DPStringConversions for str {}
impl AsStr for str {
    fn as_str(&self) -> &str {
        self
    }
}

impl DPStringConversions for char {}
impl DPStringConversions for i64 {}
impl DPStringConversions for f64 {}
impl DPStringConversions for u64 {}

pub trait DPArrayConversions {
    fn to_dpstring(&self) -> DPString;
}

impl DPArrayConversions for Vec<u8> {
    fn to_dpstring(&self) -> DPString {
        self.as_slice().to_dpstring()
    }
}

impl DPArrayConversions for &[u8] {
    fn to_dpstring(&self) -> DPString {
        match DPString::from_utf8(self) {
            Ok(s) => s,
            Err(_) => try_decode(self),
        }
    }
}

/**************************** Helpers ***************************************/

///
/// Implements decoding this string from its auto-detected encoding to UTF-8.
/// Failing that we assume the string was encoded in UTF-8 and return a lossy
/// copy.
///
/// Note => Decoding is facilitated via the crates chardet-ng and encoding_rs.
///
pub fn try_decode(src: &[u8]) -> DPString {
    let mut detector = EncodingDetector::new();
    detector.feed(src, true);
    let encoding = detector.guess(None, true);
    decode(src, encoding)
}

///
/// Implements decoding this string from a specific encoding to UTF-8.
///
pub fn try_decode_with(src: &[u8], encoding_name: &str) -> DPString {
    let encoding = match Encoding::for_label(encoding_name.as_bytes()) {
        Some(v) => v,
        None => return DPString::from(EMPTY_STRING),
    };
    decode(src, encoding)
}

///
/// Implements decoding of input with encoder.
///
fn decode(src: &[u8], encoding: &'static Encoding) -> DPString {
    match encoding.decode_without_bom_handling_and_without_replacement(src) {
        Some(res) => DPString::from(res.as_ref()),
        None => DPString::from(String::from_utf8_lossy(src).as_ref()),
    }
}

///
/// Removes characters from string per closure.
///
pub fn filter_chars(unfiltered: &str, closure: fn(char) -> bool) -> DPString {
    let mut filtered = unfiltered.to_dpstring();
    filtered.retain(closure);
    filtered
}

///
/// Removes all non printable, non ASCII characters from string.
///
pub fn filter_non_printable_ascii(unfiltered: &str) -> DPString {
    filter_chars(unfiltered, |c: char| {
        MIN_ASCII_READABLE <= c && c <= MAX_ASCII_READABLE
    })
}
