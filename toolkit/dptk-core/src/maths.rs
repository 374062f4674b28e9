use std::ops::Range;

const BASE_TEN: u64 = 10;

///
/// Power-of-ten factor for a given decimal place. Used when slicing fixed
/// width digit fields out of a larger integer, e.g. extracting the year from
/// a yyyyMMdd value.
///
pub fn generate_tenth_factor(tenth_place: u32) -> u64 {
    let mut factor: u64 = 1;
    let irange = Range {
        start: 0,
        end: tenth_place,
    };
    for _i in irange {
        factor *= BASE_TEN;
    }
    factor
}

///
/// Number of decimal digits needed to print the given non-negative value.
///
pub fn count_digits(value: i64) -> u32 {
    let mut digits: u32 = 1;
    let mut remainder = value.abs() / (BASE_TEN as i64);
    while remainder > 0 {
        digits += 1;
        remainder /= BASE_TEN as i64;
    }
    digits
}
