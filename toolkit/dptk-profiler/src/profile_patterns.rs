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

pub mod pattern_registry {
    use crate::profile_constants::*;
    use dptk_core::cache::{DPCache, Lazy};
    use dptk_core::strings::{format_compact, DPString};
    use serde::Serialize;

    /**************************** Types *****************************************/

    ///
    /// The base semantic types a column can resolve to.
    ///
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub enum SemanticType {
        Boolean,
        Long,
        Double,
        LocalDate,
        LocalTime,
        LocalDateTime,
        ZonedDateTime,
        OffsetDateTime,
        String,
    }

    impl SemanticType {
        pub fn as_str(&self) -> &'static str {
            match self {
                SemanticType::Boolean => "Boolean",
                SemanticType::Long => "Long",
                SemanticType::Double => "Double",
                SemanticType::LocalDate => "LocalDate",
                SemanticType::LocalTime => "LocalTime",
                SemanticType::LocalDateTime => "LocalDateTime",
                SemanticType::ZonedDateTime => "ZonedDateTime",
                SemanticType::OffsetDateTime => "OffsetDateTime",
                SemanticType::String => "String",
            }
        }

        pub fn is_numeric(&self) -> bool {
            matches!(self, SemanticType::Long | SemanticType::Double)
        }

        pub fn is_date_time(&self) -> bool {
            matches!(
                self,
                SemanticType::LocalDate
                    | SemanticType::LocalTime
                    | SemanticType::LocalDateTime
                    | SemanticType::ZonedDateTime
                    | SemanticType::OffsetDateTime
            )
        }
    }

    ///
    /// Optional refinement over a base semantic type.
    ///
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub enum TypeQualifier {
        Signed,
        Zip,
        UsState,
        CaProvince,
        NaState,
        Country,
        MonthAbbr,
        Gender,
        Email,
        Url,
        Address,
        Null,
        Blank,
        BlankOrNull,
    }

    impl TypeQualifier {
        pub fn as_str(&self) -> &'static str {
            match self {
                TypeQualifier::Signed => "SIGNED",
                TypeQualifier::Zip => "ZIP",
                TypeQualifier::UsState => "US_STATE",
                TypeQualifier::CaProvince => "CA_PROVINCE",
                TypeQualifier::NaState => "NA_STATE",
                TypeQualifier::Country => "COUNTRY",
                TypeQualifier::MonthAbbr => "MONTHABBR",
                TypeQualifier::Gender => "GENDER",
                TypeQualifier::Email => "EMAIL",
                TypeQualifier::Url => "URL",
                TypeQualifier::Address => "ADDRESS",
                TypeQualifier::Null => "NULL",
                TypeQualifier::Blank => "BLANK",
                TypeQualifier::BlankOrNull => "BLANKORNULL",
            }
        }
    }

    ///
    /// One registered pattern shape. Structural entries are keyed by their
    /// regexp; logical entries by `<type>.<qualifier>`.
    ///
    #[derive(Debug, Clone)]
    pub struct PatternEntry {
        pub regexp: &'static str,
        pub base_type: SemanticType,
        pub qualifier: Option<TypeQualifier>,
        pub min_length: usize,
        pub max_length: usize,
        pub general_pattern: Option<&'static str>,
        pub format: Option<&'static str>,
    }

    ///
    /// Immutable registry of known shapes. Insertion order is meaningful:
    /// frequency ties during type determination resolve to the earlier entry.
    ///
    #[derive(Debug)]
    pub struct PatternRegistry {
        entries: Vec<PatternEntry>,
        by_key: DPCache<DPString, usize>,
    }

    impl PatternRegistry {
        fn new() -> PatternRegistry {
            PatternRegistry {
                entries: Vec::with_capacity(24),
                by_key: DPCache::with_capacity(24),
            }
        }

        fn register(&mut self, key: DPString, entry: PatternEntry) {
            let index = self.entries.len();
            self.entries.push(entry);
            self.by_key.insert(key, index);
        }

        fn register_structural(&mut self, entry: PatternEntry) {
            self.register(DPString::from(entry.regexp), entry);
        }

        fn register_logical(&mut self, entry: PatternEntry) {
            let key = logical_key(
                entry.base_type,
                entry.qualifier.expect("logical entries carry a qualifier"),
            );
            self.register(key, entry);
        }

        ///
        /// Look up a structural entry by its exact pattern string.
        ///
        pub fn get(&self, pattern: &str) -> Option<&PatternEntry> {
            self.by_key.get(pattern).map(|i| &self.entries[*i])
        }

        ///
        /// Look up a logical entry by base type and qualifier.
        ///
        pub fn get_logical(
            &self,
            base_type: SemanticType,
            qualifier: TypeQualifier,
        ) -> Option<&PatternEntry> {
            self.by_key
                .get(&logical_key(base_type, qualifier))
                .map(|i| &self.entries[*i])
        }

        ///
        /// Position of a pattern in insertion order; unknown patterns sort last.
        ///
        pub fn insertion_rank(&self, pattern: &str) -> usize {
            self.by_key
                .get(pattern)
                .copied()
                .unwrap_or(self.entries.len())
        }

        pub fn is_known(&self, pattern: &str) -> bool {
            self.by_key.contains_key(pattern)
        }
    }

    fn logical_key(base_type: SemanticType, qualifier: TypeQualifier) -> DPString {
        format_compact!("{}.{}", base_type.as_str(), qualifier.as_str())
    }

    /**************************** Globals ***************************************/

    pub static REGISTRY: Lazy<PatternRegistry> = Lazy::new(|| {
        let mut registry = PatternRegistry::new();
        registry.register_structural(PatternEntry {
            regexp: PATTERN_BOOLEAN_TRUE_FALSE,
            base_type: SemanticType::Boolean,
            qualifier: None,
            min_length: 4,
            max_length: 5,
            general_pattern: None,
            format: None,
        });
        registry.register_structural(PatternEntry {
            regexp: PATTERN_BOOLEAN_YES_NO,
            base_type: SemanticType::Boolean,
            qualifier: None,
            min_length: 2,
            max_length: 3,
            general_pattern: None,
            format: None,
        });
        registry.register_structural(PatternEntry {
            regexp: PATTERN_LONG,
            base_type: SemanticType::Long,
            qualifier: None,
            min_length: 1,
            max_length: usize::MAX,
            general_pattern: Some(PATTERN_SIGNED_LONG),
            format: None,
        });
        registry.register_structural(PatternEntry {
            regexp: PATTERN_SIGNED_LONG,
            base_type: SemanticType::Long,
            qualifier: Some(TypeQualifier::Signed),
            min_length: 1,
            max_length: usize::MAX,
            general_pattern: None,
            format: None,
        });
        registry.register_structural(PatternEntry {
            regexp: PATTERN_DOUBLE,
            base_type: SemanticType::Double,
            qualifier: None,
            min_length: 1,
            max_length: usize::MAX,
            general_pattern: Some(PATTERN_SIGNED_DOUBLE),
            format: None,
        });
        registry.register_structural(PatternEntry {
            regexp: PATTERN_SIGNED_DOUBLE,
            base_type: SemanticType::Double,
            qualifier: Some(TypeQualifier::Signed),
            min_length: 1,
            max_length: usize::MAX,
            general_pattern: None,
            format: None,
        });
        registry.register_structural(PatternEntry {
            regexp: PATTERN_DOUBLE_WITH_EXPONENT,
            base_type: SemanticType::Double,
            qualifier: None,
            min_length: 1,
            max_length: usize::MAX,
            general_pattern: Some(PATTERN_SIGNED_DOUBLE_WITH_EXPONENT),
            format: None,
        });
        registry.register_structural(PatternEntry {
            regexp: PATTERN_SIGNED_DOUBLE_WITH_EXPONENT,
            base_type: SemanticType::Double,
            qualifier: Some(TypeQualifier::Signed),
            min_length: 1,
            max_length: usize::MAX,
            general_pattern: None,
            format: None,
        });
        registry.register_structural(PatternEntry {
            regexp: PATTERN_ALPHA_VARIABLE,
            base_type: SemanticType::String,
            qualifier: None,
            min_length: 1,
            max_length: usize::MAX,
            general_pattern: None,
            format: None,
        });
        registry.register_structural(PatternEntry {
            regexp: PATTERN_ALNUM_VARIABLE,
            base_type: SemanticType::String,
            qualifier: None,
            min_length: 1,
            max_length: usize::MAX,
            general_pattern: None,
            format: None,
        });
        registry.register_structural(PatternEntry {
            regexp: PATTERN_ANY_VARIABLE,
            base_type: SemanticType::String,
            qualifier: None,
            min_length: 1,
            max_length: usize::MAX,
            general_pattern: None,
            format: None,
        });
        registry.register_structural(PatternEntry {
            regexp: PATTERN_BOOLEAN_ZERO_ONE,
            base_type: SemanticType::Boolean,
            qualifier: None,
            min_length: 1,
            max_length: 1,
            general_pattern: None,
            format: None,
        });
        // Logical types, keyed by <type>.<qualifier>.
        registry.register_logical(PatternEntry {
            regexp: PATTERN_ZIP,
            base_type: SemanticType::Long,
            qualifier: Some(TypeQualifier::Zip),
            min_length: 5,
            max_length: 5,
            general_pattern: None,
            format: None,
        });
        registry.register_logical(PatternEntry {
            regexp: PATTERN_STATE,
            base_type: SemanticType::String,
            qualifier: Some(TypeQualifier::UsState),
            min_length: 2,
            max_length: 2,
            general_pattern: None,
            format: None,
        });
        registry.register_logical(PatternEntry {
            regexp: PATTERN_STATE,
            base_type: SemanticType::String,
            qualifier: Some(TypeQualifier::CaProvince),
            min_length: 2,
            max_length: 2,
            general_pattern: None,
            format: None,
        });
        registry.register_logical(PatternEntry {
            regexp: PATTERN_STATE,
            base_type: SemanticType::String,
            qualifier: Some(TypeQualifier::NaState),
            min_length: 2,
            max_length: 2,
            general_pattern: None,
            format: None,
        });
        registry.register_logical(PatternEntry {
            regexp: PATTERN_ANY_VARIABLE,
            base_type: SemanticType::String,
            qualifier: Some(TypeQualifier::Country),
            min_length: 1,
            max_length: usize::MAX,
            general_pattern: None,
            format: None,
        });
        registry.register_logical(PatternEntry {
            regexp: PATTERN_MONTH_ABBR,
            base_type: SemanticType::String,
            qualifier: Some(TypeQualifier::MonthAbbr),
            min_length: 3,
            max_length: 3,
            general_pattern: None,
            format: None,
        });
        registry.register_logical(PatternEntry {
            regexp: "(?i)(F|FEMALE|M|MALE|UNKNOWN)",
            base_type: SemanticType::String,
            qualifier: Some(TypeQualifier::Gender),
            min_length: 1,
            max_length: 7,
            general_pattern: None,
            format: None,
        });
        registry.register_logical(PatternEntry {
            regexp: PATTERN_ANY_VARIABLE,
            base_type: SemanticType::String,
            qualifier: Some(TypeQualifier::Email),
            min_length: 3,
            max_length: usize::MAX,
            general_pattern: None,
            format: None,
        });
        registry.register_logical(PatternEntry {
            regexp: PATTERN_ANY_VARIABLE,
            base_type: SemanticType::String,
            qualifier: Some(TypeQualifier::Url),
            min_length: 4,
            max_length: usize::MAX,
            general_pattern: None,
            format: None,
        });
        registry.register_logical(PatternEntry {
            regexp: PATTERN_ANY_VARIABLE,
            base_type: SemanticType::String,
            qualifier: Some(TypeQualifier::Address),
            min_length: 1,
            max_length: usize::MAX,
            general_pattern: None,
            format: None,
        });
        registry
    });

    /**************************** Promotion lattice *****************************/

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct NumericShape {
        signed: bool,
        double: bool,
        exponent: bool,
    }

    fn decompose(pattern: &str) -> Option<NumericShape> {
        match pattern {
            PATTERN_LONG => Some(NumericShape {
                signed: false,
                double: false,
                exponent: false,
            }),
            PATTERN_SIGNED_LONG => Some(NumericShape {
                signed: true,
                double: false,
                exponent: false,
            }),
            PATTERN_DOUBLE => Some(NumericShape {
                signed: false,
                double: true,
                exponent: false,
            }),
            PATTERN_SIGNED_DOUBLE => Some(NumericShape {
                signed: true,
                double: true,
                exponent: false,
            }),
            PATTERN_DOUBLE_WITH_EXPONENT => Some(NumericShape {
                signed: false,
                double: true,
                exponent: true,
            }),
            PATTERN_SIGNED_DOUBLE_WITH_EXPONENT => Some(NumericShape {
                signed: true,
                double: true,
                exponent: true,
            }),
            _ => None,
        }
    }

    fn compose(shape: NumericShape) -> &'static str {
        match (shape.signed, shape.double, shape.exponent) {
            (false, false, _) => PATTERN_LONG,
            (true, false, _) => PATTERN_SIGNED_LONG,
            (false, true, false) => PATTERN_DOUBLE,
            (true, true, false) => PATTERN_SIGNED_DOUBLE,
            (false, true, true) => PATTERN_DOUBLE_WITH_EXPONENT,
            (true, true, true) => PATTERN_SIGNED_DOUBLE_WITH_EXPONENT,
        }
    }

    pub fn is_numeric_pattern(pattern: &str) -> bool {
        decompose(pattern).is_some()
    }

    ///
    /// Join of two numeric patterns in the promotion lattice. The join is
    /// commutative and idempotent; non-numeric inputs have no join.
    ///
    pub fn promote(left: &str, right: &str) -> Option<&'static str> {
        let l = decompose(left)?;
        let r = decompose(right)?;
        Some(compose(NumericShape {
            signed: l.signed || r.signed,
            double: l.double || r.double,
            exponent: l.exponent || r.exponent,
        }))
    }
}
