pub mod dp_search {
    use crate::cache::{DPCache, Lazy};
    use crate::strings::{format_compact, DPString};
    use regex::Regex;
    use std::sync::Mutex;
    /**************************** Globals **************************************/
    static RE_CACHE: Lazy<Mutex<RegexCache>> = Lazy::new(|| Mutex::new(RegexCache::default()));

    /**************************** Constants**************************************/

    /**************************** Types *****************************************/
    pub type RegexCache = DPCache<DPString, Regex>;

    /**************************** Traits ****************************************/

    /**************************** Helpers ***************************************/

    ///
    /// Run a closure against the cached, compiled form of `expr`.
    /// Expressions are compiled once per process; the cache is safe for
    /// concurrent lookup-or-insert from many profilers.
    ///
    fn with_cached_regex<T>(expr: &str, action: impl FnOnce(&Regex) -> T) -> Option<T> {
        let mut cache = match RE_CACHE.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !cache.contains_key(expr) {
            let compiled = match Regex::new(expr) {
                Ok(re) => re,
                Err(_) => return None,
            };
            cache.insert(DPString::from(expr), compiled);
        }
        cache.get(expr).map(action)
    }

    ///
    /// Anchor an expression so it must span the entire input.
    ///
    fn anchor(expr: &str) -> DPString {
        format_compact!("^(?:{})$", expr)
    }

    ///
    /// Check whether `input` matches `expr` in its entirety.
    /// An expression that fails to compile matches nothing.
    ///
    /// # Example
    /// ```
    /// use ::dptk_core::search::dp_search::string_is_full_match;
    /// assert!(string_is_full_match("2010", r"\d{4}"));
    /// assert!(!string_is_full_match("20105", r"\d{4}"));
    /// ```
    ///
    pub fn string_is_full_match(input: &str, expr: &str) -> bool {
        with_cached_regex(&anchor(expr), |re| re.is_match(input)).unwrap_or(false)
    }

    ///
    /// Check whether an expression compiles at all. The profiler synthesizes
    /// pattern strings; a pattern it cannot compile indicates a bug upstream.
    ///
    pub fn expression_compiles(expr: &str) -> bool {
        with_cached_regex(&anchor(expr), |_| true).unwrap_or(false)
    }

    ///
    /// Collect every non-overlapping match of `expr` within `input`.
    ///
    pub fn string_search_list(input: &str, expr: &str) -> Vec<DPString> {
        with_cached_regex(expr, |re| {
            re.find_iter(input)
                .map(|m| DPString::from(m.as_str()))
                .collect()
        })
        .unwrap_or_default()
    }
}
