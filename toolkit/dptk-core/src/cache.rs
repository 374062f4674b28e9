pub use ahash::{AHashMap, AHashSet};
pub use once_cell::sync::Lazy;

/**************************** Constants**************************************/

/**************************** Types *****************************************/

///
/// Generic Cache store object. One use case is to use a date/time format
/// string as the key and store the compiled format descriptor here.
///
pub type DPCache<K, V> = AHashMap<K, V>;

///
/// Read-only lookup set. The reference-data loaders expose their contents as
/// one of these.
///
pub type DPSet<K> = AHashSet<K>;

/**************************** Traits ****************************************/

/**************************** Helpers ***************************************/
