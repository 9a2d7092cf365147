//! URL query-string state for listing pages.
//!
//! The query string is the only place filter, sort, and pagination state
//! lives. [`QueryParams`] is an immutable, ordered key to multi-value map; every
//! mutation returns a new value, and every mutation that changes what is being
//! listed also drops the pagination keys, because a cursor from the old
//! result set is meaningless against the new one.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub const PRICE_KEY: &str = "price";
pub const AFTER_KEY: &str = "after";
pub const BEFORE_KEY: &str = "before";
pub const PAGE_KEY: &str = "page";
pub const SORT_KEY: &str = "sort";
pub const QUERY_KEY: &str = "query";
pub const COLLECTION_KEY: &str = "collection";

/// Keys with a fixed meaning; never read as facet labels.
pub const RESERVED_KEYS: [&str; 7] = [
    PRICE_KEY,
    AFTER_KEY,
    BEFORE_KEY,
    PAGE_KEY,
    SORT_KEY,
    QUERY_KEY,
    COLLECTION_KEY,
];

const PAGINATION_KEYS: [&str; 3] = [AFTER_KEY, BEFORE_KEY, PAGE_KEY];

/// `application/x-www-form-urlencoded` leaves these bytes unescaped.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

#[must_use]
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Ordered multi-valued query parameters. Keys are case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

/// Which side of the current page to move to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    After(String),
    Before(String),
}

impl QueryParams {
    /// Parses a raw query string, with or without a leading `?`.
    ///
    /// `+` decodes to a space and percent escapes are decoded as UTF-8
    /// (lossily). Empty segments are ignored; a segment without `=` is a key
    /// with an empty value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let pairs = raw
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
                (decode_component(key), decode_component(value))
            })
            .collect();
        Self { pairs }
    }

    #[must_use]
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// First value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `key`, in order.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    #[must_use]
    pub fn contains(&self, key: &str, value: &str) -> bool {
        self.pairs.iter().any(|(k, v)| k == key && v == value)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serializes back to `application/x-www-form-urlencoded`, without `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Replaces every value of `key` with a single `value`, keeping the
    /// position of the first occurrence.
    #[must_use]
    pub fn with_set(&self, key: &str, value: &str) -> Self {
        let mut pairs = Vec::with_capacity(self.pairs.len() + 1);
        let mut placed = false;
        for (k, v) in &self.pairs {
            if k == key {
                if !placed {
                    pairs.push((k.clone(), value.to_owned()));
                    placed = true;
                }
            } else {
                pairs.push((k.clone(), v.clone()));
            }
        }
        if !placed {
            pairs.push((key.to_owned(), value.to_owned()));
        }
        Self { pairs }
    }

    #[must_use]
    pub fn without_key(&self, key: &str) -> Self {
        self.without_keys(&[key])
    }

    fn without_keys(&self, keys: &[&str]) -> Self {
        Self {
            pairs: self
                .pairs
                .iter()
                .filter(|(k, _)| !keys.contains(&k.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Drops `after`, `before`, and `page`.
    #[must_use]
    pub fn without_pagination(&self) -> Self {
        self.without_keys(&PAGINATION_KEYS)
    }

    /// Changes the sort order; resets pagination.
    #[must_use]
    pub fn with_sort(&self, sort: &str) -> Self {
        self.with_set(SORT_KEY, sort).without_pagination()
    }

    /// Sets the `price=min,max` range; resets pagination.
    #[must_use]
    pub fn with_price_range(&self, min: f64, max: f64) -> Self {
        self.with_set(PRICE_KEY, &format!("{min},{max}"))
            .without_pagination()
    }

    /// Moves to an adjacent page, replacing any existing cursor and `page`.
    #[must_use]
    pub fn with_cursor(&self, cursor: &Cursor) -> Self {
        let base = self.without_pagination();
        match cursor {
            Cursor::After(c) => base.with_set(AFTER_KEY, c),
            Cursor::Before(c) => base.with_set(BEFORE_KEY, c),
        }
    }
}

/// Toggles one filter value and resets pagination.
///
/// If `value` is present under `key`, that single occurrence is removed;
/// otherwise it is appended. Other keys are untouched, except that `after`,
/// `before`, and `page` are always removed from the result.
#[must_use]
pub fn build_param_update(current: &QueryParams, key: &str, value: &str) -> QueryParams {
    let mut pairs = current.pairs.clone();
    match pairs.iter().position(|(k, v)| k == key && v == value) {
        Some(index) => {
            pairs.remove(index);
        }
        None => pairs.push((key.to_owned(), value.to_owned())),
    }
    QueryParams { pairs }.without_pagination()
}

/// Joins a path and query parameters into a relative URL.
#[must_use]
pub fn create_url(pathname: &str, params: &QueryParams) -> String {
    let query = params.to_query_string();
    if query.is_empty() {
        pathname.to_owned()
    } else {
        format!("{pathname}?{query}")
    }
}

/// A `FIELD-ORDER` sort parameter split into the API's sort key and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub sort_key: String,
    pub reverse: bool,
}

impl SortOrder {
    /// Default for collection listings.
    pub const COLLECTION_DEFAULT: &'static str = "CREATED-ASC";
    /// Default for search results.
    pub const SEARCH_DEFAULT: &'static str = "RELEVANCE-ASC";

    /// Parses `sort` (e.g. `"PRICE-DESC"`), falling back to `default` when
    /// absent or empty. Only `DESC` reverses; a missing order means ascending.
    #[must_use]
    pub fn from_param(sort: Option<&str>, default: &str) -> Self {
        let raw = sort.filter(|s| !s.trim().is_empty()).unwrap_or(default);
        let (field, order) = raw.split_once('-').unwrap_or((raw, "ASC"));
        Self {
            sort_key: field.trim().to_owned(),
            reverse: order.trim() == "DESC",
        }
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

fn encode_component(raw: &str) -> String {
    // Spaces become `+`; `+` itself was already escaped to `%2B`.
    utf8_percent_encode(raw, FORM_ENCODE_SET)
        .to_string()
        .replace("%20", "+")
}

#[cfg(test)]
#[path = "params_test.rs"]
mod tests;
