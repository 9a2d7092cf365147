//! Cursor window selection for listing pages.
//!
//! The Storefront API paginates forward with `first`/`after` and backward with
//! `last`/`before`. Which pair a request uses is decided entirely by the
//! cursor keys present in the query string:
//!
//! ```text
//! ?after=CURSOR    ->  first: 16, after: CURSOR
//! ?before=CURSOR   ->  last: 16,  before: CURSOR
//! (neither)        ->  first: 16
//! ```

use serde_json::{Map, Value};

use crate::params::{Cursor, QueryParams, AFTER_KEY, BEFORE_KEY};
use crate::types::PageInfo;

/// Products per listing page.
pub const PAGE_SIZE: u32 = 16;

/// Page size used when walking the whole catalog.
pub const CATALOG_WALK_PAGE_SIZE: u32 = 250;

/// Upper bound on pages fetched by a catalog walk.
pub(crate) const MAX_PAGES: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageWindow {
    First { first: u32, after: Option<String> },
    Last { last: u32, before: String },
}

impl PageWindow {
    /// `after` wins when both cursors are present.
    #[must_use]
    pub fn from_params(params: &QueryParams) -> Self {
        Self::from_cursors(params.get(AFTER_KEY), params.get(BEFORE_KEY), PAGE_SIZE)
    }

    #[must_use]
    pub fn from_cursors(after: Option<&str>, before: Option<&str>, size: u32) -> Self {
        let after = after.filter(|c| !c.is_empty());
        let before = before.filter(|c| !c.is_empty());
        match (after, before) {
            (Some(after), _) => Self::First {
                first: size,
                after: Some(after.to_owned()),
            },
            (None, Some(before)) => Self::Last {
                last: size,
                before: before.to_owned(),
            },
            (None, None) => Self::First {
                first: size,
                after: None,
            },
        }
    }

    /// Writes `first`/`after` or `last`/`before` into a variables object.
    pub fn apply(&self, variables: &mut Map<String, Value>) {
        match self {
            Self::First { first, after } => {
                variables.insert("first".to_owned(), Value::from(*first));
                if let Some(after) = after {
                    variables.insert("after".to_owned(), Value::from(after.as_str()));
                }
            }
            Self::Last { last, before } => {
                variables.insert("last".to_owned(), Value::from(*last));
                variables.insert("before".to_owned(), Value::from(before.as_str()));
            }
        }
    }
}

impl PageInfo {
    /// Cursor for the following page, if there is one.
    #[must_use]
    pub fn next_cursor(&self) -> Option<Cursor> {
        if !self.has_next_page {
            return None;
        }
        self.end_cursor.clone().map(Cursor::After)
    }

    /// Cursor for the preceding page, if there is one.
    #[must_use]
    pub fn previous_cursor(&self) -> Option<Cursor> {
        if !self.has_previous_page {
            return None;
        }
        self.start_cursor.clone().map(Cursor::Before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(window: &PageWindow) -> Value {
        let mut map = Map::new();
        window.apply(&mut map);
        Value::Object(map)
    }

    #[test]
    fn no_cursor_is_first_page() {
        let window = PageWindow::from_params(&QueryParams::parse("Brand=Nike"));
        assert_eq!(vars(&window), serde_json::json!({"first": 16}));
    }

    #[test]
    fn after_cursor_pages_forward() {
        let window = PageWindow::from_params(&QueryParams::parse("after=abc"));
        assert_eq!(vars(&window), serde_json::json!({"first": 16, "after": "abc"}));
    }

    #[test]
    fn before_cursor_pages_backward() {
        let window = PageWindow::from_params(&QueryParams::parse("before=xyz"));
        assert_eq!(vars(&window), serde_json::json!({"last": 16, "before": "xyz"}));
    }

    #[test]
    fn after_wins_over_before() {
        let window = PageWindow::from_params(&QueryParams::parse("before=xyz&after=abc"));
        assert!(matches!(window, PageWindow::First { after: Some(ref a), .. } if a == "abc"));
    }

    #[test]
    fn empty_cursor_is_ignored() {
        let window = PageWindow::from_params(&QueryParams::parse("after=&before="));
        assert_eq!(window, PageWindow::First { first: PAGE_SIZE, after: None });
    }

    #[test]
    fn page_info_cursors_respect_flags() {
        let info = PageInfo {
            has_next_page: true,
            has_previous_page: false,
            start_cursor: Some("s".to_owned()),
            end_cursor: Some("e".to_owned()),
        };
        assert_eq!(info.next_cursor(), Some(Cursor::After("e".to_owned())));
        assert_eq!(info.previous_cursor(), None);
    }

    #[test]
    fn page_info_without_cursor_has_no_link() {
        let info = PageInfo {
            has_next_page: true,
            ..PageInfo::default()
        };
        assert_eq!(info.next_cursor(), None);
    }
}
