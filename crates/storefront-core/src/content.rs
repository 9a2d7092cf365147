//! Online-store content: navigation menus, pages and metaobjects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Image, Seo};

/// A navigation link. Links into the store carry a site-relative `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub title: String,
    pub url: String,
    pub path: String,
    pub items: Vec<MenuItem>,
}

/// A content page such as "About" or "Shipping policy".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub handle: String,
    pub title: String,
    /// Page body as HTML.
    pub body: String,
    pub body_summary: String,
    pub seo: Seo,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Page {
    /// Title for the document head, preferring the SEO override.
    #[must_use]
    pub fn meta_title(&self) -> &str {
        self.seo
            .title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(&self.title)
    }
}

/// A merchant-defined entry, e.g. one slide of an announcement carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metaobject {
    pub handle: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub fields: Vec<MetaobjectField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaobjectField {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Option<String>,
    /// Set when the field references a media image.
    pub image: Option<Image>,
}

impl Metaobject {
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&MetaobjectField> {
        self.fields.iter().find(|field| field.key == key)
    }

    /// The field's text value, if it has one.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(|field| field.value.as_deref())
    }
}
