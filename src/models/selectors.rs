// src/models/selectors.rs

//! CSS selectors for scraping a gallery site.

use serde::{Deserialize, Serialize};

/// CSS selectors describing where the gallery markup keeps its fields.
///
/// The defaults match the common "picbox" gallery layout; every field can be
/// overridden from the config file for sites with different class names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GallerySelectors {
    /// Selector for each gallery entry on a listing page
    #[serde(default = "default_gallery_entry")]
    pub gallery_entry: String,

    /// Selector for the title element within a gallery entry
    #[serde(default = "default_entry_title")]
    pub entry_title: String,

    /// Selector for the link element within a gallery entry
    #[serde(default = "default_entry_link")]
    pub entry_link: String,

    /// Selector for image-detail links on a set page
    #[serde(default = "default_image_link")]
    pub image_link: String,

    /// Selector for anchors inside the pagination bar
    #[serde(default = "default_nav_link")]
    pub nav_link: String,

    /// Anchor text marking the "next page" link in the pagination bar
    #[serde(default = "default_next_label")]
    pub next_label: String,

    /// Selector for the full-size image tag on a detail page
    #[serde(default = "default_detail_image")]
    pub detail_image: String,

    /// Selector for the pipe-delimited identifier text on a detail page
    #[serde(default = "default_detail_id")]
    pub detail_id: String,

    /// HTML attribute name for extracting links (usually "href")
    #[serde(default = "default_attr_name")]
    pub attr_name: String,
}

fn default_gallery_entry() -> String {
    "div.picbox".to_string()
}

fn default_entry_title() -> String {
    "h4".to_string()
}

fn default_entry_link() -> String {
    "h4 a".to_string()
}

fn default_image_link() -> String {
    "div.image a".to_string()
}

fn default_nav_link() -> String {
    "div.imgpagebar a".to_string()
}

fn default_next_label() -> String {
    "Next Page".to_string()
}

fn default_detail_image() -> String {
    "div.imgbox img".to_string()
}

fn default_detail_id() -> String {
    "div.imgpagebar h2".to_string()
}

fn default_attr_name() -> String {
    "href".to_string()
}

impl Default for GallerySelectors {
    fn default() -> Self {
        Self {
            gallery_entry: default_gallery_entry(),
            entry_title: default_entry_title(),
            entry_link: default_entry_link(),
            image_link: default_image_link(),
            nav_link: default_nav_link(),
            next_label: default_next_label(),
            detail_image: default_detail_image(),
            detail_id: default_detail_id(),
            attr_name: default_attr_name(),
        }
    }
}

impl GallerySelectors {
    /// Selector fields that must be non-empty, paired with their config keys.
    pub fn required_fields(&self) -> [(&'static str, &str); 8] {
        [
            ("selectors.gallery_entry", &self.gallery_entry),
            ("selectors.entry_title", &self.entry_title),
            ("selectors.entry_link", &self.entry_link),
            ("selectors.image_link", &self.image_link),
            ("selectors.nav_link", &self.nav_link),
            ("selectors.detail_image", &self.detail_image),
            ("selectors.detail_id", &self.detail_id),
            ("selectors.attr_name", &self.attr_name),
        ]
    }
}
