// src/models/gallery.rs

//! Domain entities for the gallery hierarchy.
//!
//! A numbered [`ListingPage`] enumerates [`GallerySet`]s, each of which owns
//! the [`ImageStub`]s found along its pagination chain. Stubs start
//! unresolved and gain a [`ResolvedImage`] exactly once.

use std::sync::OnceLock;

use regex::Regex;

use crate::utils;

/// A numbered listing page enumerating gallery sets.
#[derive(Debug, Clone)]
pub struct ListingPage {
    /// Page sequence number (1-based)
    pub number: u32,

    /// Full page URL derived from the listing template
    pub url: String,

    /// Sets found on this page, in document order
    pub sets: Vec<GallerySet>,
}

impl ListingPage {
    /// Create a page stub with its URL derived from `{root}/page-{n}.html`.
    pub fn new(number: u32, root_url: &str) -> Self {
        Self {
            number,
            url: format!("{}/page-{}.html", root_url.trim_end_matches('/'), number),
            sets: Vec::new(),
        }
    }
}

/// A named set of images reachable via a first-page URL.
#[derive(Debug, Clone)]
pub struct GallerySet {
    /// Set title as shown on the listing page (trimmed)
    pub title: String,

    /// URL of the set's first page
    pub url: String,

    /// Image stubs collected from the pagination chain
    pub images: Vec<ImageStub>,
}

impl GallerySet {
    /// Create a set stub with no images collected yet.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into().trim().to_string(),
            url: url.into(),
            images: Vec::new(),
        }
    }

    /// Directory name for this set, safe to use as a path component.
    pub fn dir_name(&self) -> String {
        sanitize_title(&self.title)
    }
}

/// A reference to an image's detail page, resolved lazily to its binary.
#[derive(Debug, Clone)]
pub struct ImageStub {
    /// URL of the image's detail page
    pub page_url: String,

    /// Binary URL and identifier, once resolved
    pub resolved: Option<ResolvedImage>,
}

impl ImageStub {
    /// Create an unresolved stub.
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            resolved: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// Record the resolved binary URL and identifier.
    ///
    /// A stub resolves at most once; later calls keep the first result.
    pub fn resolve(&mut self, resolved: ResolvedImage) {
        if self.resolved.is_none() {
            self.resolved = Some(resolved);
        }
    }
}

/// A resolved image with a known binary URL and numeric identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    /// Direct URL of the image binary
    pub binary_url: String,

    /// Numeric identifier taken from the detail page
    pub id: u64,
}

impl ResolvedImage {
    /// Destination file name: `{id}.{extension-from-binary-URL}`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.id, utils::file_extension(&self.binary_url))
    }
}

/// Replace path-unsafe characters in a set title with underscores.
///
/// Titles come straight from site markup and are used as directory names,
/// so separators, reserved punctuation, and control characters must go.
///
/// Distinct titles can collapse to the same directory name ("A/B" and
/// "A:B" both become "A_B"); colliding sets then share one directory and
/// one completion marker, and only the first of them is downloaded.
pub fn sanitize_title(title: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let unsafe_chars =
        UNSAFE.get_or_init(|| Regex::new(r#"[\\/:*?"<>|\x00-\x1f]+"#).expect("valid regex"));

    let cleaned = unsafe_chars.replace_all(title.trim(), "_");
    let cleaned = cleaned.trim_matches(|c| c == '.' || c == ' ');

    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned.to_string()
    }
}
