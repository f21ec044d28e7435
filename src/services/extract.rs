// src/services/extract.rs

//! Markup extraction contract.
//!
//! Pure functions over a parsed document and the configured selector schema.
//! An absent field means "no data" (empty vec / `None`), never an error;
//! only an invalid selector string in the schema is an error.

use scraper::{Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{GallerySelectors, GallerySet, ImageStub, ResolvedImage};
use crate::utils::resolve_url;

/// Extract gallery entries (title + absolute first-page URL) from a listing
/// page. Entries missing a title or a link are dropped.
pub fn gallery_entries(
    document: &Html,
    selectors: &GallerySelectors,
    base: &Url,
) -> Result<Vec<GallerySet>> {
    let entry_sel = parse_selector(&selectors.gallery_entry)?;
    let title_sel = parse_selector(&selectors.entry_title)?;
    let link_sel = parse_selector(&selectors.entry_link)?;

    let mut sets = Vec::new();
    for entry in document.select(&entry_sel) {
        let Some(title_elem) = entry.select(&title_sel).next() else {
            continue;
        };
        let title: String = title_elem.text().collect();
        if title.trim().is_empty() {
            continue;
        }

        let Some(href) = entry
            .select(&link_sel)
            .next()
            .and_then(|e| e.value().attr(selectors.attr_name.as_str()))
        else {
            continue;
        };

        sets.push(GallerySet::new(title, resolve_url(base, href)));
    }
    Ok(sets)
}

/// Extract image-detail links from one page of a set's pagination chain.
pub fn image_links(
    document: &Html,
    selectors: &GallerySelectors,
    base: &Url,
) -> Result<Vec<ImageStub>> {
    let link_sel = parse_selector(&selectors.image_link)?;

    let stubs = document
        .select(&link_sel)
        .filter_map(|anchor| anchor.value().attr(selectors.attr_name.as_str()))
        .map(|href| ImageStub::new(resolve_url(base, href)))
        .collect();
    Ok(stubs)
}

/// Find the "next page" link in the pagination bar, if any.
///
/// The next link is the first nav anchor whose text contains the configured
/// label.
pub fn next_page(
    document: &Html,
    selectors: &GallerySelectors,
    base: &Url,
) -> Result<Option<String>> {
    let nav_sel = parse_selector(&selectors.nav_link)?;

    for anchor in document.select(&nav_sel) {
        let text: String = anchor.text().collect();
        if text.contains(&selectors.next_label) {
            if let Some(href) = anchor.value().attr(selectors.attr_name.as_str()) {
                return Ok(Some(resolve_url(base, href)));
            }
        }
    }
    Ok(None)
}

/// Extract the binary URL and numeric identifier from an image detail page.
///
/// The identifier is the first segment of a pipe-delimited text, trimmed and
/// parsed as a number. Returns `None` when either field is missing or the
/// identifier is not numeric; the image is then a recognized "not present"
/// case, not an error.
pub fn image_detail(
    document: &Html,
    selectors: &GallerySelectors,
    base: &Url,
) -> Result<Option<ResolvedImage>> {
    let image_sel = parse_selector(&selectors.detail_image)?;
    let id_sel = parse_selector(&selectors.detail_id)?;

    let Some(src) = document
        .select(&image_sel)
        .next()
        .and_then(|e| e.value().attr("src"))
    else {
        return Ok(None);
    };

    let Some(id_text) = document
        .select(&id_sel)
        .next()
        .map(|e| e.text().collect::<String>())
    else {
        return Ok(None);
    };

    let id = match id_text
        .split('|')
        .next()
        .map(str::trim)
        .and_then(|s| s.parse::<u64>().ok())
    {
        Some(id) => id,
        None => return Ok(None),
    };

    Ok(Some(ResolvedImage {
        binary_url: resolve_url(base, src),
        id,
    }))
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/gallery/").unwrap()
    }

    fn selectors() -> GallerySelectors {
        GallerySelectors::default()
    }

    #[test]
    fn test_gallery_entries() {
        let html = Html::parse_document(
            r#"
            <div class="picbox"><h4><a href="/alpha-1.html">  Alpha  </a></h4></div>
            <div class="picbox"><h4><a href="/beta-1.html">Beta</a></h4></div>
            <div class="picbox"><h4>No link here</h4></div>
            "#,
        );

        let sets = gallery_entries(&html, &selectors(), &base()).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].title, "Alpha");
        assert_eq!(sets[0].url, "https://example.com/alpha-1.html");
        assert_eq!(sets[1].title, "Beta");
    }

    #[test]
    fn test_gallery_entries_empty_page() {
        let html = Html::parse_document("<html><body><p>nothing</p></body></html>");
        let sets = gallery_entries(&html, &selectors(), &base()).unwrap();
        assert!(sets.is_empty());
    }

    #[test]
    fn test_image_links() {
        let html = Html::parse_document(
            r#"
            <div class="image"><a href="img-101.html"><img src="t1.jpg"></a></div>
            <div class="image"><a href="img-102.html"><img src="t2.jpg"></a></div>
            "#,
        );

        let stubs = image_links(&html, &selectors(), &base()).unwrap();
        assert_eq!(stubs.len(), 2);
        assert_eq!(stubs[0].page_url, "https://example.com/gallery/img-101.html");
        assert!(!stubs[0].is_resolved());
    }

    #[test]
    fn test_next_page_present() {
        let html = Html::parse_document(
            r#"
            <div class="imgpagebar">
                <a href="page-1.html">Prev Page</a>
                <a href="page-3.html">Next Page</a>
            </div>
            "#,
        );

        let next = next_page(&html, &selectors(), &base()).unwrap();
        assert_eq!(
            next,
            Some("https://example.com/gallery/page-3.html".to_string())
        );
    }

    #[test]
    fn test_next_page_absent_on_last_page() {
        let html = Html::parse_document(
            r#"<div class="imgpagebar"><a href="page-2.html">Prev Page</a></div>"#,
        );
        assert_eq!(next_page(&html, &selectors(), &base()).unwrap(), None);
    }

    #[test]
    fn test_image_detail() {
        let html = Html::parse_document(
            r#"
            <div class="imgbox"><img src="/files/101.jpg"></div>
            <div class="imgpagebar"><h2> 101 | 3 of 12 </h2></div>
            "#,
        );

        let resolved = image_detail(&html, &selectors(), &base()).unwrap().unwrap();
        assert_eq!(resolved.id, 101);
        assert_eq!(resolved.binary_url, "https://example.com/files/101.jpg");
    }

    #[test]
    fn test_image_detail_missing_image_tag() {
        let html = Html::parse_document(
            r#"<div class="imgpagebar"><h2>101 | 3 of 12</h2></div>"#,
        );
        assert!(image_detail(&html, &selectors(), &base()).unwrap().is_none());
    }

    #[test]
    fn test_image_detail_non_numeric_id() {
        let html = Html::parse_document(
            r#"
            <div class="imgbox"><img src="/files/101.jpg"></div>
            <div class="imgpagebar"><h2>abc | 3 of 12</h2></div>
            "#,
        );
        assert!(image_detail(&html, &selectors(), &base()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_selector_is_error() {
        let mut bad = selectors();
        bad.gallery_entry = "[[invalid".to_string();
        let html = Html::parse_document("<div></div>");
        assert!(gallery_entries(&html, &bad, &base()).is_err());
    }
}
