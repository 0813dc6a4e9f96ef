use scraper::Html;
use url::Url;

use super::{selector, ScrapeError};

/// Absolute `href`s of the anchors inside every element matching
/// `container`, in document order with duplicates removed.
pub fn extract_links(html: &str, base_url: &str, container: &str) -> Result<Vec<String>, ScrapeError> {
    let document = Html::parse_document(html);
    let container_sel = selector(container)?;
    let anchor_sel = selector("a[href]")?;
    let base = Url::parse(base_url).ok();

    let mut links: Vec<String> = Vec::new();
    for element in document.select(&container_sel) {
        for anchor in element.select(&anchor_sel) {
            let Some(href) = anchor.value().attr("href").map(str::trim) else {
                continue;
            };
            if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
                continue;
            }
            let resolved = match &base {
                Some(base) => match base.join(href) {
                    Ok(url) => url.to_string(),
                    Err(_) => continue,
                },
                None => href.to_string(),
            };
            if !links.contains(&resolved) {
                links.push(resolved);
            }
        }
    }
    Ok(links)
}
