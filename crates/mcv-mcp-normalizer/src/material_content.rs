//! Material view page normalizer.

use scraper::Html;

use mcv_mcp_core::MaterialContent;

use crate::html::{attr, inline_text, selector};

/// Extract the title and download link from a material view page.
///
/// Files are usually hosted on S3: an S3 link is taken first, an embedded S3
/// iframe overrides it, and as a last resort any link mentioning a download
/// is used. `download_url` stays empty when nothing matches.
pub fn parse_material_content(
    html: &str,
    cv_cid: u64,
    material_node_id: u64,
    page_url: &str,
) -> MaterialContent {
    let document = Html::parse_document(html);

    let title_sel = selector(".cv-course-material-view-title");
    let title = document
        .select(&title_sel)
        .next()
        .map(inline_text)
        .unwrap_or_default();

    let s3_link_sel = selector("a[href*='s3.']");
    let aws_link_sel = selector("a[href*='amazonaws.com']");
    let s3_frame_sel = selector("iframe[src*='s3.']");
    let aws_frame_sel = selector("iframe[src*='amazonaws.com']");

    let mut download_url = document
        .select(&s3_link_sel)
        .next()
        .or_else(|| document.select(&aws_link_sel).next())
        .map(|a| attr(a, "href").to_string())
        .unwrap_or_default();

    if let Some(frame) = document
        .select(&s3_frame_sel)
        .next()
        .or_else(|| document.select(&aws_frame_sel).next())
    {
        download_url = attr(frame, "src").to_string();
    }

    if download_url.is_empty() {
        let any_link_sel = selector("a");
        download_url = document
            .select(&any_link_sel)
            .map(|a| attr(a, "href"))
            .find(|href| {
                href.to_lowercase().contains("download")
                    || href.contains("s3")
                    || href.contains("amazonaws")
            })
            .unwrap_or_default()
            .to_string();
    }

    MaterialContent {
        cv_cid,
        material_node_id,
        title,
        download_url,
        page_url: page_url.to_string(),
    }
}
