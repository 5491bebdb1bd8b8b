//! Course announcement page normalizer.

use scraper::{ElementRef, Html};

use mcv_mcp_core::Announcement;

use crate::html::{attr, first, inline_text, selector, text_of};

fn announcement_id(item: ElementRef<'_>) -> Option<String> {
    ["data-announcement-id", "data-id", "data-nid", "id"]
        .iter()
        .map(|name| attr(item, name).trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn posted_at(item: ElementRef<'_>) -> Option<String> {
    let time_sel = selector("time");
    let date_sel = selector(".announcement-date, .announcement-time, .date");

    if let Some(time) = first(item, &time_sel) {
        let stamp = match attr(time, "datetime").trim() {
            "" => text_of(time),
            datetime => datetime.to_string(),
        };
        if !stamp.is_empty() {
            return Some(stamp);
        }
    }

    first(item, &date_sel)
        .map(text_of)
        .filter(|text| !text.is_empty())
}

/// Announcements on a course announcement page, in page order.
///
/// Items without a title element are skipped; a missing body becomes an
/// empty string.
pub fn parse_announcements(html: &str, cv_cid: u64) -> Vec<Announcement> {
    let document = Html::parse_document(html);

    let item_sel = selector(".announcement-item, .cv-announcement, article");
    let title_sel = selector(".announcement-title, h3, h4, a");
    let content_sel = selector(".announcement-content, .content, p");

    document
        .select(&item_sel)
        .filter_map(|item| {
            let title = first(item, &title_sel)?;
            Some(Announcement {
                cv_cid,
                announcement_id: announcement_id(item),
                title: inline_text(title),
                content: first(item, &content_sel).map(text_of).unwrap_or_default(),
                posted_at: posted_at(item),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_announcements() {
        let html = r#"
            <div class="announcement-item" data-announcement-id="5501">
                <h4 class="announcement-title">Midterm room change</h4>
                <time datetime="2024-10-01 09:00:00">1 Oct</time>
                <div class="announcement-content">The midterm moves to ENG3-301.</div>
            </div>
            <div class="cv-announcement">
                <h3>No body</h3>
                <span class="date">2 Oct 2024</span>
            </div>
            <div class="cv-announcement"><span>No title</span></div>
        "#;

        let announcements = parse_announcements(html, 34567);
        assert_eq!(announcements.len(), 2);

        assert_eq!(announcements[0].announcement_id.as_deref(), Some("5501"));
        assert_eq!(announcements[0].title, "Midterm room change");
        assert_eq!(announcements[0].content, "The midterm moves to ENG3-301.");
        assert_eq!(announcements[0].posted_at.as_deref(), Some("2024-10-01 09:00:00"));
        assert_eq!(announcements[0].cv_cid, 34567);

        assert_eq!(announcements[1].announcement_id, None);
        assert_eq!(announcements[1].title, "No body");
        assert_eq!(announcements[1].content, "");
        assert_eq!(announcements[1].posted_at.as_deref(), Some("2 Oct 2024"));
    }

    #[test]
    fn test_no_announcements() {
        assert!(parse_announcements("<html><body></body></html>", 1).is_empty());
    }

    #[test]
    fn test_posted_at_kept_verbatim() {
        let html = r#"
            <article><h3>Quiz moved</h3><time> 3 Oct 2024,  10:00 </time></article>
            <article><h3>Room</h3><span class="announcement-date">4 Oct 2024
                (Fri)</span></article>
        "#;
        let announcements = parse_announcements(html, 1);
        assert_eq!(announcements[0].posted_at.as_deref(), Some("3 Oct 2024,  10:00"));
        assert_eq!(
            announcements[1].posted_at.as_deref(),
            Some("4 Oct 2024\n                (Fri)")
        );
    }
}
