//! Course material listing normalizer.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html};
use url::Url;

use mcv_mcp_core::Material;

use crate::html::{absolute_url, attr, first, inline_text, selector};

lazy_static! {
    static ref NODE_ID: Regex = Regex::new(r"view_content_node_([0-9]+)").unwrap();
}

fn node_id(href: &str) -> Option<u64> {
    NODE_ID.captures(href).and_then(|caps| caps[1].parse().ok())
}

/// Materials listed on a course home page.
///
/// Folder containers are read first; loose material links elsewhere on the
/// page are appended unless already listed. Returns an empty list when the
/// page has neither, in which case the dedicated material page
/// ([`parse_material_page`]) is the next place to look.
pub fn parse_course_materials(html: &str, cv_cid: u64, base: &Url) -> Vec<Material> {
    let document = Html::parse_document(html);
    let mut materials: Vec<Material> = Vec::new();

    let folder_sel = selector(".cv-course-material-folder-container, .courseville-material-folder");
    let header_sel = selector(".cv-course-material-folder-header, .folder-header, h3, h4");
    let item_sel = selector(".cv-course-material-item, .material-item, a[href*='view_content_node']");
    let item_link_sel = selector("a[href*='view_content_node'], .material-title a, a");

    for folder in document.select(&folder_sel) {
        let folder_name = first(folder, &header_sel)
            .map(inline_text)
            .unwrap_or_default();

        for item in folder.select(&item_sel) {
            let link: ElementRef<'_> = if item.value().name() == "a" {
                item
            } else {
                match first(item, &item_link_sel) {
                    Some(link) => link,
                    None => continue,
                }
            };

            let href = attr(link, "href");
            let material = Material {
                cv_cid,
                material_node_id: node_id(href),
                folder: folder_name.clone(),
                title: inline_text(link),
                view_url: absolute_url(base, href),
            };

            // An item wrapper and the link inside it both match the item selector.
            let duplicate = materials
                .iter()
                .any(|m| m.view_url == material.view_url && m.title == material.title);
            if !duplicate {
                materials.push(material);
            }
        }
    }

    let loose_sel = selector("a[href*='view_content_node'][href*='material']");
    for link in document.select(&loose_sel) {
        let href = attr(link, "href");
        if href.is_empty() || materials.iter().any(|m| m.view_url.ends_with(href)) {
            continue;
        }

        let title = inline_text(link);
        let Some(id) = node_id(href) else {
            continue;
        };
        if title.is_empty() {
            continue;
        }

        materials.push(Material {
            cv_cid,
            material_node_id: Some(id),
            folder: String::new(),
            title,
            view_url: absolute_url(base, href),
        });
    }

    materials
}

/// Materials listed on the dedicated `/material` page of a course.
pub fn parse_material_page(html: &str, cv_cid: u64, base: &Url) -> Vec<Material> {
    let document = Html::parse_document(html);
    let link_sel = selector("a[href*='view_content_node']");

    document
        .select(&link_sel)
        .filter_map(|link| {
            let href = attr(link, "href");
            let title = inline_text(link);
            let id = node_id(href)?;
            (!title.is_empty()).then(|| Material {
                cv_cid,
                material_node_id: Some(id),
                folder: String::new(),
                title,
                view_url: absolute_url(base, href),
            })
        })
        .collect()
}
