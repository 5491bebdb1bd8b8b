//! Home page normalizer: current term and login marker.

use scraper::Html;

use mcv_mcp_core::YearSemester;

use crate::html::{first, selector, text_of};

/// Whether the home page was rendered for a logged-in user.
///
/// Logged-in pages carry a logout link; the login page does not.
pub fn is_logged_in(html: &str) -> bool {
    html.to_lowercase().contains("logout")
}

/// Whether `body` is the portal's login page rather than the requested one.
///
/// An expired session is usually answered with a redirect to the login form
/// instead of a 401, so the page is recognised by its password field or a
/// form posting to a login URL. Pages carrying a logout link never count.
pub fn is_login_page(body: &str) -> bool {
    if !body.trim_start().starts_with('<') || is_logged_in(body) {
        return false;
    }
    let document = Html::parse_document(body);
    let login_sel = selector("input[type='password'], form[action*='login']");
    document.select(&login_sel).next().is_some()
}

/// The term currently selected on the home page, if it can be found.
///
/// Looks at the student term selector first, then at the first course icon
/// group header.
pub fn current_term(html: &str) -> Option<YearSemester> {
    let document = Html::parse_document(html);

    let option_sel = selector("#student-yearsem-select option");
    if let Some(term) = document
        .select(&option_sel)
        .next()
        .and_then(|option| YearSemester::find_in(&text_of(option)))
    {
        return Some(term);
    }

    let group_sel = selector("section.courseville-courseicongroup");
    let header_sel = selector("div.courseville-header");
    let group = document.select(&group_sel).next()?;
    let header = first(group, &header_sel)?;
    YearSemester::find_in(&text_of(header))
}
