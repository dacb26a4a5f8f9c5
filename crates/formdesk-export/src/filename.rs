//! Export filename handling.

use chrono::NaiveDate;

/// Build the download filename for a form export:
/// `<form-slug>-subs-<YYYY-MM-DD>.csv`.
pub fn export_filename(form_title: &str, date: NaiveDate) -> String {
    let slug = slugify(form_title);
    let slug = if slug.is_empty() { "form" } else { &slug };
    format!("{}-subs-{}.csv", slug, date.format("%Y-%m-%d"))
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}
