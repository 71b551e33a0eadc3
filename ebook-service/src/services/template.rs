//! HTML body of the eBook delivery email.
//!
//! The markup lives in `templates/ebook_email.html` and is compiled into the
//! binary. It carries three named placeholders: `{{name}}`, `{{ebook_title}}`
//! and `{{download_url}}`.

use crate::models::EbookRecord;

pub const EBOOK_EMAIL_TEMPLATE: &str = include_str!("../../templates/ebook_email.html");

/// Render the delivery email for `record`, greeting `recipient_name`.
///
/// The recipient name is user input and is HTML-escaped with
/// `ammonia::clean_text`, which also encodes spaces and most punctuation as
/// numeric entities (`Ana Maria` becomes `Ana&#32;Maria`). Mail clients render
/// these normally. Title and URL come from the compiled-in catalog and are
/// inserted verbatim.
pub fn render_ebook_email(recipient_name: &str, record: &EbookRecord) -> String {
    let escaped_name = ammonia::clean_text(recipient_name);

    render(
        EBOOK_EMAIL_TEMPLATE,
        &[
            ("name", escaped_name.as_str()),
            ("ebook_title", record.title.as_str()),
            ("download_url", record.location_uri.as_str()),
        ],
    )
}

/// Substitute `{{key}}` placeholders in one pass over `template`.
///
/// Substituted values are never rescanned. Unknown placeholders are left in
/// place.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(end) = after_open.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = after_open[..end].trim();
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }

        rest = &after_open[end + 2..];
    }

    out.push_str(rest);
    out
}
