//! HTML snippet for embedding the current quote in a rendered page.

use std::fmt::Display;

use chrono::{DateTime, Datelike, TimeZone};

use maqeal_shared::Quote;

/// Render the styled "quote of the day" card.
///
/// Contains the date stamp, the view counter (`hits`), the quote and the author.
/// Quote and author are HTML-escaped; the layout classes are Tailwind utilities.
pub fn to_html_fragment<Tz>(quote: &Quote, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let stamp = format_stamp(at);
    let hits = quote.hits;
    let text = escape(&quote.quote);
    let author = escape(&quote.author);

    format!(
        r#"
<div class="flex justify-center mt-16 px-0 sm:items-center sm:justify-between quote-of-the-day">
    <div class="flex flex-col items-center w-full max-w-xl px-4 py-8 mx-auto bg-white rounded-lg shadow dark:bg-gray-800 sm:px-6 md:px-8 lg:px-10">
        <div class="text-center text-sm text-gray-500 dark:text-gray-400 sm:text-right">
            <div class="flex items-center gap-4">
                <div class="quote-header">
                    <p class="quote-date" style="font-size: smaller;">اليوم: {stamp} 🎯 المشاهدات: {hits}</p>
                </div>
                <div class="ml-4 text-center text-sm text-gray-500 dark:text-gray-400 sm:text-right sm:ml-0 quote-content" dir="rtl">
                    <h1 class="quote-text">{text}</h1>
                </div>
                <div class="quote-footer">
                    <p class="quote-author">{author}</p>
                </div>
            </div>
        </div>
    </div>
</div>"#
    )
}

/// `Sunday 18th of October 2026 - 09:30`
pub fn format_stamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let day = at.day();
    format!(
        "{} {day}{} of {}",
        at.format("%A"),
        ordinal_suffix(day),
        at.format("%B %Y - %H:%M")
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, day, 9, 30, 0).unwrap()
    }

    #[test]
    fn stamp_uses_ordinal_day() {
        assert_eq!(format_stamp(&at(18)), "Sunday 18th of October 2026 - 09:30");
        assert_eq!(format_stamp(&at(1)), "Thursday 1st of October 2026 - 09:30");
        assert_eq!(format_stamp(&at(22)), "Thursday 22nd of October 2026 - 09:30");
        assert_eq!(format_stamp(&at(23)), "Friday 23rd of October 2026 - 09:30");
        assert_eq!(format_stamp(&at(11)), "Sunday 11th of October 2026 - 09:30");
        assert_eq!(format_stamp(&at(13)), "Tuesday 13th of October 2026 - 09:30");
    }

    #[test]
    fn fragment_carries_stamp_hits_quote_and_author() {
        let mut quote = Quote::new(2, "العلم في الصغر كالنقش على الحجر.", "مثل عربي");
        quote.hits = 42;

        let html = to_html_fragment(&quote, &at(18));
        assert!(html.contains("Sunday 18th of October 2026 - 09:30"));
        assert!(html.contains("المشاهدات: 42"));
        assert!(html.contains(r#"<h1 class="quote-text">العلم في الصغر كالنقش على الحجر.</h1>"#));
        assert!(html.contains(r#"<p class="quote-author">مثل عربي</p>"#));
    }

    #[test]
    fn fragment_escapes_markup() {
        let quote = Quote::new(1, "a < b & \"c\"", "<script>");
        let html = to_html_fragment(&quote, &at(18));
        assert!(html.contains("a &lt; b &amp; &quot;c&quot;"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
