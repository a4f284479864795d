//! Quote rendering: the Markdown block spliced into the README and the
//! HTML snippet embedded in rendered pages.
//!
//! The Markdown output is byte-exact: it is inserted between the quote markers
//! and the surrounding document is compared byte-for-byte across runs.

mod html;

use maqeal_shared::Quote;

pub use html::{format_stamp, to_html_fragment};

/// Alt text used for the optional quote image.
const IMAGE_ALT: &str = "Quote Image";

/// Collapse every line break (`\r\n`, `\n`, `\r`) into a single space.
///
/// Nothing else is touched: no trimming, no merging of existing spaces.
pub fn normalize_line_breaks(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Render a quote as the Markdown block that goes between the markers.
///
/// ```text
/// \n# <quote>\n\n- <author>\n\n[\n![Quote Image](<image>)]
/// ```
///
/// The caller is expected to have normalized line breaks in `quote.quote`.
pub fn to_markdown(quote: &Quote) -> String {
    let mut md = format!("\n# {}\n\n- {}\n\n", quote.quote, quote.author);
    if let Some(image) = &quote.image {
        md.push_str(&format!("\n![{IMAGE_ALT}]({image})"));
    }
    md
}
