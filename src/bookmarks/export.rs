//! Bookmark file generation

use super::{Bookmark, ExportOptions};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute, encode_quoted_attribute};
use std::fmt::Write;

const HEADER: &str = r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
<!-- This is an automatically generated file.
     It will be read and overwritten.
     DO NOT EDIT! -->
<META HTTP-EQUIV="Content-Type" CONTENT="text/html; charset=UTF-8">
<meta http-equiv="Content-Security-Policy"
      content="default-src 'self'; script-src 'none'; img-src data: *; object-src 'none'"></meta>
<TITLE>Bookmarks</TITLE>
"#;

/// Writes bookmarks as a Netscape bookmark file
///
/// All entries go into a single toolbar folder. Titles are HTML escaped and
/// an empty title falls back to the URL. Missing dates are written as `now`.
///
/// # Arguments
///
/// * `bookmarks` - The entries to write, in order
/// * `options` - Folder headings
/// * `now` - Timestamp for the folder and for entries without dates
///
/// # Returns
///
/// The complete file contents
pub fn export_bookmarks_html(
    bookmarks: &[Bookmark],
    options: &ExportOptions,
    now: DateTime<Utc>,
) -> String {
    let now_ts = now.timestamp();
    let mut out = String::from(HEADER);

    // Writing into a String cannot fail
    let _ = write!(
        out,
        "<H1>{}</H1>\n\n<DL><p>\n",
        encode_quoted_attribute(&options.menu_heading)
    );
    let _ = write!(
        out,
        "<DT><H3 ADD_DATE=\"{}\" LAST_MODIFIED=\"{}\" PERSONAL_TOOLBAR_FOLDER=\"true\">{}</H3>\n<DL><p>\n",
        now_ts,
        now_ts,
        encode_quoted_attribute(&options.toolbar_heading)
    );

    for bookmark in bookmarks {
        let title = if bookmark.title.is_empty() {
            &bookmark.url
        } else {
            &bookmark.title
        };
        let add_date = bookmark.add_date.map_or(now_ts, |d| d.timestamp());
        let last_modified = bookmark.last_modified.map_or(now_ts, |d| d.timestamp());

        let _ = writeln!(
            out,
            "<DT><A HREF=\"{}\" ADD_DATE=\"{}\" LAST_MODIFIED=\"{}\" ICON_URI=\"{}\">{}</A>",
            encode_double_quoted_attribute(&bookmark.url),
            add_date,
            last_modified,
            encode_double_quoted_attribute(&bookmark.icon),
            encode_quoted_attribute(title)
        );
    }

    out.push_str("</DL><p>\n</DL>\n");
    tracing::debug!("Exported {} bookmarks", bookmarks.len());
    out
}

/// Like [`export_bookmarks_html`], wrapped in standard base64
pub fn export_bookmarks_base64(
    bookmarks: &[Bookmark],
    options: &ExportOptions,
    now: DateTime<Utc>,
) -> String {
    STANDARD.encode(export_bookmarks_html(bookmarks, options, now))
}
