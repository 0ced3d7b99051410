use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    listing::{ChannelMap, ChannelRecord},
};

/// One table row opened by a numbered `<th>`. Lazy so densely packed rows
/// are matched one at a time instead of as a single span.
static ROW_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<tr\s*>\s*<th>[0-9]+</th>.+?</tr>").unwrap());

static CELL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<td(?:\s[^>]*)?>(.*?)</td>").unwrap());

static IMAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<img\s[^>]*?\bsrc="([^"]*)""#).unwrap());

// Column positions of the listing table. The page doesn't label its
// columns, so a reordered table upstream silently shifts these.
const LOGO_CELL: usize = 0;
const NAME_CELL: usize = 1;
const CATEGORY_CELL: usize = 3;
const SOURCE_CELL: usize = 4;

/// Extracts the channel table out of a listing page
///
/// Rows with too few cells are skipped. A name listed twice keeps the
/// later row.
///
/// # Errors
/// [`Error::EmptyResult`] when no row yields a channel
pub fn scrape(raw_html: &str) -> Result<ChannelMap> {
    let mut channels = ChannelMap::new();
    let mut rows = 0usize;

    for row in ROW_REGEX.find_iter(raw_html) {
        rows += 1;

        let Some(record) = parse_row(row.as_str()) else {
            warn!(
                "Skipping listing row #{rows}: expected at least {} cells",
                SOURCE_CELL + 1
            );
            continue;
        };

        if let Some(previous) = channels.insert(record.name.clone(), record) {
            debug!(
                "Channel `{}` is listed more than once, keeping the later row",
                previous.name
            );
        }
    }

    debug!("Scraped {} channels out of {rows} listing rows", channels.len());

    if channels.is_empty() {
        return Err(Error::EmptyResult);
    }

    Ok(channels)
}

fn parse_row(row: &str) -> Option<ChannelRecord> {
    let cells = CELL_REGEX
        .captures_iter(row)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect::<Vec<&str>>();

    let source_label = cells.get(SOURCE_CELL)?;

    let logo_url = IMAGE_REGEX
        .captures(cells[LOGO_CELL])
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|src| !src.is_empty())
        .map(ToString::to_string);

    Some(ChannelRecord {
        name: cells[NAME_CELL].to_string(),
        category: cells[CATEGORY_CELL].to_string(),
        source_label: (*source_label).to_string(),
        logo_url,
    })
}
