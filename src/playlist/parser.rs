use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{
    error::{Error, Result},
    playlist::{
        ENTRY_MARKER, HEADER_MARKER, Playlist, PlaylistEntry, PlaylistHeader, STREAM_SCHEME,
    },
    util::truncate_string,
};

static EPG_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"x-tvg-url="([^"]*)""#).unwrap());

static TVG_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"tvg-name="([^"]*)""#).unwrap());

/// Where the address of an entry was found, if anywhere
#[derive(Debug, PartialEq, Eq)]
enum AddressLookup<'a> {
    /// Address line found. Parsing continues at `resume_at`
    Found { uri: &'a str, resume_at: usize },
    /// Another entry started first; it sits at this line
    NextEntry(usize),
    /// Input ran out first
    Exhausted,
}

/// Parses an extended M3U playlist
///
/// Entries whose address line is missing are dropped. Lines that are neither
/// entry headers nor addresses are ignored.
///
/// # Errors
/// [`Error::InvalidFormat`] when the first line is not an `#EXTM3U` header
pub fn parse(raw_m3u: &str) -> Result<Playlist> {
    let lines = raw_m3u.lines().map(strip_line_ending).collect::<Vec<&str>>();

    let header_line = lines.first().copied().unwrap_or_default();
    if !header_line.starts_with(HEADER_MARKER) {
        return Err(Error::InvalidFormat {
            line: truncate_string(&header_line, 64),
        });
    }

    let header = PlaylistHeader {
        epg_url: capture_attribute(&EPG_URL_REGEX, header_line).unwrap_or_default(),
    };

    let mut entries = Vec::new();
    let mut i = 1;
    while i < lines.len() {
        let line = lines[i];
        if !line.starts_with(ENTRY_MARKER) {
            i += 1;
            continue;
        }

        match find_address(&lines, i + 1) {
            AddressLookup::Found { uri, resume_at } => {
                entries.push(parse_entry(line, uri));
                i = resume_at;
            }
            AddressLookup::NextEntry(next) => {
                debug!("Dropping playlist entry on line {}: no stream address", i + 1);
                i = next;
            }
            AddressLookup::Exhausted => {
                debug!("Dropping playlist entry on line {}: no stream address", i + 1);
                break;
            }
        }
    }

    debug!("Parsed {} playlist entries", entries.len());

    Ok(Playlist { header, entries })
}

/// Scans from `start` for the first address line or entry header
fn find_address<'a>(lines: &[&'a str], start: usize) -> AddressLookup<'a> {
    for (index, line) in lines.iter().copied().enumerate().skip(start) {
        if line.starts_with(STREAM_SCHEME) {
            return AddressLookup::Found {
                uri: line,
                resume_at: index + 1,
            };
        }
        if line.starts_with(ENTRY_MARKER) {
            return AddressLookup::NextEntry(index);
        }
    }

    AddressLookup::Exhausted
}

fn parse_entry(header_line: &str, stream_uri: &str) -> PlaylistEntry {
    // Display name follows the last comma
    let display_name = header_line
        .rsplit_once(',')
        .map(|(_, name)| strip_line_ending(name).to_string())
        .unwrap_or_default();

    PlaylistEntry {
        display_name,
        tvg_name: capture_attribute(&TVG_NAME_REGEX, header_line),
        tvg_logo: None,
        group_title: None,
        stream_uri: stream_uri.to_string(),
    }
}

/// First capture group of `regex` in `line`, if present and non-empty
fn capture_attribute(regex: &Regex, line: &str) -> Option<String> {
    regex
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

fn strip_line_ending(line: &str) -> &str {
    line.trim_matches(['\r', '\n'])
}
