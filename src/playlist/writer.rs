use crate::playlist::{ENTRY_MARKER, HEADER_MARKER, Playlist, PlaylistEntry};

/// Group used for entries the listing knows nothing about
pub const DEFAULT_GROUP_TITLE: &str = "其他";

pub const UPSTREAM_ADDRESS: &str = "192.168.123.1:23234";
pub const LOCAL_ADDRESS: &str = "192.168.50.1:4022";

/// Rewrites the first occurrence of `from` in each stream address to `to`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRemap {
    pub from: String,
    pub to: String,
}

impl Default for AddressRemap {
    fn default() -> Self {
        Self {
            from: UPSTREAM_ADDRESS.to_string(),
            to: LOCAL_ADDRESS.to_string(),
        }
    }
}

impl AddressRemap {
    #[must_use]
    pub fn apply(&self, uri: &str) -> String {
        if self.from.is_empty() {
            return uri.to_string();
        }
        uri.replacen(&self.from, &self.to, 1)
    }
}

/// Renders a playlist with the default [`AddressRemap`]
#[must_use]
pub fn serialize(playlist: &Playlist) -> String {
    serialize_with_remap(playlist, &AddressRemap::default())
}

/// Renders a playlist back to M3U text. Lines are separated by `\n` with no
/// trailing newline.
#[must_use]
pub fn serialize_with_remap(playlist: &Playlist, remap: &AddressRemap) -> String {
    let mut lines = Vec::with_capacity(1 + playlist.entries.len() * 2);

    lines.push(format!(
        "{HEADER_MARKER} x-tvg-url=\"{}\"",
        playlist.header.epg_url
    ));

    for entry in &playlist.entries {
        lines.push(entry_line(entry));
        lines.push(remap.apply(&entry.stream_uri));
    }

    lines.join("\n")
}

fn entry_line(entry: &PlaylistEntry) -> String {
    let mut attributes = Vec::with_capacity(3);

    if let Some(name) = entry.tvg_name.as_deref().filter(|s| !s.is_empty()) {
        attributes.push(format!("tvg-name=\"{name}\""));
    }
    if let Some(logo) = entry.tvg_logo.as_deref().filter(|s| !s.is_empty()) {
        attributes.push(format!("tvg-logo=\"{logo}\""));
    }

    let group = entry
        .group_title
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_GROUP_TITLE);
    attributes.push(format!("group-title=\"{group}\""));

    format!(
        "{ENTRY_MARKER}:-1 {},{}",
        attributes.join(" "),
        entry.display_name
    )
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::playlist::PlaylistHeader;

    fn entry(name: &str, uri: &str) -> PlaylistEntry {
        PlaylistEntry {
            display_name: name.to_string(),
            stream_uri: uri.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_serialize() {
        let playlist = Playlist {
            header: PlaylistHeader {
                epg_url: "http://epg/e.xml.gz".to_string(),
            },
            entries: vec![
                PlaylistEntry {
                    tvg_name: Some("CCTV5+".to_string()),
                    tvg_logo: Some("http://logo/5.png".to_string()),
                    group_title: Some("Sports".to_string()),
                    ..entry("CCTV-5+", "http://192.168.123.1:23234/rtp/5")
                },
                PlaylistEntry {
                    tvg_name: Some("BTV".to_string()),
                    group_title: Some("Local".to_string()),
                    ..entry("BTV", "http://other.host/btv")
                },
                entry("Unnamed", "http://192.168.123.1:23234/rtp/9"),
            ],
        };

        assert_eq!(
            serialize(&playlist),
            indoc! {r#"
                #EXTM3U x-tvg-url="http://epg/e.xml.gz"
                #EXTINF:-1 tvg-name="CCTV5+" tvg-logo="http://logo/5.png" group-title="Sports",CCTV-5+
                http://192.168.50.1:4022/rtp/5
                #EXTINF:-1 tvg-name="BTV" group-title="Local",BTV
                http://other.host/btv
                #EXTINF:-1 group-title="其他",Unnamed
                http://192.168.50.1:4022/rtp/9"#}
        );
    }

    #[test]
    fn test_empty_playlist_keeps_empty_epg_url() {
        assert_eq!(serialize(&Playlist::default()), "#EXTM3U x-tvg-url=\"\"");
    }

    #[test]
    fn test_empty_group_title_falls_back_to_default() {
        let playlist = Playlist {
            entries: vec![PlaylistEntry {
                group_title: Some(String::new()),
                ..entry("A", "http://a")
            }],
            ..Default::default()
        };

        assert!(serialize(&playlist).contains("#EXTINF:-1 group-title=\"其他\",A"));
    }

    #[test]
    fn test_remap_replaces_first_occurrence_only() {
        let remap = AddressRemap::default();
        assert_eq!(
            remap.apply("http://192.168.123.1:23234/udp/192.168.123.1:23234"),
            "http://192.168.50.1:4022/udp/192.168.123.1:23234"
        );
        assert_eq!(remap.apply("http://example/live"), "http://example/live");
    }

    #[test]
    fn test_custom_remap() {
        let remap = AddressRemap {
            from: "upstream:1".to_string(),
            to: "local:2".to_string(),
        };
        let playlist = Playlist {
            entries: vec![entry("A", "http://upstream:1/a")],
            ..Default::default()
        };

        assert!(serialize_with_remap(&playlist, &remap).ends_with("\nhttp://local:2/a"));
    }
}
