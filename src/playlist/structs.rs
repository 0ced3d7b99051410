#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    pub header: PlaylistHeader,
    /// In source order
    pub entries: Vec<PlaylistEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistHeader {
    /// `x-tvg-url`, empty when the source has none
    pub epg_url: String,
}

/// A `#EXTINF` line together with its stream address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub display_name: String,
    /// Key into the channel listing. Entries without one are never enriched
    pub tvg_name: Option<String>,
    pub tvg_logo: Option<String>,
    pub group_title: Option<String>,
    pub stream_uri: String,
}
