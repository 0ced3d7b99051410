use crate::{listing::ChannelMap, playlist::Playlist};

/// Copies logo and category onto every entry whose `tvg-name` is listed
/// under exactly that name. Returns how many entries matched.
pub fn enrich(playlist: &mut Playlist, channels: &ChannelMap) -> usize {
    let mut matched = 0;

    for entry in &mut playlist.entries {
        let Some(record) = entry.tvg_name.as_ref().and_then(|name| channels.get(name)) else {
            continue;
        };

        entry.tvg_logo.clone_from(&record.logo_url);
        entry.group_title = Some(record.category.clone());
        matched += 1;
    }

    matched
}
