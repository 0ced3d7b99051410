use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Channel table keyed by [`ChannelRecord::name`]
pub type ChannelMap = HashMap<String, ChannelRecord>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRecord {
    pub name: String,
    pub category: String,
    /// Where the listing says the channel comes from. Informational only
    pub source_label: String,
    pub logo_url: Option<String>,
}
