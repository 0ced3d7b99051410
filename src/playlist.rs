pub mod enrich;
pub mod parser;
pub mod structs;
pub mod writer;

pub use enrich::enrich;
pub use parser::parse;
pub use structs::{Playlist, PlaylistEntry, PlaylistHeader};
pub use writer::{AddressRemap, serialize, serialize_with_remap};

pub const HEADER_MARKER: &str = "#EXTM3U";
pub const ENTRY_MARKER: &str = "#EXTINF";
pub const STREAM_SCHEME: &str = "http";
