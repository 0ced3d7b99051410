pub mod scraper;
pub mod structs;

pub use scraper::scrape;
pub use structs::{ChannelMap, ChannelRecord};
