pub mod card_service;
pub mod download_sink;
pub mod image_cache;
pub mod image_source;
pub mod origin;

pub use card_service::CardService;
pub use download_sink::{DirectorySink, DownloadSink, MemorySink};
pub use image_cache::ImageCache;
pub use image_source::{HttpImageSource, ImageSource};
pub use origin::{OriginProvider, RequestOrigin, StaticOrigin};
