pub mod card;
pub mod config;
pub mod story_spec;

pub use card::{suggested_filename, CardRequest, RenderedCard, ValidationError};
pub use config::{AppConfig, BackgroundConfig, BackgroundFailure, OutputConfig};
pub use story_spec::StorySpec;
