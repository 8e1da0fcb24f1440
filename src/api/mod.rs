pub mod card;

pub use card::{__path_handle_card, __path_handle_preview};
pub use card::{content_disposition, handle_card, handle_preview, CardErrorResponse};
