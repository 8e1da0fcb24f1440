pub mod background;
pub mod compositor;
pub mod layout;
pub mod measure;
pub mod rasterizer;
pub mod surface;
pub mod template;

pub use background::Background;
pub use compositor::CardCompositor;
pub use layout::{wrap_greedy, CardLayout, TextLine, WrapParams, WrappedBlock};
pub use measure::{FixedAdvanceMeasurer, FontMeasurer, FontWeight, TextMeasurer, TextStyle};
pub use rasterizer::SvgRasterizer;
pub use surface::DrawingSurface;
pub use template::CardTemplate;
