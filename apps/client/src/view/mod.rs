pub mod list;
pub mod markup;
pub mod surface;
pub mod templates;
pub mod time;

pub use list::{render_list, ListView, RenderOutcome};
pub use surface::{MemorySurface, Notice, NoticeLevel, Surface, SurfaceSnapshot};
