pub mod model;
pub mod tabs;

pub use model::{SearchQuery, Station};
pub use tabs::TabKind;
