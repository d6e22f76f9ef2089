#![allow(unused_imports)]
//! core 与 features 共用的导入

pub mod app {
    pub use crate::app::{App, AppSnapshot};
}

pub mod audio {
    pub use crate::audio_worker::{AudioCommand, AudioEvent};
}

pub mod effects {
    pub use crate::core::effects::CoreEffects;
}

pub mod infra {
    pub use crate::core::infra::{RequestKey, RequestTracker};
}

pub mod messages {
    pub use crate::messages::app::{AppCommand, AppEvent};
    pub use crate::messages::source::{CatalogOrigin, SourceCommand, SourceEvent};
}

pub use crate::core::utils::next_id;
