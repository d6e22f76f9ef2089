//! tabradio：分标签页的网络电台播放器核心

pub mod app;
pub mod audio_worker;
pub mod catalog;
pub mod core;
pub mod domain;
pub mod error;
pub mod features;
pub mod logging;
pub mod messages;
pub mod navigation;
pub mod persist;
pub mod playback;
pub mod settings;
pub mod snapshot;
pub mod source;
pub mod ui;
