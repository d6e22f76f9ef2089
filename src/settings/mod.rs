pub mod store;

pub use store::{AppSettings, load_settings, save_settings};
