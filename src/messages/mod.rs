pub mod app;
pub mod source;
