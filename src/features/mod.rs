pub mod catalog;
pub mod player;
pub mod search;
pub mod settings;
