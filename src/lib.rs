pub mod app;
pub mod braille;
pub mod data;
pub mod geo;
pub mod list;
pub mod map;
pub mod tooltip;
pub mod ui;
