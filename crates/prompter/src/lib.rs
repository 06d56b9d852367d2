//! A scrolling teleprompter: script loading, the playback engine that runs
//! countdown, reveal and autoscroll, and the eframe surface that shows it.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod playback;
pub mod render;
pub mod script;
pub mod surface;
pub mod theme;
