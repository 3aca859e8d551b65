pub mod camera;
pub mod canvas;
pub mod config;
pub mod detector;
pub mod encode;
pub mod error;
pub mod snapshot;
