//! Storycard - shareable story cards for experience listings
//!
//! Renders an experience record into a fixed 1080x1920 PNG with a photo or
//! gradient background, wrapped title and description, info pills and a
//! call-to-action panel. This library exposes modules for integration testing.

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
