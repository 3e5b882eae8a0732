//! Host-facing runtime: event model, scroll tracking, change detection and
//! the controller that ties them to the panel.

pub mod controller;
pub mod events;
pub mod loader;
pub mod scroll;
pub mod watcher;
