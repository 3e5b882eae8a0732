pub mod config;
pub mod dom;
pub mod engine;
pub mod net;
pub mod outline;
pub mod panel;
