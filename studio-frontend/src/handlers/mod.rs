pub mod app;
pub mod audio;
pub mod chatbot;
pub mod essay;
pub mod image;
pub mod metrics;
pub mod summary;
