//! UI layer for the desktop GUI: app shell and result widgets.

pub mod app;
pub mod widgets;

pub use app::SentimentApp;
