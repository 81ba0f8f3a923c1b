// src/tui/mod.rs — Full-screen flight dashboard (ratatui)

mod app;
mod theme;

pub use app::show_dashboard;
