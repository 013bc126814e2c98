use anyhow::Result;

mod app;

mod input;
mod modal;
mod view;
mod views;

// Shared by the view modules via `super::super::...`.
use view::{View, render_view_chrome};

pub fn run(opts: crate::tui::TuiRunOptions) -> Result<()> {
    app::run(opts)
}
