//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::InfoLevel;
use clap_verbosity_flag::Verbosity;
use shelf_lib::ViewConfig;

#[derive(Debug, Parser)]
#[command(
    name = "shelf",
    version,
    about = "Browse, search, select and reorder a remote item collection",
    long_about = "Interactive client for a remote item collection.\n\n\
                  Loads items page by page, keeps the selection and the display order\n\
                  in a local session, and restores both on the next start."
)]
pub struct Cli {
    /// Base URL of the collection service.
    #[arg(long, value_name = "URL", default_value = "http://localhost:3001")]
    pub url: String,

    /// Items requested per page.
    #[arg(long, default_value_t = 20)]
    pub page_size: usize,

    /// Row height in pixels.
    #[arg(long, default_value_t = 40)]
    pub row_height: u32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 600)]
    pub viewport_height: u32,

    /// Rows rendered beyond each edge of the viewport.
    #[arg(long, default_value_t = 3)]
    pub overscan: usize,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub timeout: u64,

    /// Session database (default: platform data directory).
    #[arg(long, value_name = "PATH", conflicts_with = "memory_session")]
    pub session_db: Option<PathBuf>,

    /// Keep the session in memory only; nothing survives a restart.
    #[arg(long)]
    pub memory_session: bool,

    /// Discard the saved order and selection and start from the first page.
    #[arg(long)]
    pub forget_session: bool,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,
}

impl Cli {
    pub fn view_config(&self) -> ViewConfig {
        ViewConfig::new()
            .with_page_size(self.page_size)
            .with_row_height(self.row_height)
            .with_viewport_height(self.viewport_height)
            .with_overscan(self.overscan)
    }
}
