//! File input/output.

pub mod field_map;
pub mod utils;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// How to handle existing files when writing output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverwriteMode {
    /// Ask the user whether to overwrite each existing file.
    Ask,
    /// Overwrite existing files.
    Always,
    /// Never overwrite existing files.
    Never,
}

/// How much status information to print while running.
#[derive(Clone, Debug)]
pub enum Verbosity {
    /// Print nothing except errors.
    Quiet,
    /// Print non-critical status messages.
    Messages,
    /// Print status messages and show progress bars with the given style.
    Progress(ProgressStyle),
}

impl Verbosity {
    /// Whether non-critical status messages should be printed.
    pub fn print_messages(&self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Whether progress bars should be shown.
    pub fn show_progress(&self) -> bool {
        matches!(self, Self::Progress(_))
    }

    /// Creates a progress bar for the given number of items, which is
    /// hidden unless progress should be shown.
    pub fn create_progress_bar(&self, len: usize) -> ProgressBar {
        match self {
            Self::Progress(style) => {
                let bar = ProgressBar::new(len as u64);
                bar.set_style(style.clone());
                bar
            }
            _ => {
                let bar = ProgressBar::new(len as u64);
                bar.set_draw_target(ProgressDrawTarget::hidden());
                bar
            }
        }
    }
}
