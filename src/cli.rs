//! CLI definitions for imgrot
//!
//! This module contains the clap CLI structure definitions, separated from
//! main.rs so the command tree can be inspected without running a command.

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Build clap styles for consistent CLI appearance.
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[derive(Parser)]
#[command(name = "imgrot")]
#[command(about = "[ imgrot ] - browse image folders and annotate rotation angles")]
#[command(
    long_about = "imgrot - browse large image folders and record a rotation angle per image.

Images are listed recursively (png, jpg, jpeg, gif, bmp by default) and sorted
case-insensitively by path. While browsing, images around the current one are
decoded in the background so stepping through the folder never stalls.
Rotation angles can be exported as CSV.

QUICK START:
    imgrot browse ~/scans          Open the interactive viewer
    imgrot scan ~/scans            List the images imgrot would show
    imgrot config show             Show the active configuration"
)]
#[command(version)]
#[command(styles = build_cli_styles())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse a directory interactively
    #[command(long_about = "Open the interactive terminal viewer on a directory.

KEYS:
    f / Right        Next image
    d / Left         Previous image
    Home / End       First / last image
    PgDn / PgUp      Jump forward / back by one group
    r                Rotate 90 degrees
    R                Rotate 180 degrees
    0                Reset rotation
    [ / ]            Fine rotation (one drag step)
    e                Export annotations up to the current image
    q / Esc          Quit

EXAMPLE:
    imgrot browse ~/scans")]
    Browse {
        /// Directory to open
        #[arg(help = "Directory containing images")]
        dir: PathBuf,
    },

    /// List the images found in a directory
    #[command(long_about = "Scan a directory the same way the viewer does and print
the sorted catalog, one path per line, followed by a count.

EXAMPLE:
    imgrot scan ~/scans")]
    Scan {
        /// Directory to scan
        #[arg(help = "Directory containing images")]
        dir: PathBuf,
    },

    /// Write an annotation CSV without opening the viewer
    #[command(long_about = "Scan a directory and export the annotation rows up to and
including one index. Images are not decoded and all angles are 0, so this
produces a template that lists the catalog in viewer order.

EXAMPLES:
    imgrot export ~/scans --output template.csv
    imgrot export ~/scans --output first10.csv --upto 9")]
    Export {
        /// Directory to open
        #[arg(help = "Directory containing images")]
        dir: PathBuf,
        /// Destination CSV file
        #[arg(long, short, help = "Destination CSV file")]
        output: PathBuf,
        /// Last catalog index to include (default: last image)
        #[arg(long, help = "Last index to include (default: last image)")]
        upto: Option<usize>,
    },

    /// Configuration management
    #[command(
        subcommand,
        long_about = "View the imgrot configuration.

Configuration is stored in ~/.config/imgrot/config.toml.

EXAMPLES:
    imgrot config show       Display current configuration
    imgrot config path       Print the configuration file path"
    )]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
}
