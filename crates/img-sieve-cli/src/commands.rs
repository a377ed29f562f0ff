use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use img_sieve_core::config::MAX_TOLERANCE;
use img_sieve_core::SizeFolder;

#[derive(Debug, Parser)]
#[command(name = "img-sieve")]
#[command(about = "Prune an image archive by manifest and folder-encoded size", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compare the archive against the manifest without deleting anything
    Report(InputArgs),
    /// Delete images whose names are not in the manifest
    DeleteUnlisted(InputArgs),
    /// Delete images whose pixel size does not match their size folder
    DeleteSizeMismatched {
        #[command(flatten)]
        input: InputArgs,
        /// Only list mismatches, keep every file
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete unlisted images, then size mismatches
    CleanAll(InputArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Zip archive of images
    pub archive: PathBuf,
    /// Text file with one name to keep per line
    pub manifest: PathBuf,
    /// Size tolerance in pixels
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=MAX_TOLERANCE as i64))]
    pub tolerance: Option<u32>,
    /// Folder that carries the size tag
    #[arg(long, value_enum)]
    pub size_folder: Option<SizeFolderArg>,
    /// Where to write the cleaned archive
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SizeFolderArg {
    FirstSegment,
    ImmediateParent,
}

impl From<SizeFolderArg> for SizeFolder {
    fn from(arg: SizeFolderArg) -> Self {
        match arg {
            SizeFolderArg::FirstSegment => SizeFolder::FirstSegment,
            SizeFolderArg::ImmediateParent => SizeFolder::ImmediateParent,
        }
    }
}
