use clap::Parser;
use std::path::PathBuf;

const ATTENTION: &str = "\
Attention:
You can only use one of these four filters: --filter-prefix, --filter-suffix, \
--filter-contains, and --filter-title-contains.
They conflict with each other, mixed filters are not supported.";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "A generator of Sony Walkman .m3u8 music playlists",
    after_help = ATTENTION
)]
pub struct Cli {
    /// Directory to scan for music; the playlist is written into it
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Only select this format (supported: flac, mp3)
    #[arg(long)]
    pub ext: Option<String>,

    /// Keep files whose name starts with this string
    #[arg(long)]
    pub filter_prefix: Option<String>,

    /// Keep files whose name ends with this string, extension included
    #[arg(long)]
    pub filter_suffix: Option<String>,

    /// Keep files whose name contains this string
    #[arg(long)]
    pub filter_contains: Option<String>,

    /// Keep files whose title tag (or file name when untagged) contains this string
    #[arg(long)]
    pub filter_title_contains: Option<String>,

    /// Output filename, created inside the scanned directory
    #[arg(short, long)]
    pub output: Option<String>,

    /// Use a predefined set of options from presets.toml
    #[arg(long)]
    pub preset: Option<String>,

    /// ffprobe executable used to read media metadata
    #[arg(long)]
    pub ffprobe: Option<PathBuf>,
}
