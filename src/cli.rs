use clap::Parser;
use std::path::PathBuf;

use crate::intensity::{NormalizationMode, ReferenceStrategy};

#[derive(Parser, Debug)]
#[command(name = "heft", version, about = "Score how heavy a piece of recorded audio sounds")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG, AAC)
    pub input: PathBuf,

    /// Number of equal sections to score
    #[arg(short = 'n', long, default_value_t = 10)]
    pub sections: usize,

    /// Normalization applied to section descriptors
    #[arg(short, long, value_enum, default_value_t = NormalizationMode::LogScaled)]
    pub mode: NormalizationMode,

    /// Where normalization divisors come from
    #[arg(short, long, value_enum, default_value_t = ReferenceStrategy::Track)]
    pub reference: ReferenceStrategy,

    /// Title to display instead of the file's tag
    #[arg(long)]
    pub title: Option<String>,

    /// Artist to display instead of the file's tag
    #[arg(long)]
    pub artist: Option<String>,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,

    /// Print per-section scores and the reference scale
    #[arg(long)]
    pub breakdown: bool,

    /// Worker threads for section analysis (0 = all cores)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Config file (defaults to heft.toml or the user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["heft", "song.mp3"]);
        assert_eq!(cli.input, PathBuf::from("song.mp3"));
        assert_eq!(cli.sections, 10);
        assert_eq!(cli.mode, NormalizationMode::LogScaled);
        assert_eq!(cli.reference, ReferenceStrategy::Track);
        assert!(!cli.json);
    }

    #[test]
    fn value_enums() {
        let cli = Cli::parse_from([
            "heft", "song.flac", "-n", "4", "--mode", "linear", "--reference", "section-peak", "-vv",
        ]);
        assert_eq!(cli.sections, 4);
        assert_eq!(cli.mode, NormalizationMode::Linear);
        assert_eq!(cli.reference, ReferenceStrategy::SectionPeak);
        assert_eq!(cli.verbose, 2);
    }
}
