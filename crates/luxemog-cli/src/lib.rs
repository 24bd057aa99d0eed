use std::path::PathBuf;

use clap::Parser;

/// Transforms SOURCE based on the transformations in the TRANSFORMS file.
#[derive(Parser, Debug)]
#[command(name = "luxemog", version)]
pub struct Args {
    /// A filename holding the rule-file transforms to apply.
    pub transforms: PathBuf,

    /// A filename to read the source document(s) from, or `-` for stdin.
    pub source: String,

    /// Write the result to FILE rather than stdout. If `-`, use stdout.
    #[arg(short = 'o', long = "out", default_value = "-")]
    pub out: String,

    /// Reverse `to` and `from` patterns in every rule for this run.
    #[arg(short = 'r', long)]
    pub reverse: bool,

    /// Don't insert whitespace to prettify output.
    #[arg(short = 'm', long)]
    pub minimize: bool,

    /// Use spaces instead of tabs to indent pretty output.
    #[arg(short = 's', long = "use-spaces")]
    pub use_spaces: bool,

    /// Use COUNT spaces or tabs to indent pretty output.
    #[arg(short = 'i', long = "indent-count", default_value_t = 1)]
    pub indent_count: usize,

    /// Write diagnostic messages to stderr.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
