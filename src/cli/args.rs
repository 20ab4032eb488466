//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use pseudoloc::config::{DEFAULT_CONFIG_FILE, Overrides};
use pseudoloc::strategy::StrategyKind;

/// Pseudoloc pseudo-localization CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: pseudoloc.toml)
    #[arg(short = 'C', long, default_value = DEFAULT_CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Localize HTML files once, writing the transformed documents out
    #[command(visible_alias = "l")]
    Localize {
        #[command(flatten)]
        args: LocalizeArgs,
    },

    /// List the text and attributes a document would get localized
    #[command(visible_alias = "s")]
    Scan {
        #[command(flatten)]
        args: ScanArgs,
    },

    /// Watch an HTML file and keep a localized copy up to date
    #[command(visible_alias = "w")]
    Watch {
        #[command(flatten)]
        args: WatchArgs,
    },
}

/// Localize command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct LocalizeArgs {
    /// Files or directories to localize (*.html, *.htm).
    /// Use `-` to read paths from stdin (one per line).
    #[arg(value_name = "PATH", required = true, value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Write results under this directory, mirroring the input layout
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Overwrite the inputs instead of writing `<name>.pseudo.html` siblings
    #[arg(short, long)]
    pub in_place: bool,

    #[command(flatten)]
    pub transform: TransformArgs,
}

/// Scan command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ScanArgs {
    /// HTML file to inspect
    #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output as JSON instead of plain lines
    #[arg(short, long)]
    pub json: bool,

    /// Pretty-print the JSON output (implies --json)
    #[arg(short, long)]
    pub pretty: bool,

    #[command(flatten)]
    pub transform: TransformArgs,
}

/// Watch command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct WatchArgs {
    /// HTML file to watch
    #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Localized copy to keep up to date (must differ from FILE)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    #[command(flatten)]
    pub transform: TransformArgs,
}

/// Transformation flags shared by all commands. Each one overrides the
/// matching config file field.
#[derive(clap::Args, Debug, Clone)]
pub struct TransformArgs {
    /// Pseudo-localization strategy (accented, bidi)
    #[arg(short, long)]
    pub strategy: Option<StrategyKind>,

    /// Tag names whose content is left untouched (comma-separated)
    #[arg(short, long, value_name = "TAG", value_delimiter = ',')]
    pub blacklist: Option<Vec<String>>,

    /// Attribute to localize once per document (repeatable)
    #[arg(short, long, value_name = "NAME")]
    pub attribute: Option<Vec<String>>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl TransformArgs {
    /// The config overrides these flags carry.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            strategy: self.strategy,
            blacklisted_node_names: self.blacklist.clone(),
            attributes: self.attribute.clone(),
        }
    }
}

#[allow(unused)]
impl Cli {
    pub const fn is_localize(&self) -> bool {
        matches!(self.command, Commands::Localize { .. })
    }
    pub const fn is_scan(&self) -> bool {
        matches!(self.command, Commands::Scan { .. })
    }
    pub const fn is_watch(&self) -> bool {
        matches!(self.command, Commands::Watch { .. })
    }

    /// The transform flags of whichever subcommand was invoked.
    pub const fn transform(&self) -> &TransformArgs {
        match &self.command {
            Commands::Localize { args } => &args.transform,
            Commands::Scan { args } => &args.transform,
            Commands::Watch { args } => &args.transform,
        }
    }
}
