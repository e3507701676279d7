//! CLI command definitions

use clap::Parser;
use namesmith_domain::{CreatorTag, OutputFormat, SessionSettings};
use std::path::PathBuf;

/// CLI arguments for namesmith
#[derive(Parser, Debug)]
#[command(name = "namesmith")]
#[command(author, version, about = "Brainstorm available domain names with a panel of LLM creators")]
#[command(long_about = r#"
namesmith turns a short project brief into domain names that are still free.

Each round runs in four steps:
1. Clarify: a question agent asks about the project and a synthesizer
   folds your answers into a generation prompt
2. Generate: several creators (balanced, creative, conservative) propose
   names in parallel; names already seen in this session are dropped
3. Filter: every new name is checked (RDAP or web search) and kept only
   if it is free
4. Refine: your likes, dislikes and critique rewrite the brief for the
   next round

Configuration files are loaded from (in priority order):
1. NAMESMITH_* environment variables (e.g. NAMESMITH_CHECKER__MODE=search)
2. --config <path>      Explicit config file
3. ./namesmith.toml     Project-level config
4. ~/.config/namesmith/config.toml   Global config

Example:
  namesmith "A bakery that only sells sourdough"
  namesmith --once --format json "Budget travel app for students"
  namesmith --checker search --creator CreatorB --count 3
"#)]
pub struct Cli {
    /// Project brief (prompted for when omitted)
    pub brief: Option<String>,

    /// Skip the questions, run one generation round and exit
    #[arg(long)]
    pub once: bool,

    /// Output format: full, names or json
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Availability checker: rdap or search
    #[arg(long, value_name = "MODE")]
    pub checker: Option<String>,

    /// Available names wanted per round
    #[arg(short, long, value_name = "N", value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub target: Option<usize>,

    /// Only run these creators (can be specified multiple times)
    #[arg(long = "creator", value_name = "TAG")]
    pub creators: Vec<String>,

    /// Names requested from each creator per attempt
    #[arg(long, value_name = "N", value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub count: Option<usize>,

    /// Save the session as JSON under the session directory
    #[arg(long)]
    pub persist: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Per-session overrides from `--creator`, `--count` and `--target`
    pub fn session_settings(&self) -> SessionSettings {
        let active_creators = (!self.creators.is_empty()).then(|| {
            self.creators
                .iter()
                .map(|tag| CreatorTag::new(tag.trim()))
                .collect()
        });
        SessionSettings {
            active_creators,
            generation_count: self.count,
            target_count: self.target,
        }
    }
}
