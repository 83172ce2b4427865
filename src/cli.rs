//! Command-line interface definition using clap.
//!
//! [`Args`] maps one-to-one onto [`PipelineConfig`]; anything left out keeps
//! the library default.
//!
//! ```rust
//! use clap::Parser;
//! use chat_timeline::cli::Args;
//! use chat_timeline::config::PipelineConfig;
//!
//! let args = Args::parse_from(["chat-timeline", "--instagram", "message_1.json", "--instagram", "message_2.json"]);
//! let config = PipelineConfig::from(args);
//! assert_eq!(config.instagram_files.len(), 2);
//! assert_eq!(config.whatsapp_files[0].to_str(), Some("whatsapp.txt"));
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::config::{InstagramConfig, Participant, Participants, PipelineConfig};

/// Merge WhatsApp and Instagram chat exports into one normalized timeline.
#[derive(Parser, Debug, Clone)]
#[command(name = "chat-timeline")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chat-timeline
    chat-timeline --source-dir exports -o public/data
    chat-timeline --whatsapp chat.txt --instagram message_1.json --instagram message_2.json
    chat-timeline --first me --first-alias \"Alex Kim\" --second them --second-alias sam_ig")]
pub struct Args {
    /// Directory holding the raw exports
    #[arg(long, value_name = "DIR", default_value = "data/raw")]
    pub source_dir: PathBuf,

    /// Directory receiving the processed JSON files
    #[arg(short, long, value_name = "DIR", default_value = "data/processed")]
    pub output_dir: PathBuf,

    /// Directory holding timezone_config.json
    #[arg(long, value_name = "DIR", default_value = "config")]
    pub config_dir: PathBuf,

    /// WhatsApp export file, relative to the source dir (repeatable)
    #[arg(long = "whatsapp", value_name = "FILE")]
    pub whatsapp_files: Vec<PathBuf>,

    /// Instagram export file, relative to the source dir (repeatable)
    #[arg(long = "instagram", value_name = "FILE")]
    pub instagram_files: Vec<PathBuf>,

    /// Identifier of the first participant
    #[arg(long, value_name = "ID", default_value = "You")]
    pub first: String,

    /// Identifier of the second participant
    #[arg(long, value_name = "ID", default_value = "Partner")]
    pub second: String,

    /// Export name that belongs to the first participant (repeatable)
    #[arg(long, value_name = "NAME")]
    pub first_alias: Vec<String>,

    /// Export name that belongs to the second participant (repeatable)
    #[arg(long, value_name = "NAME")]
    pub second_alias: Vec<String>,

    /// Keep Instagram text exactly as exported (skip Mojibake repair)
    #[arg(long)]
    pub no_fix_encoding: bool,
}

fn participant(id: String, aliases: Vec<String>) -> Participant {
    aliases
        .into_iter()
        .fold(Participant::new(id), Participant::with_alias)
}

impl From<Args> for PipelineConfig {
    fn from(args: Args) -> Self {
        let mut config = PipelineConfig::new()
            .with_source_dir(args.source_dir)
            .with_output_dir(args.output_dir)
            .with_config_dir(args.config_dir)
            .with_participants(
                Participants::default()
                    .with_first(participant(args.first, args.first_alias))
                    .with_second(participant(args.second, args.second_alias)),
            )
            .with_instagram_config(InstagramConfig::new().with_fix_encoding(!args.no_fix_encoding));

        if !args.whatsapp_files.is_empty() {
            config = config.with_whatsapp_files(args.whatsapp_files);
        }
        if !args.instagram_files.is_empty() {
            config = config.with_instagram_files(args.instagram_files);
        }
        config
    }
}
