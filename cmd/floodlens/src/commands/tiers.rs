//! `floodlens tiers`: posting-frequency account tiers.

use clap::Args;
use floodlens_jenks::{JenksError, WordList, classify_accounts};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::Cli;
use crate::config::PipelineConfig;
use crate::input;

#[derive(Args)]
pub struct TiersCommand {
    /// JSON-lines message file
    #[arg(short = 'i', long)]
    input: String,

    /// News account word list, one entry per line
    #[arg(long)]
    news: Option<String>,

    /// Warning word list, one entry per line
    #[arg(long)]
    warnings: Option<String>,

    /// Number of tiers
    #[arg(long)]
    classes: Option<usize>,

    /// Seed for random subsets
    #[arg(long)]
    seed: Option<u64>,
}

impl TiersCommand {
    pub fn run(&self, cli: &Cli, mut cfg: PipelineConfig) -> anyhow::Result<()> {
        if let Some(classes) = self.classes {
            cfg.tiers.classes = classes;
        }
        let news = match &self.news {
            Some(path) => input::read_word_list(path)?,
            None => WordList::default(),
        };
        let warnings = match &self.warnings {
            Some(path) => input::read_word_list(path)?,
            None => WordList::default(),
        };

        let messages = input::read_messages(&self.input)?;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let tiers = match classify_accounts(&messages, &news, &warnings, &cfg.tiers, &mut rng) {
            Ok(tiers) => tiers,
            Err(JenksError::InsufficientData { distinct, required }) => {
                tracing::warn!(distinct, required, "too few distinct posting counts, tiering skipped");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&tiers)?);
            return Ok(());
        }

        let bounds: Vec<String> = tiers.breaks.iter().map(|b| format!("{b}")).collect();
        println!("breaks: {}", bounds.join(", "));
        for (i, users) in tiers.tiers.iter().enumerate() {
            println!("tier {i}: {} accounts", users.len());
        }
        println!("news:    {}", tiers.news.join(", "));
        println!("warning: {}", tiers.warning.join(", "));
        println!("spam:    {}", tiers.spam.join(", "));
        Ok(())
    }
}
