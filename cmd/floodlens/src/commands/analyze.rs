//! `floodlens analyze`: cluster, score and rank.

use std::sync::Arc;

use anyhow::bail;
use clap::Args;
use floodlens_cluster::{Bisector, Cluster, CosineCohesion};
use floodlens_importance::ClusterScorer;
use floodlens_message::{AnalysisContext, analyze_dataset};
use floodlens_text::Cleaner;
use serde::Serialize;

use crate::Cli;
use crate::config::PipelineConfig;
use crate::input;

const LATEST: usize = 5;

#[derive(Args)]
pub struct AnalyzeCommand {
    /// JSON-lines message file
    #[arg(short = 'i', long)]
    input: String,

    /// Worker threads for bisection
    #[arg(long)]
    workers: Option<usize>,

    /// Cohesion at which a cluster stops splitting
    #[arg(long)]
    guard: Option<f64>,

    /// Minimum leaf cluster size
    #[arg(long)]
    min_leaf: Option<usize>,

    /// Number of clusters to report
    #[arg(long)]
    top: Option<usize>,

    /// Known location names, comma-separated
    #[arg(long, value_delimiter = ',')]
    locations: Vec<String>,

    /// Seed for reproducible clustering
    #[arg(long)]
    seed: Option<u64>,
}

/// One ranked cluster in the report.
#[derive(Debug, Serialize)]
pub struct ClusterReport {
    pub rank: usize,
    pub cluster: usize,
    pub label: String,
    pub score: f64,
    pub size: usize,
    pub cohesion: Option<f64>,
    pub latest: Vec<String>,
}

impl AnalyzeCommand {
    pub fn run(&self, cli: &Cli, mut cfg: PipelineConfig) -> anyhow::Result<()> {
        self.apply(&mut cfg);

        let messages = input::drop_false_alarms(input::read_messages(&self.input)?);
        if messages.is_empty() {
            bail!("no messages in {}", self.input);
        }

        let profile = analyze_dataset(&messages);
        tracing::info!(
            messages = messages.len(),
            language = %profile.language,
            keyword = %profile.keyword,
            "analyzing"
        );
        let ctx = Arc::new(AnalysisContext::from_profile(profile, cfg.locations.clone()));
        let cleaner = Arc::new(Cleaner::new(Arc::clone(&ctx)));

        let bisector = Bisector::with_cosine(cfg.bisect.clone(), Arc::clone(&cleaner));
        let mut clusters = bisector.run(messages)?;

        let scorer = ClusterScorer::new(cfg.scorer.clone(), ctx, CosineCohesion::new(cleaner));
        let order = scorer.rank_clusters(&mut clusters)?;

        let report = build_report(&clusters, &order, cfg.top());
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report, clusters.len());
        }
        Ok(())
    }

    /// Command-line flags override the config file.
    fn apply(&self, cfg: &mut PipelineConfig) {
        if let Some(workers) = self.workers {
            cfg.bisect.workers = workers;
        }
        if let Some(guard) = self.guard {
            cfg.bisect.guard = guard;
        }
        if let Some(min_leaf) = self.min_leaf {
            cfg.bisect.min_leaf_size = min_leaf;
        }
        if self.seed.is_some() {
            cfg.bisect.seed = self.seed;
        }
        if self.top.is_some() {
            cfg.top = self.top;
        }
        if !self.locations.is_empty() {
            cfg.locations = self.locations.clone();
        }
    }
}

fn build_report(clusters: &[Cluster], order: &[(usize, f64)], top: usize) -> Vec<ClusterReport> {
    order
        .iter()
        .take(top)
        .enumerate()
        .map(|(rank, &(index, score))| {
            let cluster = &clusters[index];
            ClusterReport {
                rank: rank + 1,
                cluster: index,
                label: cluster.label().to_string(),
                score,
                size: cluster.len(),
                cohesion: cluster.cohesion(),
                latest: cluster.latest(LATEST).iter().map(|m| m.text.clone()).collect(),
            }
        })
        .collect()
}

fn print_report(report: &[ClusterReport], total: usize) {
    println!("{total} clusters, {} ranked", report.len());
    for entry in report {
        println!();
        println!(
            "#{} [{}] score={:.6} size={} cohesion={}",
            entry.rank,
            entry.label,
            entry.score,
            entry.size,
            entry.cohesion.map_or_else(|| "-".to_string(), |c| format!("{c:.3}")),
        );
        for text in &entry.latest {
            println!("  - {}", text.replace('\n', " "));
        }
    }
}
