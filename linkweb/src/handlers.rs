use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use linkweb_core::config::{CrawlConfig, GraphKind, ScraperKind};
use linkweb_core::crawl::{ProgressCallback, Strategy};
use linkweb_core::domain::DomainClassifier;
use linkweb_core::error::{ConfigError, CrawlError};
use linkweb_core::report::{CrawlReport, ReportFormat, generate_batch_report, save_report};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Everything the crawl subcommand needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct CrawlArgs {
    pub configs: Vec<CrawlConfig>,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
    pub quiet: bool,
}

/// Log to stderr, filtered by `RUST_LOG` and defaulting to warnings.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Turn parsed `crawl` arguments into the configs to run.
pub fn crawl_args_from_matches(args: &ArgMatches, quiet: bool) -> Result<CrawlArgs, ConfigError> {
    let seed = args
        .get_one::<Url>("url")
        .cloned()
        .ok_or(ConfigError::MissingSeed)?;
    let workers = args.get_one::<usize>("workers").copied().unwrap_or(10);
    let timeout_secs = args.get_one::<u64>("timeout").copied().unwrap_or(10);

    let configs = if args.get_flag("every-config") {
        CrawlConfig::every(&seed, workers, timeout_secs)
    } else {
        let graph = args.get_one::<GraphKind>("graph").copied().unwrap_or_default();
        let scraper = args
            .get_one::<ScraperKind>("scraper")
            .copied()
            .unwrap_or_default();
        let strategy = args
            .get_one::<Strategy>("strategy")
            .copied()
            .unwrap_or_default()
            .with_workers(workers);

        vec![CrawlConfig {
            seed,
            graph,
            scraper,
            strategy,
            timeout_secs,
        }]
    };

    for config in &configs {
        config.validate()?;
    }

    let format = args
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);

    Ok(CrawlArgs {
        configs,
        format,
        output: args.get_one::<PathBuf>("output").cloned(),
        quiet,
    })
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Starting crawl...");
    pb
}

/// Run one configured crawl and summarize it.
pub async fn run_config(
    config: &CrawlConfig,
    classifier: Arc<DomainClassifier>,
    show_progress: bool,
) -> Result<CrawlReport, CrawlError> {
    let mut crawler = config.build_crawler(classifier)?;

    let progress_bar = show_progress.then(spinner);
    if let Some(ref pb) = progress_bar {
        let pb_clone = pb.clone();
        let processed = Arc::new(AtomicUsize::new(0));
        let callback: ProgressCallback = Arc::new(move |url: &str| {
            let count = processed.fetch_add(1, Ordering::Relaxed) + 1;
            pb_clone.set_message(format!("Crawling... {} URLs processed ({})", count, url));
        });
        crawler = crawler.with_progress_callback(callback);
    }

    info!("Running {}", config.label());
    let start = Instant::now();
    let outcome = crawler.run(config.seed.as_str()).await;
    let elapsed = start.elapsed();

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    let graph = outcome?;
    Ok(CrawlReport::new(config, graph.as_ref(), elapsed))
}

/// Run every requested crawl, then print or save the combined report.
pub async fn handle_crawl(args: CrawlArgs) -> anyhow::Result<()> {
    let CrawlArgs {
        configs,
        format,
        output,
        quiet,
    } = args;

    // Loading the suffix list is the slow part of setup; do it once.
    let classifier = Arc::new(DomainClassifier::new());
    let show_progress = !quiet;

    let mut reports = Vec::with_capacity(configs.len());
    for (idx, config) in configs.iter().enumerate() {
        if !quiet {
            eprintln!(
                "{} [{}/{}] {} → {}",
                "→".blue(),
                idx + 1,
                configs.len(),
                config.seed.as_str().bright_white(),
                config.label()
            );
        }
        reports.push(run_config(config, classifier.clone(), show_progress).await?);
    }

    let rendered = generate_batch_report(&reports, format)?;
    match output {
        Some(path) => {
            save_report(&rendered, &path)?;
            if !quiet {
                eprintln!(
                    "{} Report saved to {}",
                    "✓".green().bold(),
                    path.display()
                );
            }
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
