use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget};
use log::{error, info};

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::feed::{self, FeedSource};
use crate::filter::{FilterCriteria, GateFilter};
use crate::output;
use crate::report::Report;
use crate::ui::app::{AppOptions, DashboardApp};
use crate::ui::{self, UiContext};
use crate::upload;
use crate::utils;

fn print_banner() {
    const BANNER: &str = r#"
                      _           _
   _____   _____   __| | __ _ ___| |__
  / _ \ \ / / _ \ / _` |/ _` / __| '_ \
 |  __/\ V / (_) | (_| | (_| \__ \ | | |
  \___| \_/ \___/ \__,_|\__,_|___/_| |_|

       v0.3.2 - evolution report gate review
    "#;
    print!("{}", BANNER);
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub feed: FeedSource,
    pub criteria: FilterCriteria,
    pub once: bool,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub no_color: bool,
    pub log_file: String,
    pub timeout: usize,
    pub proxy: String,
    pub workers: usize,
    pub upload_endpoint: String,
    pub upload_extensions: Vec<String>,
    pub preview_enabled: bool,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let feed_raw = args
        .feed
        .or(cfg.feed)
        .unwrap_or_else(|| "data/reports.json".to_string());
    let feed = FeedSource::parse(&config::expand_tilde_string(&feed_raw));

    let gate_raw = args.gate.or(cfg.gate).unwrap_or_default();
    let gate = GateFilter::parse(&gate_raw)
        .ok_or_else(|| format!("invalid gate filter '{gate_raw}', expected all, pass, or fail"))?;
    let query = args.query.or(cfg.query).unwrap_or_default();
    let min_score = args.min_score.or(cfg.min_score).unwrap_or(0.0);
    if !min_score.is_finite() {
        return Err("invalid min_score, expected a finite number".to_string());
    }

    let timeout = args.timeout.or(cfg.timeout).unwrap_or(10);
    if timeout == 0 {
        return Err("invalid timeout, expected a positive number of seconds".to_string());
    }
    let proxy = args.proxy.or(cfg.proxy).unwrap_or_default();
    let workers = args.workers.or(cfg.workers).unwrap_or(4);
    if workers == 0 {
        return Err("invalid workers, expected a positive integer".to_string());
    }

    let upload_endpoint = args
        .upload_endpoint
        .or(cfg.upload_endpoint)
        .unwrap_or_else(|| upload::PLACEHOLDER_ENDPOINT.to_string());
    let upload_extensions_raw = args
        .upload_extensions
        .or(cfg.upload_extensions)
        .unwrap_or_default();
    let upload_extensions = if upload_extensions_raw.trim().is_empty() {
        upload::DEFAULT_ALLOWED_EXTENSIONS
            .iter()
            .map(|s| s.to_string())
            .collect()
    } else {
        utils::parse_extensions_csv(&upload_extensions_raw)
            .map_err(|e| format!("invalid upload_extensions '{upload_extensions_raw}': {e}"))?
    };

    let preview_enabled = !(args.no_preview || cfg.no_preview.unwrap_or(false));

    let log_file = args
        .log_file
        .or(cfg.log_file)
        .unwrap_or_else(|| "evodash.log".to_string());

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = args.output_format.or(cfg.output_format);
    if let Some(fmt) = output_format.as_deref() {
        if output::OutputFormat::parse(fmt).is_none() {
            return Err(format!(
                "invalid output_format '{fmt}', expected text, json, or html"
            ));
        }
    }

    Ok(RunConfig {
        feed,
        criteria: FilterCriteria {
            query,
            gate,
            min_score,
        },
        once: args.once,
        output,
        output_format,
        no_color,
        log_file: config::expand_tilde_string(&log_file),
        timeout,
        proxy,
        workers,
        upload_endpoint,
        upload_extensions,
        preview_enabled,
    })
}

fn build_http_client(run: &RunConfig) -> Result<reqwest::Client, String> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static("evodash/0.3"),
    );
    let builder = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(run.timeout.try_into().unwrap_or(10)));
    let builder = if run.proxy.is_empty() {
        builder
    } else {
        let proxy = reqwest::Proxy::all(run.proxy.clone())
            .map_err(|e| format!("Could not setup proxy, err: {e}"))?;
        builder.proxy(proxy)
    };
    builder
        .build()
        .map_err(|e| format!("failed to build http client: {e}"))
}

// The dashboard owns the terminal, so interactive runs log to a file;
// --once keeps the usual stderr logger.
fn init_logging(run: &RunConfig) -> Result<(), String> {
    let env = env_logger::Env::default().filter_or("EVODASH_LOG", "info");
    let mut builder = env_logger::Builder::from_env(env);
    if !run.once {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&run.log_file)
            .map_err(|e| format!("failed to open log file '{}': {e}", run.log_file))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder
        .try_init()
        .map_err(|e| format!("failed to initialize logging: {e}"))
}

fn print_card(record: &output::CardRecord) {
    let badge = if record.gate_passed {
        "passed".bold().green()
    } else {
        "not passed".bold().red()
    };
    println!("{} [{}]", record.title.bold(), badge);
    println!(
        "  domain: {}  version: {}  updated: {}",
        record.domain, record.id, record.updated_at
    );
    println!("  score: {} / {}", record.score, record.threshold);
    println!(
        "  law: {}  qspec: {}  qevr: {}",
        record.law_file, record.qspec_file, record.qevr_file
    );
    if let Some(url) = record.report_html.as_deref() {
        println!("  report: {}", url.cyan());
    }
    println!();
}

fn run_once(run: &RunConfig, loaded: Result<Vec<Report>, feed::FeedError>) -> Result<(), String> {
    print_banner();
    format_kv_line("Feed", &run.feed.describe());
    format_kv_line(
        "Filters",
        &format!(
            "query={} gate={} min-score={:.2}",
            if run.criteria.query.is_empty() {
                "-"
            } else {
                run.criteria.query.as_str()
            },
            run.criteria.gate.label(),
            run.criteria.min_score,
        ),
    );
    println!();

    let reports = loaded.map_err(|e| format!("failed to load reports feed: {e}"))?;

    let selected: Vec<&Report> = run
        .criteria
        .apply(&reports)
        .into_iter()
        .map(|i| &reports[i])
        .collect();
    let records = output::build_records(&selected);

    for record in &records {
        print_card(record);
    }
    if records.is_empty() {
        println!("{}", "no evolution reports match the current filters".dimmed());
    } else {
        println!(
            ":: showing {} of {} evolution reports ::",
            records.len(),
            reports.len()
        );
    }

    if let Some(path) = run.output.as_ref() {
        let format = run
            .output_format
            .as_deref()
            .and_then(output::OutputFormat::parse)
            .or_else(|| output::infer_format_from_path(path))
            .unwrap_or(output::OutputFormat::Text);
        let rendered = match format {
            output::OutputFormat::Text => output::render_text(&records),
            output::OutputFormat::Json => output::render_json(&records),
            output::OutputFormat::Html => output::render_html(&records),
        };
        std::fs::write(path, rendered)
            .map_err(|e| format!("failed to write output file '{path}': {e}"))?;
        format_kv_line("Saved", path);
    }

    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = CliArgs::parse();

    if args.init_config {
        let path = match args.config.as_deref() {
            Some(p) => config::expand_tilde(p),
            None => config::default_config_path()
                .ok_or_else(|| "could not determine home directory".to_string())?,
        };
        config::ensure_default_config_file(&path)?;
        format_kv_line("Config", &path.display().to_string());
        return Ok(());
    }

    let cfg = match args.config.as_deref() {
        Some(p) => config::load_config(&config::expand_tilde(p), false)?,
        None => match config::default_config_path() {
            Some(p) => config::load_config(&p, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    init_logging(&run)?;
    ui::controls::validate()?;

    if run.no_color {
        colored::control::set_override(false);
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(run.workers)
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    let client = build_http_client(&run)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_draw_target(ProgressDrawTarget::stderr());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message("loading evolution reports...");

    info!("loading feed from {}", run.feed.describe());
    let loaded = rt.block_on(feed::load_reports(&client, &run.feed));
    spinner.finish_and_clear();
    match &loaded {
        Ok(reports) => info!("loaded {} evolution reports", reports.len()),
        Err(e) => error!("feed load failed: {e}"),
    }

    if run.once {
        return run_once(&run, loaded);
    }

    let mut app = DashboardApp::new(AppOptions {
        upload_endpoint: run.upload_endpoint.clone(),
        allowed_extensions: run.upload_extensions.clone(),
        preview_enabled: run.preview_enabled,
        initial_criteria: run.criteria.clone(),
    });
    app.apply_load(loaded);

    let ctx = UiContext {
        client,
        handle: rt.handle().clone(),
        feed: run.feed.clone(),
    };
    ui::run(&mut app, &ctx)
}
