use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::controller::{
    Controller, ControllerOptions, PaginationMode, DEFAULT_CONCURRENCY, DEFAULT_LIMIT,
    DEFAULT_PAGE_SIZE,
};
use crate::fetcher::{self, HttpFetcher, HttpOptions};
use crate::output::{self, OutputFormat};
use crate::utils::{self, log};

const HELP: &str = "commands:
  n, next          next page
  p, prev          previous page
  /TEXT, f TEXT    filter by name (\"/\" or \"f\" alone clears it)
  g N              go to page N (client mode)
  r, reload        fetch the current page again
  h, help          this help
  q, quit          exit";

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

/// One line of interactive input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Show,
    Next,
    Prev,
    Filter(String),
    Page(usize),
    Reload,
    Help,
    Quit,
    Unknown(String),
}

pub(crate) fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix('/') {
        return Command::Filter(rest.trim().to_string());
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    match head.to_lowercase().as_str() {
        "" => Command::Show,
        "n" | "next" => Command::Next,
        "p" | "prev" | "previous" => Command::Prev,
        "f" | "filter" => Command::Filter(rest.to_string()),
        "g" | "goto" => match utils::parse_positive_usize(rest) {
            Ok(page) => Command::Page(page),
            Err(_) => Command::Unknown(line.to_string()),
        },
        "r" | "reload" => Command::Reload,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

#[derive(Clone, Debug)]
struct RunConfig {
    controller: ControllerOptions,
    http: HttpOptions,
    filter: Option<String>,
    page: Option<usize>,
    non_interactive: bool,
    output: Option<String>,
    output_format: OutputFormat,
    no_color: bool,
    verbose: u8,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let endpoint = args
        .endpoint
        .or(cfg.endpoint)
        .unwrap_or_else(|| fetcher::DEFAULT_ENDPOINT.to_string());
    if reqwest::Url::parse(endpoint.trim()).is_err() {
        return Err(format!("invalid endpoint '{endpoint}'"));
    }

    let mode_raw = args
        .mode
        .or(cfg.mode)
        .unwrap_or_else(|| PaginationMode::Cursor.label().to_string());
    let mode = PaginationMode::parse(&mode_raw)
        .ok_or_else(|| format!("invalid mode '{mode_raw}', expected cursor or client"))?;
    if args.page.is_some() && mode == PaginationMode::Cursor {
        return Err("--page needs client mode; cursor mode only follows next/previous".to_string());
    }

    let page_size = args.page_size.or(cfg.page_size).unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 {
        return Err("invalid page_size, expected positive integer".to_string());
    }
    let limit = args.limit.or(cfg.limit).unwrap_or(DEFAULT_LIMIT);
    if limit == 0 {
        return Err("invalid limit, expected positive integer".to_string());
    }
    let concurrency = args
        .concurrency
        .or(cfg.concurrency)
        .unwrap_or(DEFAULT_CONCURRENCY);
    if concurrency == 0 {
        return Err("invalid concurrency, expected positive integer".to_string());
    }
    let timeout = args.timeout.or(cfg.timeout).unwrap_or(10);
    if timeout == 0 {
        return Err("invalid timeout, expected positive integer".to_string());
    }

    let output_path = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output_format '{raw}', expected text or json"))?,
        None => output_path
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    Ok(RunConfig {
        controller: ControllerOptions {
            endpoint,
            mode,
            page_size,
            limit: Some(limit),
            concurrency,
        },
        http: HttpOptions {
            timeout_seconds: timeout,
            proxy: args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty()),
            rate: args.rate.or(cfg.rate).filter(|r| *r > 0),
        },
        filter: args.filter,
        page: args.page,
        non_interactive: args.non_interactive,
        output: output_path,
        output_format,
        no_color,
        verbose: args.verbose,
    })
}

fn build_progress_bar(hidden: bool) -> Result<ProgressBar, String> {
    let pb = ProgressBar::new(1);
    if hidden {
        pb.set_draw_target(ProgressDrawTarget::hidden());
        return Ok(pb);
    }
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::with_template(":: Loading: [{pos}/{len}] :: Duration: [{elapsed_precise}]")
            .map_err(|e| format!("failed to build progress bar style: {e}"))?
            .progress_chars(r#"#>-"#),
    );
    Ok(pb)
}

// Expected record count for the bar; the index is not known up front.
fn expected_len(options: &ControllerOptions) -> u64 {
    match options.mode {
        PaginationMode::Cursor => options.page_size as u64,
        PaginationMode::Client => options.limit.unwrap_or(DEFAULT_LIMIT) as u64,
    }
}

fn arm_progress(pb: &ProgressBar, len: u64) {
    pb.reset();
    pb.set_length(len.max(1));
    pb.enable_steady_tick(Duration::from_millis(200));
}

async fn write_output(
    path: &str,
    format: OutputFormat,
    ctrl: &Controller<HttpFetcher>,
) -> Result<(), String> {
    let records = output::build_records(&ctrl.compute_visible_slice());
    let rendered =
        output::render(format, &records).map_err(|e| format!("failed to render output: {e}"))?;
    let mut outfile = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| format!("failed to open output file: {e}"))?;
    outfile
        .write_all(&rendered)
        .await
        .map_err(|_| "failed to write output file".to_string())?;
    log::info(&format!("wrote {} records to {path}", records.len()));
    Ok(())
}

async fn show(run: &RunConfig, ctrl: &Controller<HttpFetcher>) -> Result<(), String> {
    println!();
    print!("{}", output::render_page(ctrl));
    if let Some(path) = run.output.as_deref() {
        write_output(path, run.output_format, ctrl).await?;
    }
    Ok(())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    log::set_verbosity(run.verbose);

    format_kv_line("Endpoint", &run.controller.endpoint);
    format_kv_line("Mode", run.controller.mode.label());
    format_kv_line("Page size", &run.controller.page_size.to_string());
    if run.controller.mode == PaginationMode::Client {
        format_kv_line("Limit", &run.controller.limit.unwrap_or(DEFAULT_LIMIT).to_string());
    }

    let pb = build_progress_bar(run.non_interactive)?;
    let http = HttpFetcher::new(&run.http)
        .map_err(|e| e.to_string())?
        .with_progress(pb.clone());
    let mut ctrl =
        Controller::new(http, run.controller.clone()).map_err(|e| e.to_string())?;
    let bar_len = expected_len(ctrl.options());

    arm_progress(&pb, bar_len);
    let loaded = ctrl.load_records().await;
    pb.finish_and_clear();
    if let Err(e) = loaded {
        if run.non_interactive {
            return Err(format!("failed to load records: {e}"));
        }
    }

    if let Some(filter) = run.filter.as_deref() {
        ctrl.set_filter(filter);
    }
    if let Some(page) = run.page {
        ctrl.go_to_page(page);
    }

    show(&run, &ctrl).await?;
    if run.non_interactive {
        return Ok(());
    }

    println!("{}", "type h for help".dimmed());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(format!("failed to read input: {e}")),
        };
        let moved = match parse_command(&line) {
            Command::Quit => break,
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Unknown(raw) => {
                log::warn(&format!("unknown command '{raw}', type h for help"));
                continue;
            }
            Command::Show => Ok(true),
            Command::Filter(text) => {
                ctrl.set_filter(&text);
                Ok(true)
            }
            Command::Page(page) => {
                if ctrl.mode() == PaginationMode::Cursor {
                    log::warn("goto is only available in client mode");
                    continue;
                }
                ctrl.go_to_page(page);
                Ok(true)
            }
            Command::Next => {
                arm_progress(&pb, bar_len);
                let r = ctrl.go_to_next_page().await;
                pb.finish_and_clear();
                r
            }
            Command::Prev => {
                arm_progress(&pb, bar_len);
                let r = ctrl.go_to_prev_page().await;
                pb.finish_and_clear();
                r
            }
            Command::Reload => {
                arm_progress(&pb, bar_len);
                let r = ctrl.load_records().await.map(|_| true);
                pb.finish_and_clear();
                r
            }
        };
        match moved {
            Ok(true) => show(&run, &ctrl).await?,
            Ok(false) => log::info("already at the boundary"),
            // already logged by the controller; prior records stay on screen
            Err(_) => show(&run, &ctrl).await?,
        }
    }

    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

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
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
