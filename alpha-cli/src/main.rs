//! Alpha CLI: every dashboard section from the command line.
//!
//! Commands:
//! - `news` headlines with optional server query, source and local search
//! - `financials lookup|compare` metric cards, statements, comparisons
//! - `screen` / `templates` stock screener
//! - `insiders trades|clusters` insider activity
//! - `macro` indicators, recession probability, HTML snapshot
//! - `alerts list|create|delete|test` alert rules
//!
//! Tables honor the global `--sort`, `--desc` and `--csv` options.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use alpha_client::driver::{self, drive};
use alpha_client::pages::{AlertsPage, FinancialsPage, InsidersPage, MacroPage, NewsPage, ScreenerPage};
use alpha_client::{ClientConfig, HttpBackend, Page, PanelView};
use alpha_core::format::{fmt_num, truncate};
use alpha_core::model::macro_data::{probability_label, FRED_SETUP_LINES, FRED_SIGNUP_URL};
use alpha_core::model::{AlertType, Freshness, StatementKind};
use alpha_core::table::Column;
use alpha_core::{TableModel, ToRecord};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "ALPHA_LOG";

/// Widest cell printed in text tables.
const MAX_CELL_WIDTH: usize = 48;

#[derive(Parser)]
#[command(name = "alpha", about = "Alpha Terminal CLI: news, financials, screener, insiders, macro, alerts")]
struct Cli {
    /// API base URL (overrides the config file and ALPHA_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Config file. Defaults to <config_dir>/alpha-terminal/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Sort table output by this column (key or header label).
    #[arg(long, global = true)]
    sort: Option<String>,

    /// Sort descending.
    #[arg(long, global = true, default_value_t = false)]
    desc: bool,

    /// Write table output as CSV to this path instead of printing it.
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Market headlines.
    News {
        /// Server-side search query.
        #[arg(long)]
        q: Option<String>,

        /// pd (past day), pw (past week) or pm (past month).
        #[arg(long)]
        freshness: Option<Freshness>,

        /// Only show this source.
        #[arg(long)]
        source: Option<String>,

        /// Local filter over title, description and tickers.
        #[arg(long)]
        search: Option<String>,

        /// Ask the server to score the listed headlines.
        #[arg(long, default_value_t = false)]
        score: bool,
    },
    /// Company financials.
    Financials {
        #[command(subcommand)]
        action: FinancialsAction,
    },
    /// Run the stock screener.
    Screen {
        /// Named template (see `templates`).
        #[arg(long)]
        template: Option<String>,

        /// Filter values, e.g. pe_max=20 roe_min=15.
        filters: Vec<String>,
    },
    /// List screener templates.
    Templates,
    /// Insider trading activity.
    Insiders {
        #[command(subcommand)]
        action: InsidersAction,
    },
    /// Macro indicators and recession probability.
    Macro {
        /// Write an HTML snapshot with SVG gauge and sparklines.
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Alert rules.
    Alerts {
        #[command(subcommand)]
        action: AlertsAction,
    },
}

#[derive(Subcommand)]
enum FinancialsAction {
    /// Metric cards and, optionally, one statement.
    Lookup {
        ticker: String,

        /// income, balance or cashflow.
        #[arg(long, value_parser = parse_statement)]
        statement: Option<StatementKind>,
    },
    /// Side-by-side metrics, e.g. `NVDA,AMD,INTC`.
    Compare { tickers: String },
}

#[derive(Subcommand)]
enum InsidersAction {
    /// Recent insider trades.
    Trades {
        /// Ticker; all tickers when omitted.
        #[arg(long)]
        ticker: Option<String>,

        /// Lookback window: 30, 60, 90 or 180.
        #[arg(long)]
        days: Option<u32>,
    },
    /// Tickers where several insiders are buying.
    Clusters,
}

#[derive(Subcommand)]
enum AlertsAction {
    /// List configured alerts.
    List,
    /// Create an alert.
    Create {
        #[arg(long)]
        name: String,

        /// insider_cluster, price_above, price_below, sentiment_bullish, sentiment_bearish.
        #[arg(long = "type", default_value = "insider_cluster")]
        alert_type: AlertType,

        #[arg(long, default_value = "")]
        ticker: String,

        #[arg(long, default_value = "")]
        threshold: String,
    },
    /// Delete an alert by id.
    Delete { id: i64 },
    /// Send a test notification.
    Test,
}

/// Table presentation options shared by every command.
struct Output {
    sort: Option<String>,
    desc: bool,
    csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let mut config = ClientConfig::load(cli.config.as_deref()).context("loading configuration")?;
    config.override_api_url(cli.api_url);
    let backend = HttpBackend::new(&config).context("building HTTP client")?;
    tracing::debug!(api = %backend.base_url(), "using API");

    let out = Output {
        sort: cli.sort,
        desc: cli.desc,
        csv: cli.csv,
    };

    match cli.command {
        Commands::News {
            q,
            freshness,
            source,
            search,
            score,
        } => run_news(&config, &backend, &out, q, freshness, source, search, score),
        Commands::Financials { action } => match action {
            FinancialsAction::Lookup { ticker, statement } => run_lookup(&backend, &out, &ticker, statement),
            FinancialsAction::Compare { tickers } => run_compare(&backend, &out, &tickers),
        },
        Commands::Screen { template, filters } => run_screen(&backend, &out, template, &filters),
        Commands::Templates => run_templates(&backend),
        Commands::Insiders { action } => match action {
            InsidersAction::Trades { ticker, days } => run_trades(&backend, &out, ticker, days),
            InsidersAction::Clusters => run_clusters(&backend),
        },
        Commands::Macro { snapshot } => run_macro(&backend, snapshot.as_deref()),
        Commands::Alerts { action } => run_alerts(&backend, &out, action),
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn parse_statement(s: &str) -> Result<StatementKind, String> {
    StatementKind::from_key(&s.to_ascii_lowercase())
        .ok_or_else(|| format!("unknown statement '{s}' (expected income, balance or cashflow)"))
}

/// `KEY=VALUE` screener override.
fn parse_filter(arg: &str) -> Result<(String, String)> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.trim().to_string())),
        _ => bail!("expected KEY=VALUE, got '{arg}'"),
    }
}

/// Print non-content states. Returns true when the page has content to show.
fn report(page: &dyn Page) -> Result<bool> {
    if let Some(status) = page.status() {
        eprintln!("{status}");
    }
    match page.view() {
        PanelView::Content => Ok(true),
        PanelView::Error(msg) => bail!("{msg}"),
        PanelView::Loading(_) => bail!("request did not complete"),
        PanelView::Placeholder(msg) => {
            println!("Not implemented yet.");
            if !msg.is_empty() {
                println!("{msg}");
            }
            Ok(false)
        }
        PanelView::SetupRequired => {
            println!("FRED API key required.");
            for line in FRED_SETUP_LINES {
                println!("  {line}");
            }
            println!("  {FRED_SIGNUP_URL}");
            Ok(false)
        }
        PanelView::Empty(msg) => {
            println!("{msg}");
            Ok(false)
        }
    }
}

// ── Table output ─────────────────────────────────────────────────────

impl Output {
    fn table(&self, table: &mut TableModel) -> Result<()> {
        if let Some(column) = &self.sort {
            table.sort_by(column, !self.desc)?;
        }
        match &self.csv {
            Some(path) => {
                let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
                table.to_csv(file)?;
                eprintln!("Wrote {} rows to {}", table.len(), path.display());
            }
            None => print!("{}", format_table(table)),
        }
        Ok(())
    }
}

/// Left-aligned text table in current sort order.
fn format_table(table: &TableModel) -> String {
    let headers = table.header_labels();
    let rows: Vec<Vec<String>> = table
        .rendered_rows()
        .into_iter()
        .map(|cells| cells.into_iter().map(|c| truncate(&c.text, MAX_CELL_WIDTH)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(headers.as_slice());
    out.push_str(&format!("{}\n", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1))));
    for row in &rows {
        out.push_str(&line(row.as_slice()));
    }
    out
}

// ── Commands ─────────────────────────────────────────────────────────

fn news_columns() -> Vec<Column> {
    vec![
        Column::text("source", "Source"),
        Column::text("title", "Title"),
        Column::text("tickers", "Tickers"),
        Column::text("sentiment", "Sentiment"),
        Column::text("age", "Age"),
        Column::text("url", "URL"),
    ]
}

#[allow(clippy::too_many_arguments)]
fn run_news(
    config: &ClientConfig,
    backend: &HttpBackend,
    out: &Output,
    q: Option<String>,
    freshness: Option<Freshness>,
    source: Option<String>,
    search: Option<String>,
    score: bool,
) -> Result<()> {
    let now = Instant::now();
    let mut page = NewsPage::new(config);

    let mut requests = match freshness {
        Some(f) => page.set_freshness(f),
        None => Vec::new(),
    };
    if let Some(q) = q {
        page.set_search(q, now);
        requests = page.submit();
    } else if requests.is_empty() {
        requests = page.refresh();
    }
    driver::run(&mut page, backend, requests, now);

    if let Some(source) = &source {
        page.select_source(source);
    }
    if let Some(text) = search {
        page.set_search(text, now);
        page.tick(now + config.debounce());
    }
    if !report(&page)? {
        return Ok(());
    }

    let counts = page.sentiment();
    if page.show_sentiment_bar() {
        let (bull, neutral, bear) = counts.percentages();
        eprintln!("Sentiment: bullish {bull:.0}%  neutral {neutral:.0}%  bearish {bear:.0}%");
    }

    let records = page.visible().into_iter().map(|a| a.to_record()).collect();
    let mut table = TableModel::with_rows(news_columns(), records);
    out.table(&mut table)?;

    if score {
        let requests = page.score_headlines();
        driver::run(&mut page, backend, requests, now);
        match page.scores() {
            Some(scores) => println!("{}", serde_json::to_string_pretty(scores)?),
            None => eprintln!("Headline scoring unavailable."),
        }
    }
    Ok(())
}

fn run_lookup(backend: &HttpBackend, out: &Output, ticker: &str, statement: Option<StatementKind>) -> Result<()> {
    let mut page = FinancialsPage::new();
    let requests = page.lookup_ticker(ticker);
    if requests.is_empty() {
        bail!("ticker must not be blank");
    }
    driver::run(&mut page, backend, requests, Instant::now());
    if !report(&page)? {
        return Ok(());
    }

    for (label, value) in page.metric_cards() {
        println!("{label:<20} {value}");
    }

    if let Some(kind) = statement {
        page.select_tab(kind);
        println!();
        println!("{}", kind.label());
        match page.statement_table() {
            Some(mut table) => out.table(&mut table)?,
            None => println!("No data available"),
        }
    }
    Ok(())
}

fn run_compare(backend: &HttpBackend, out: &Output, tickers: &str) -> Result<()> {
    let mut page = FinancialsPage::new();
    let requests = page.compare_tickers(tickers);
    if requests.is_empty() {
        bail!("tickers must not be blank");
    }
    driver::run(&mut page, backend, requests, Instant::now());
    if !report(&page)? {
        return Ok(());
    }
    match page.comparison_table() {
        Some(mut table) => out.table(&mut table),
        None => {
            println!("No data");
            Ok(())
        }
    }
}

fn run_screen(backend: &HttpBackend, out: &Output, template: Option<String>, filters: &[String]) -> Result<()> {
    if template.is_some() && !filters.is_empty() {
        bail!("--template and KEY=VALUE filters are mutually exclusive");
    }

    let now = Instant::now();
    let mut page = ScreenerPage::new();

    match template {
        Some(name) => {
            drive(&mut page, backend, now);
            if !page.templates().contains_key(&name) {
                let available: Vec<&str> = page.templates().keys().map(String::as_str).collect();
                bail!("unknown template '{name}' (available: {})", available.join(", "));
            }
            page.select_template(Some(name.as_str()));
        }
        None => {
            for arg in filters {
                let (key, value) = parse_filter(arg)?;
                if !page.filters().defs().iter().any(|d| d.key == key) {
                    let known: Vec<&str> = page.filters().defs().iter().map(|d| d.key.as_str()).collect();
                    bail!("unknown filter '{key}' (available: {})", known.join(", "));
                }
                page.filters_mut().set(&key, value);
            }
        }
    }

    let requests = page.run();
    driver::run(&mut page, backend, requests, now);
    if !report(&page)? {
        return Ok(());
    }
    out.table(page.table_mut())
}

fn run_templates(backend: &HttpBackend) -> Result<()> {
    let mut page = ScreenerPage::new();
    drive(&mut page, backend, Instant::now());
    if page.templates().is_empty() {
        println!("No templates available.");
        return Ok(());
    }
    for (key, tpl) in page.templates().iter() {
        println!("{key:<20} {}", tpl.name);
        if let Some(desc) = &tpl.description {
            println!("{:<20} {desc}", "");
        }
        let filters: Vec<String> = tpl.filters.iter().map(|(k, v)| format!("{k}={v}")).collect();
        if !filters.is_empty() {
            println!("{:<20} {}", "", filters.join(" "));
        }
    }
    Ok(())
}

fn run_trades(backend: &HttpBackend, out: &Output, ticker: Option<String>, days: Option<u32>) -> Result<()> {
    let mut page = InsidersPage::new();
    if let Some(ticker) = ticker {
        page.set_ticker(ticker);
    }
    if let Some(days) = days {
        if !page.set_days(days) {
            bail!("--days must be one of 30, 60, 90, 180");
        }
    }
    let requests = page.search_trades();
    driver::run(&mut page, backend, requests, Instant::now());
    if !report(&page)? {
        return Ok(());
    }
    match page.trades_mut() {
        Some(table) => out.table(table),
        None => Ok(()),
    }
}

fn run_clusters(backend: &HttpBackend) -> Result<()> {
    let mut page = InsidersPage::new();
    let requests = page.fetch_clusters();
    driver::run(&mut page, backend, requests, Instant::now());
    if !report(&page)? {
        return Ok(());
    }
    for cluster in page.clusters().unwrap_or_default() {
        println!("{}  ({} insiders buying)", cluster.ticker, cluster.insider_count);
        print!("{}", format_table(&InsidersPage::cluster_table(cluster)));
        println!();
    }
    Ok(())
}

fn run_macro(backend: &HttpBackend, snapshot: Option<&Path>) -> Result<()> {
    let mut page = MacroPage::new();
    drive(&mut page, backend, Instant::now());
    if !report(&page)? {
        return Ok(());
    }

    if let Some(p) = page.recession().and_then(|r| r.probability) {
        println!("Recession probability: {}", probability_label(p));
        println!();
    }
    if let Some(overview) = page.overview() {
        for (key, category) in overview.categories.iter() {
            println!("{}", category.title(key));
            for ind in &category.indicators {
                let change = ind.change_display().map(|(text, _)| text).unwrap_or_default();
                println!("  {:<32} {:>12} {:>10}", truncate(&ind.name, 30), fmt_num(ind.value), change);
            }
            println!();
        }
    }

    if let Some(path) = snapshot {
        let html = page.snapshot().unwrap_or_default();
        fs::write(path, html).with_context(|| format!("writing {}", path.display()))?;
        eprintln!("Snapshot written to {}", path.display());
    }
    Ok(())
}

fn run_alerts(backend: &HttpBackend, out: &Output, action: AlertsAction) -> Result<()> {
    let now = Instant::now();
    let mut page = AlertsPage::new();
    let requests = match action {
        AlertsAction::List => page.reload(),
        AlertsAction::Create {
            name,
            alert_type,
            ticker,
            threshold,
        } => {
            let form = page.form_mut();
            form.name = name;
            form.alert_type = alert_type;
            form.ticker = ticker;
            form.threshold = threshold;
            let requests = page.create();
            if requests.is_empty() {
                bail!("--name must not be blank");
            }
            requests
        }
        AlertsAction::Delete { id } => page.delete(id),
        AlertsAction::Test => page.test_notification(),
    };
    driver::run(&mut page, backend, requests, now);

    if let Some(notice) = page.notice() {
        if notice.is_error() {
            bail!("{}", notice.text());
        }
        println!("{}", notice.text());
        return Ok(());
    }
    if !report(&page)? {
        return Ok(());
    }

    let mut table = TableModel::from_items(
        vec![
            Column::number("id", "ID"),
            Column::text("name", "Name"),
            Column::text("alert_type", "Type"),
            Column::text("status", "Status"),
            Column::text("last_triggered", "Last Triggered"),
        ],
        page.alerts(),
    );
    out.table(&mut table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alpha_core::Record;

    #[test]
    fn filter_args() {
        assert_eq!(parse_filter("pe_max=20").unwrap(), ("pe_max".to_string(), "20".to_string()));
        assert_eq!(parse_filter("52w_change_min=-5").unwrap().1, "-5");
        assert!(parse_filter("pe_max").is_err());
        assert!(parse_filter("=5").is_err());
    }

    #[test]
    fn statement_names() {
        assert_eq!(parse_statement("Balance"), Ok(StatementKind::Balance));
        assert!(parse_statement("equity").is_err());
    }

    #[test]
    fn text_table_is_aligned() {
        let table = TableModel::with_rows(
            vec![Column::text("ticker", "Ticker"), Column::text("name", "Name")],
            vec![
                Record::new().with("ticker", "NVDA").with("name", "NVIDIA"),
                Record::new().with("ticker", "A").with("name", "Agilent"),
            ],
        );
        let text = format_table(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Ticker  Name");
        assert_eq!(lines[2], "NVDA    NVIDIA");
        assert_eq!(lines[3], "A       Agilent");
    }

    #[test]
    fn csv_output_respects_sort() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let out = Output {
            sort: Some("ticker".into()),
            desc: true,
            csv: Some(path.clone()),
        };
        let mut table = TableModel::with_rows(
            vec![Column::text("ticker", "Ticker")],
            vec![Record::new().with("ticker", "AAPL"), Record::new().with("ticker", "MSFT")],
        );
        out.table(&mut table).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().collect::<Vec<_>>(), vec!["Ticker", "MSFT", "AAPL"]);
    }

    #[test]
    fn unknown_sort_column_is_an_error() {
        let out = Output {
            sort: Some("nope".into()),
            desc: false,
            csv: None,
        };
        let mut table = TableModel::new(vec![Column::text("ticker", "Ticker")]);
        assert!(out.table(&mut table).is_err());
    }

    #[test]
    fn cli_parses_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["alpha", "screen", "pe_max=20", "--sort", "pe_ratio", "--desc"]).unwrap();
        assert_eq!(cli.sort.as_deref(), Some("pe_ratio"));
        assert!(cli.desc);
        assert!(matches!(cli.command, Commands::Screen { ref filters, .. } if filters == &vec!["pe_max=20".to_string()]));
    }
}
