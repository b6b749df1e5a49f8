use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, WrapErr};
use wp_docs::{DocSource, DocViewer, HttpDocSource};
use wp_workbench::config::{DOC_BASE_VAR, ENDPOINT_VAR, TIMEOUT_VAR};
use wp_workbench::telemetry::{self, TelemetryConfig};
use wp_workbench::{
    HttpRemoteEngine, Panel, ParsedField, RemoteEngine, ResultPanel, ViewMode, Workbench,
    WorkbenchConfig,
};

#[derive(Parser)]
#[command(version, about = "wp - debug log parse rules and OML transforms against a remote engine", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Engine base URL
    #[arg(long, global = true, env = ENDPOINT_VAR)]
    endpoint: Option<String>,

    /// Document server base URL (defaults to the endpoint)
    #[arg(long, global = true, env = DOC_BASE_VAR)]
    doc_base: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = TIMEOUT_VAR)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the navigation tree of a local SUMMARY.md
    Outline {
        file: PathBuf,

        /// Print the forest as JSON
        #[arg(long)]
        json: bool,

        /// Keep only entries whose title matches, plus their ancestors
        #[arg(long)]
        filter: Option<String>,
    },
    /// Print the help-center outline, or one document, from the doc server
    Docs {
        /// Document path relative to the doc root
        path: Option<String>,
    },
    /// Show the engine version
    Version,
    /// Parse a log file with a rule file
    Parse {
        #[arg(long)]
        rules: PathBuf,
        #[arg(long)]
        logs: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Transform the engine's last parsed record with an OML script
    Transform {
        #[arg(long)]
        oml: PathBuf,
        /// Parse these first
        #[arg(long, requires = "logs")]
        rules: Option<PathBuf>,
        #[arg(long, requires = "rules")]
        logs: Option<PathBuf>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Run the built-in nginx sample through parse and transform
    Sample {
        #[command(flatten)]
        view: ViewArgs,
    },
}

#[derive(clap::Args, Clone, Copy)]
struct ViewArgs {
    /// Print the record as JSON instead of a table
    #[arg(long)]
    json: bool,
    /// Hide fields with empty values
    #[arg(long)]
    hide_empty: bool,
}

impl ViewArgs {
    fn apply(self, panel: &mut ResultPanel) {
        panel.view.mode = if self.json {
            ViewMode::Json
        } else {
            ViewMode::Table
        };
        panel.view.show_empty = !self.hide_empty;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_miette();
    telemetry::init(TelemetryConfig::from_env("wp-cli").with_level(tracing::Level::WARN));

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Outline { file, json, filter } => outline(&file, json, filter.as_deref())?,
        Commands::Docs { path } => docs(&config, path.as_deref()).await?,
        Commands::Version => {
            let engine = HttpRemoteEngine::new(&config)?;
            let info = engine.version().await?;
            println!("{}", info.label());
        }
        Commands::Parse { rules, logs, view } => {
            let engine = HttpRemoteEngine::new(&config)?;
            let mut bench = Workbench::new();
            bench.set_text(Panel::Rules, read(&rules)?);
            bench.set_text(Panel::Logs, read(&logs)?);
            view.apply(bench.parse_result_mut());
            bench.run_parse(&engine).await;
            print_panel(bench.parse_result())?;
        }
        Commands::Transform {
            oml,
            rules,
            logs,
            view,
        } => {
            let engine = HttpRemoteEngine::new(&config)?;
            let mut bench = Workbench::new();
            if let (Some(rules), Some(logs)) = (rules, logs) {
                bench.set_text(Panel::Rules, read(&rules)?);
                bench.set_text(Panel::Logs, read(&logs)?);
                bench.run_parse(&engine).await;
                if let Some(failure) = bench.parse_result().error() {
                    return Err(miette::miette!("parse failed: {failure}"));
                }
            }
            bench.set_text(Panel::Oml, read(&oml)?);
            view.apply(bench.transform_result_mut());
            bench.run_transform(&engine).await?;
            print_panel(bench.transform_result())?;
        }
        Commands::Sample { view } => {
            let engine = HttpRemoteEngine::new(&config)?;
            let mut bench = Workbench::new();
            view.apply(bench.parse_result_mut());
            view.apply(bench.transform_result_mut());
            bench.run_sample(&engine).await;
            println!("# parse");
            print_panel(bench.parse_result())?;
            bench.run_transform(&engine).await?;
            println!("\n# transform");
            print_panel(bench.transform_result())?;
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<WorkbenchConfig> {
    let mut config = WorkbenchConfig::from_env()?;
    if let Some(endpoint) = &cli.endpoint {
        config = config.with_endpoint(endpoint)?;
    }
    if let Some(doc_base) = &cli.doc_base {
        config.doc_base = doc_base.trim_end_matches('/').to_string();
    }
    if let Some(secs) = cli.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    tracing::debug!(endpoint = %config.endpoint, doc_base = %config.doc_base, "configuration loaded");
    Ok(config)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {}", path.display()))
}

fn outline(file: &Path, json: bool, filter: Option<&str>) -> Result<()> {
    let markdown = read(file)?;
    let mut forest = wp_docs::outline_from_markdown(&markdown);
    if let Some(query) = filter {
        forest = wp_docs::filter_forest(&forest, query);
    }
    if json {
        let out = serde_json::to_string_pretty(&forest).into_diagnostic()?;
        println!("{out}");
    } else {
        print!("{}", wp_docs::render_outline(&forest));
    }
    Ok(())
}

async fn docs(config: &WorkbenchConfig, path: Option<&str>) -> Result<()> {
    let source = HttpDocSource::new(config.doc_base.clone())
        .map_err(wp_workbench::WorkbenchError::from)?;
    match path {
        Some(path) => {
            let text = source
                .fetch(path)
                .await
                .map_err(wp_workbench::WorkbenchError::from)?;
            print!("{text}");
        }
        None => {
            let mut viewer = DocViewer::new();
            viewer.refresh(&source).await;
            if viewer.forest().is_empty() {
                return Err(miette::miette!("{}", viewer.content()));
            }
            print!("{}", wp_docs::render_outline(viewer.forest()));
        }
    }
    Ok(())
}

fn print_panel(panel: &ResultPanel) -> Result<()> {
    if let Some(failure) = panel.error() {
        return Err(miette::miette!("{failure}"));
    }
    match panel.view.mode {
        ViewMode::Json => {
            if let Some(json) = panel.rendered_json() {
                println!("{json}");
            }
        }
        ViewMode::Table => print!("{}", render_table(&panel.visible_fields())),
    }
    Ok(())
}

fn column_width(header: &str, cells: impl Iterator<Item = usize>) -> usize {
    cells.fold(header.len(), usize::max)
}

fn render_table(fields: &[&ParsedField]) -> String {
    let no_w = column_width("no", fields.iter().map(|f| f.no.to_string().len()));
    let meta_w = column_width("meta", fields.iter().map(|f| f.meta.chars().count()));
    let name_w = column_width("name", fields.iter().map(|f| f.name.chars().count()));

    let mut out = String::new();
    let _ = writeln!(out, "{:<no_w$}  {:<meta_w$}  {:<name_w$}  value", "no", "meta", "name");
    for field in fields {
        let _ = writeln!(
            out,
            "{:<no_w$}  {:<meta_w$}  {:<name_w$}  {}",
            field.no,
            field.meta,
            field.name,
            field.display_value()
        );
    }
    out
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn table_columns_align() {
        let fields = [
            ParsedField {
                no: 1,
                meta: "ip".into(),
                name: "sip".into(),
                value: json!("1.2.3.4"),
            },
            ParsedField {
                no: 10,
                meta: "digit".into(),
                name: "status".into(),
                value: json!(200),
            },
        ];
        let refs: Vec<&ParsedField> = fields.iter().collect();
        assert_eq!(
            render_table(&refs),
            "no  meta   name    value\n1   ip     sip     1.2.3.4\n10  digit  status  200\n"
        );
    }

    #[test]
    fn cli_parses_transform_with_parse_inputs() {
        let cli = Cli::try_parse_from([
            "wp", "transform", "--oml", "a.oml", "--rules", "r.wpl", "--logs", "l.log",
            "--hide-empty",
        ])
        .expect("args");
        match cli.command {
            Commands::Transform { rules, view, .. } => {
                assert_eq!(rules, Some(PathBuf::from("r.wpl")));
                assert!(view.hide_empty);
            }
            _ => panic!("expected transform"),
        }
        assert!(Cli::try_parse_from(["wp", "transform", "--oml", "a", "--rules", "r"]).is_err());
    }
}
