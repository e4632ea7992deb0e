//! support-matrix command line
//!
//! Loads a page (saved HTML, an exported DOM snapshot, stdin, or a live URL
//! rendered by headless Chrome), lists its product support tables, and shows
//! the filtered support records of one product.

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use support_matrix::tools::utils::page_url;
use support_matrix::{
    BrowserSession, ConnectionOptions, DomTree, Filters, LaunchOptions, MatrixView, Status, SupportRecord,
    ToolContext, ToolRegistry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Aligned plain-text table
    Text,
    /// Pretty-printed JSON
    Json,
}

#[derive(Parser)]
#[command(name = "support-matrix")]
#[command(version)]
#[command(about = "Searchable view of product support-matrix tables", long_about = None)]
struct Cli {
    /// Saved HTML page (default: read HTML from stdin)
    #[arg(long, value_name = "PATH", conflicts_with_all = ["url", "json"])]
    file: Option<PathBuf>,

    /// Page URL, rendered with headless Chrome
    #[arg(long, value_name = "URL", conflicts_with = "json")]
    url: Option<String>,

    /// DOM snapshot written earlier with --dump-dom
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H', requires = "url")]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH", requires = "url")]
    executable_path: Option<PathBuf>,

    /// WebSocket endpoint of an already running browser
    #[arg(long, value_name = "URL", requires = "url")]
    ws_endpoint: Option<String>,

    /// Launch Chrome without its sandbox (needed in some containers)
    #[arg(long, requires = "url", conflicts_with = "ws_endpoint")]
    no_sandbox: bool,

    /// Chrome profile directory to reuse
    #[arg(long, value_name = "PATH", requires = "url", conflicts_with = "ws_endpoint")]
    user_data_dir: Option<PathBuf>,

    /// Page load timeout in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 30_000)]
    timeout: u64,

    /// List product tables and exit
    #[arg(long)]
    list: bool,

    /// Product to show, e.g. "Elastic Agent"
    #[arg(long, short = 'p', conflicts_with = "table")]
    product: Option<String>,

    /// Table to show, by position among all tables of the page
    #[arg(long, value_name = "N")]
    table: Option<usize>,

    /// Search OS names and architectures
    #[arg(long, short = 's')]
    search: Option<String>,

    /// Only OSes supporting a matching product version
    #[arg(long = "product-version", id = "product_version", value_name = "VERSION")]
    product_version: Option<String>,

    /// Only this OS (exact name)
    #[arg(long)]
    os: Option<String>,

    /// Only OSes with this architecture (exact name)
    #[arg(long)]
    arch: Option<String>,

    /// Only records with this status: supported, limited or deprecated
    #[arg(long)]
    status: Option<Status>,

    /// Show every supported version under each row
    #[arg(long)]
    details: bool,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    format: Format,

    /// Print the page's DOM snapshot as JSON and exit
    #[arg(long)]
    dump_dom: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn filters(&self) -> Filters {
        Filters {
            search: self.search.clone(),
            version: self.product_version.clone(),
            os: self.os.clone(),
            arch: self.arch.clone(),
            status: self.status,
        }
    }

    fn wants_view(&self) -> bool {
        !self.list && (self.product.is_some() || self.table.is_some())
    }

    fn launch_options(&self) -> LaunchOptions {
        let mut options = LaunchOptions::new()
            .headless(!self.headed)
            .sandbox(!self.no_sandbox)
            .navigation_timeout(self.timeout);
        if let Some(path) = &self.executable_path {
            options = options.chrome_path(path);
        }
        if let Some(dir) = &self.user_data_dir {
            options = options.user_data_dir(dir);
        }
        options
    }

    fn connection_options(&self, endpoint: &str) -> ConnectionOptions {
        ConnectionOptions::new(endpoint).timeout(self.timeout)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut tree = load_tree(cli)?;
    tree.simplify();

    if cli.dump_dom {
        println!("{}", tree.to_json()?);
        return Ok(());
    }

    let registry = ToolRegistry::with_defaults();
    let mut context = ToolContext::new(&tree);

    if cli.wants_view() {
        view_product(cli, &registry, &mut context)
    } else {
        list_products(cli, &registry, &mut context)
    }
}

fn load_tree(cli: &Cli) -> Result<DomTree> {
    if let Some(path) = &cli.json {
        let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(DomTree::from_json(&json)?);
    }

    if let Some(path) = &cli.file {
        let html = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(DomTree::from_html(&html));
    }

    if let Some(url) = &cli.url {
        let url = page_url(url);
        let session = match &cli.ws_endpoint {
            Some(endpoint) => BrowserSession::connect(cli.connection_options(endpoint))?,
            None => BrowserSession::launch(cli.launch_options())?,
        };
        let tree = session.load(&url).with_context(|| format!("Failed to load {}", url))?;
        return Ok(tree);
    }

    log::debug!("Reading HTML from stdin");
    let mut html = String::new();
    std::io::stdin()
        .read_to_string(&mut html)
        .context("Failed to read HTML from stdin")?;
    Ok(DomTree::from_html(&html))
}

fn list_products(cli: &Cli, registry: &ToolRegistry, context: &mut ToolContext) -> Result<()> {
    let result = registry.execute("list_products", serde_json::json!({}), context)?;
    if !result.success {
        bail!(result.error.unwrap_or_else(|| "list_products failed".to_string()));
    }
    let data = result.data.unwrap_or_default();

    if cli.format == Format::Json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    let products = data["products"].as_array().cloned().unwrap_or_default();
    println!("Found {} product tables:", products.len());
    for product in products {
        println!(
            "  [{}] {}",
            product["table_index"],
            product["name"].as_str().unwrap_or_default()
        );
    }
    Ok(())
}

fn view_product(cli: &Cli, registry: &ToolRegistry, context: &mut ToolContext) -> Result<()> {
    let params = serde_json::json!({
        "product": cli.product,
        "table_index": cli.table,
        "filters": cli.filters(),
    });

    let result = registry.execute("view_product", params, context)?;
    if !result.success {
        bail!(result.error.unwrap_or_else(|| "view_product failed".to_string()));
    }
    let data = result.data.unwrap_or_default();

    log::info!(
        "Interpreted as {} via {} extraction; cells: {}",
        data["orientation"],
        data["path"],
        data["diagnostics"]
    );

    if cli.format == Format::Json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    let name = data["product"]["name"].as_str().unwrap_or_default().to_string();
    let records: Vec<SupportRecord> =
        serde_json::from_value(data["records"].clone()).context("Malformed view_product result")?;

    let mut view = MatrixView::new(name, records);
    view.apply(cli.filters());
    print!("{}", view.render_text(cli.details));
    Ok(())
}
