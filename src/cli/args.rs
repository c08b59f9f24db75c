use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "evodash",
    version,
    about = "terminal dashboard for evolution-report gate review",
    long_about = "Evodash loads a JSON feed of evolution-report records once at startup and shows them as filterable cards, with an in-app preview of linked HTML reports and a reserved draft-upload hook.\n\nExamples:\n  evodash -f data/reports.json\n  evodash -f https://atlas.example/data/reports.json --gate fail\n  evodash --once --out cards.html\n\nTip: Use --config to persist feed and filter settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'f',
        long = "feed",
        value_name = "URL_OR_PATH",
        help_heading = "Input",
        help = "Reports feed: an http(s) URL or a local JSON file."
    )]
    pub feed: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.evodash/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a commented default config file and exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'd',
        long = "query",
        visible_alias = "domain",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Seed the search filter (substring of domain, title, or id)."
    )]
    pub query: Option<String>,

    #[arg(
        short = 'g',
        long = "gate",
        value_name = "all|pass|fail",
        help_heading = "Filters",
        help = "Seed the gate filter."
    )]
    pub gate: Option<String>,

    #[arg(
        short = 's',
        long = "min-score",
        value_name = "SCORE",
        help_heading = "Filters",
        help = "Seed the minimum overall score filter."
    )]
    pub min_score: Option<f64>,

    #[arg(
        long = "once",
        help_heading = "Output",
        help = "Print the filtered cards and exit instead of opening the dashboard."
    )]
    pub once: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "With --once, also write the filtered cards to a file."
    )]
    pub output: Option<String>,

    #[arg(
        long = "of",
        visible_alias = "output-format",
        value_name = "text|json|html",
        help_heading = "Output",
        help = "Output file format (inferred from the extension when omitted)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        long = "no-color",
        help_heading = "Output",
        help = "Disable colored output in --once mode."
    )]
    pub no_color: bool,

    #[arg(
        long = "log-file",
        value_name = "FILE",
        help_heading = "Output",
        help = "Diagnostics log file used while the dashboard is open."
    )]
    pub log_file: Option<String>,

    #[arg(
        short = 't',
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Request timeout for feed, preview, and upload requests."
    )]
    pub timeout: Option<usize>,

    #[arg(
        short = 'p',
        long = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "Route all requests through this proxy."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'w',
        long = "workers",
        value_name = "N",
        help_heading = "HTTP",
        help = "Runtime worker threads for background requests."
    )]
    pub workers: Option<usize>,

    #[arg(
        long = "upload-endpoint",
        value_name = "URL",
        help_heading = "Upload",
        help = "Draft upload endpoint (reserved; a placeholder is used when unset)."
    )]
    pub upload_endpoint: Option<String>,

    #[arg(
        long = "upload-extensions",
        value_name = "EXTS",
        help_heading = "Upload",
        help = "Allowed draft file extensions (comma-separated)."
    )]
    pub upload_extensions: Option<String>,

    #[arg(
        long = "no-preview",
        help_heading = "Preview",
        help = "Skip the in-app viewer and open reports with the system opener."
    )]
    pub no_preview: bool,
}
