use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "pokedex",
    version,
    about = "paginated, filterable catalog viewer for the PokeAPI",
    long_about = "Pokedex fetches records from a paginated REST collection and shows them as a card grid you can page through and filter.\n\nExamples:\n  pokedex\n  pokedex --mode client --filter char\n  pokedex --mode client --page 3 --non-interactive --output page.json\n\nTip: Use --config to persist settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the visible records to a file."
    )]
    pub output: Option<String>,

    #[arg(
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output file format: text or json (inferred from the extension if omitted)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'n',
        long = "ni",
        visible_alias = "non-interactive",
        help_heading = "Output",
        help = "Render a single page and exit."
    )]
    pub non_interactive: bool,

    #[arg(
        short = 'e',
        long = "ep",
        visible_alias = "endpoint",
        value_name = "URL",
        help_heading = "Source",
        help = "Collection endpoint."
    )]
    pub endpoint: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Source",
        help = "Path to config file (defaults to ~/.pokedex/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Source",
        help = "Write a default config file if none exists, then exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'm',
        long = "md",
        visible_alias = "mode",
        value_name = "MODE",
        help_heading = "Pagination",
        help = "Pagination strategy: cursor (server pages) or client (fetch once, page locally)."
    )]
    pub mode: Option<String>,

    #[arg(
        short = 's',
        long = "ps",
        visible_alias = "page-size",
        value_name = "N",
        help_heading = "Pagination",
        help = "Records per page."
    )]
    pub page_size: Option<usize>,

    #[arg(
        short = 'l',
        long = "lm",
        visible_alias = "limit",
        value_name = "N",
        help_heading = "Pagination",
        help = "Client mode: how many records to fetch."
    )]
    pub limit: Option<usize>,

    #[arg(
        short = 'f',
        long = "ft",
        visible_alias = "filter",
        value_name = "TEXT",
        help_heading = "Pagination",
        help = "Initial name filter (case-insensitive substring)."
    )]
    pub filter: Option<String>,

    #[arg(
        short = 'p',
        long = "pg",
        visible_alias = "page",
        value_name = "N",
        help_heading = "Pagination",
        help = "Client mode: initial page."
    )]
    pub page: Option<usize>,

    #[arg(
        short = 't',
        long = "cc",
        visible_alias = "concurrency",
        value_name = "N",
        help_heading = "Performance",
        help = "Max concurrent record requests."
    )]
    pub concurrency: Option<usize>,

    #[arg(
        short = 'r',
        long = "rt",
        visible_alias = "rate",
        value_name = "RPS",
        help_heading = "Performance",
        help = "Request rate limit (requests per second)."
    )]
    pub rate: Option<u32>,

    #[arg(
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "Performance",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'x',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,
}
