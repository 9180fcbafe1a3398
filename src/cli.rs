use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::data_models::{
    BraveSearchRequest, DEFAULT_RESULT_LIMIT, Depth, FetchRequest, LinkupSearchRequest,
    OutputFormat, OutputType, WebSearchRequest,
};
use crate::error::SearchError;
use crate::validate;

/// Flags every tool understands.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Output results as JSON for coding agents
    #[arg(long)]
    pub json: bool,

    /// Log request details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
#[command(name = "brave-search", version)]
#[command(about = "Perform a Brave Search through the Brave Search API and print results to stdout.")]
#[command(after_help = "The API key is read from the BRAVE_API_KEY environment variable.")]
pub struct BraveSearchCli {
    /// Search query (several words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Number of results to display (1-100)
    #[arg(short = 'n', long = "num-results", default_value_t = DEFAULT_RESULT_LIMIT, value_parser = validate::parse_result_limit)]
    pub num_results: u32,

    /// Country code sent to the API
    #[arg(long, default_value = "us")]
    pub country: String,

    /// Language code sent to the API
    #[arg(long = "lang", default_value = "en")]
    pub language: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl BraveSearchCli {
    pub fn to_request(&self) -> Result<BraveSearchRequest, SearchError> {
        let mut request =
            BraveSearchRequest::new(&validate::join_query(&self.query)?, self.num_results)?;
        request.country = self.country.trim().to_string();
        request.language = self.language.trim().to_string();
        Ok(request)
    }
}

#[derive(Parser, Debug)]
#[command(name = "brave-web-search", version)]
#[command(about = "Search search.brave.com without an API key and print results to stdout.")]
pub struct WebSearchCli {
    /// Search query (several words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Number of results to display (1-100)
    #[arg(short = 'n', long = "num-results", default_value_t = DEFAULT_RESULT_LIMIT, value_parser = validate::parse_result_limit)]
    pub num_results: u32,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl WebSearchCli {
    pub fn to_request(&self) -> Result<WebSearchRequest, SearchError> {
        WebSearchRequest::new(&validate::join_query(&self.query)?, self.num_results)
    }
}

#[derive(Parser, Debug)]
#[command(name = "linkup-search", version)]
#[command(about = "Perform Linkup searches and fetch web pages.")]
#[command(after_help = "The API key is read from the LINKUP_API_KEY environment variable.")]
pub struct LinkupCli {
    #[command(subcommand)]
    pub command: LinkupCommand,
}

#[derive(Subcommand, Debug)]
pub enum LinkupCommand {
    /// Perform a search
    Search(LinkupSearchArgs),
    /// Fetch a web page
    Fetch(LinkupFetchArgs),
}

impl LinkupCommand {
    pub fn common(&self) -> &CommonArgs {
        match self {
            LinkupCommand::Search(args) => &args.common,
            LinkupCommand::Fetch(args) => &args.common,
        }
    }
}

#[derive(Args, Debug)]
pub struct LinkupSearchArgs {
    /// Search query (several words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Number of results to display (1-100)
    #[arg(short = 'n', long = "num-results", default_value_t = DEFAULT_RESULT_LIMIT, value_parser = validate::parse_result_limit)]
    pub num_results: u32,

    /// standard (fast) or deep (thorough)
    #[arg(long, value_enum, default_value_t = Depth::Standard)]
    pub depth: Depth,

    #[arg(long = "output-type", value_enum, default_value_t = OutputType::SearchResults)]
    pub output_type: OutputType,

    /// Only results published on or after this date (YYYY-MM-DD)
    #[arg(long = "from-date", value_parser = validate::parse_date)]
    pub from_date: Option<NaiveDate>,

    /// Only results published on or before this date (YYYY-MM-DD)
    #[arg(long = "to-date", value_parser = validate::parse_date)]
    pub to_date: Option<NaiveDate>,

    /// Restrict search to these domains
    #[arg(long = "include-domains", num_args = 1..)]
    pub include_domains: Vec<String>,

    /// Exclude these domains from search
    #[arg(long = "exclude-domains", num_args = 1..)]
    pub exclude_domains: Vec<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl LinkupSearchArgs {
    pub fn joined_query(&self) -> String {
        self.query.join(" ")
    }

    pub fn to_request(&self) -> Result<LinkupSearchRequest, SearchError> {
        Ok(
            LinkupSearchRequest::new(&validate::join_query(&self.query)?, self.num_results)?
                .with_depth(self.depth)
                .with_output_type(self.output_type)
                .with_date_range(self.from_date, self.to_date)?
                .with_domains(self.include_domains.clone(), self.exclude_domains.clone()),
        )
    }
}

#[derive(Args, Debug)]
pub struct LinkupFetchArgs {
    /// URL to fetch
    pub url: String,

    #[arg(long = "output-format", value_enum, default_value_t = OutputFormat::Markdown)]
    pub output_format: OutputFormat,

    /// Execute JavaScript to capture dynamic content
    #[arg(long = "render-js")]
    pub render_js: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl LinkupFetchArgs {
    pub fn to_request(&self) -> Result<FetchRequest, SearchError> {
        Ok(FetchRequest::new(&self.url)?
            .with_output_format(self.output_format)
            .with_render_js(self.render_js))
    }
}
