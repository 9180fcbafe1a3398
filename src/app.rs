//! The "validate → call → format" pipelines behind each binary.

use std::process::ExitCode;

use crate::cli::{BraveSearchCli, LinkupFetchArgs, LinkupSearchArgs, WebSearchCli};
use crate::config::Config;
use crate::error::SearchError;
use crate::output::{
    Engine, ErrorContext, ErrorReport, FetchReport, LinkupSearchReport, OutputMode, Render,
    ResultListReport,
};
use crate::providers::{BraveClient, BraveWebClient, LinkupClient};

pub async fn brave_search(
    cli: &BraveSearchCli,
    config: &Config,
) -> Result<ResultListReport, SearchError> {
    let request = cli.to_request()?;
    let client = BraveClient::from_config(config)?;
    let page = client.search(&request).await?;
    Ok(ResultListReport {
        engine: Engine::BraveApi,
        query: request.query,
        result_limit: request.result_limit,
        page,
    })
}

pub async fn brave_web_search(
    cli: &WebSearchCli,
    config: &Config,
) -> Result<ResultListReport, SearchError> {
    let request = cli.to_request()?;
    let client = BraveWebClient::from_config(config)?;
    let page = client.search(&request).await?;
    Ok(ResultListReport {
        engine: Engine::BraveWeb,
        query: request.query,
        result_limit: request.result_limit,
        page,
    })
}

pub async fn linkup_search(
    args: &LinkupSearchArgs,
    config: &Config,
) -> Result<LinkupSearchReport, SearchError> {
    let request = args.to_request()?;
    let client = LinkupClient::from_config(config)?;
    let outcome = client.search(&request).await?;
    Ok(LinkupSearchReport { request, outcome })
}

pub async fn linkup_fetch(
    args: &LinkupFetchArgs,
    config: &Config,
) -> Result<FetchReport, SearchError> {
    let request = args.to_request()?;
    let client = LinkupClient::from_config(config)?;
    let result = client.fetch(&request).await?;
    Ok(FetchReport { request, result })
}

/// Prints the report (or the error) and picks the exit code.
///
/// JSON goes to stdout either way so agents always get a parseable document;
/// text-mode errors go to stderr.
pub fn emit<R: Render>(
    result: Result<R, SearchError>,
    mode: OutputMode,
    context: ErrorContext,
) -> ExitCode {
    let error = match result.and_then(|report| report.render(mode)) {
        Ok(rendered) => {
            print!("{rendered}");
            if mode == OutputMode::Json {
                println!();
            }
            return ExitCode::SUCCESS;
        }
        Err(error) => error,
    };

    tracing::debug!(status_code = ?error.status_code(), "invocation failed: {error}");
    let report = ErrorReport {
        context,
        error: &error,
    };
    match report.render(mode) {
        Ok(rendered) if mode == OutputMode::Json => println!("{rendered}"),
        Ok(rendered) => eprint!("{rendered}"),
        Err(_) => eprint!("{}", report.to_text()),
    }
    ExitCode::FAILURE
}

/// Clap failures count as validation errors and exit 1; `--help` and
/// `--version` exit 0.
pub fn exit_on_parse_error(err: clap::Error) -> ExitCode {
    let _ = err.print();
    if err.use_stderr() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
