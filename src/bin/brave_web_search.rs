use std::process::ExitCode;

use agent_web_search::app;
use agent_web_search::cli::WebSearchCli;
use agent_web_search::config::CONFIG;
use agent_web_search::logging;
use agent_web_search::output::{ErrorContext, OutputMode};
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match WebSearchCli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return app::exit_on_parse_error(e),
    };
    logging::init(cli.common.verbose);

    let mode = OutputMode::from_json_flag(cli.common.json);
    let context = ErrorContext::Brave {
        query: cli.query.join(" "),
    };
    app::emit(app::brave_web_search(&cli, &CONFIG).await, mode, context)
}
