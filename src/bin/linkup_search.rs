use std::process::ExitCode;

use agent_web_search::app;
use agent_web_search::cli::{LinkupCli, LinkupCommand};
use agent_web_search::config::CONFIG;
use agent_web_search::logging;
use agent_web_search::output::{ErrorContext, OutputMode};
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match LinkupCli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return app::exit_on_parse_error(e),
    };
    let common = cli.command.common();
    logging::init(common.verbose);
    let mode = OutputMode::from_json_flag(common.json);

    match &cli.command {
        LinkupCommand::Search(args) => {
            let context = ErrorContext::LinkupSearch {
                query: args.joined_query(),
            };
            app::emit(app::linkup_search(args, &CONFIG).await, mode, context)
        }
        LinkupCommand::Fetch(args) => {
            let context = ErrorContext::LinkupFetch {
                url: args.url.clone(),
            };
            app::emit(app::linkup_fetch(args, &CONFIG).await, mode, context)
        }
    }
}
