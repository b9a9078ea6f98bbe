use anyhow::Result;
use rwapi_cli::argparse::parse_args;
use rwapi_cli::commands::handle_command;
use rwapi_cli::logger::init_logger;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = parse_args();
    init_logger(cli.verbose);

    handle_command(cli).await
}
