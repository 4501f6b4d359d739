use colored::Colorize;
use linkweb::{command_argument_builder, crawl_args_from_matches, handle_crawl, init_tracing};

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    init_tracing();

    match chosen_command.subcommand() {
        Some(("crawl", primary_command)) => {
            let result = match crawl_args_from_matches(primary_command, quiet) {
                Ok(args) => handle_crawl(args).await,
                Err(e) => Err(e.into()),
            };
            if let Err(e) = result {
                eprintln!("{} {:#}", "✗ Crawl failed:".red().bold(), e);
                std::process::exit(1);
            }
        }
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
