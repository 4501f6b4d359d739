use clap::{arg, command};
use linkweb_core::config::{GraphKind, ScraperKind, validate_seed};
use linkweb_core::crawl::Strategy;
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

fn parse_seed(raw: &str) -> Result<Url, String> {
    validate_seed(raw).map_err(|e| e.to_string())
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("linkweb")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("linkweb")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress progress and non-essential output").required(false))
        .subcommand_required(true)
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl a site from a seed URL and build its weighted link graph. Links are \
                followed only within the seed's registrable domain.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The seed URL to crawl (http or https)")
                        .value_parser(parse_seed),
                )
                .arg(
                    arg!(-g --"graph" <GRAPH>)
                        .required(false)
                        .help("Graph backend: map, petgraph")
                        .value_parser(clap::value_parser!(GraphKind))
                        .default_value("map")
                        .conflicts_with("every-config"),
                )
                .arg(
                    arg!(-s --"scraper" <SCRAPER>)
                        .required(false)
                        .help("Link extraction backend: html, regex")
                        .value_parser(clap::value_parser!(ScraperKind))
                        .default_value("html")
                        .conflicts_with("every-config"),
                )
                .arg(
                    arg!(-x --"strategy" <STRATEGY>)
                        .required(false)
                        .help("Traversal strategy: recursive, iterative, pool")
                        .value_parser(clap::value_parser!(Strategy))
                        .default_value("recursive")
                        .conflicts_with("every-config"),
                )
                .arg(
                    arg!(-w --"workers" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of workers for the pool strategy.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("10"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"every-config")
                        .required(false)
                        .help("Crawl once with every graph, scraper and strategy combination")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
