pub mod commands;
pub mod handlers;

pub use commands::command_argument_builder;
pub use handlers::{CrawlArgs, crawl_args_from_matches, handle_crawl, init_tracing};
