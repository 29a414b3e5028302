mod args;
mod config;
mod entry;
mod error;
mod http;
mod logger;
mod report;
mod run;
mod scenario;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
