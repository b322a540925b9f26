pub mod axis;
pub mod cli;
pub mod config;
pub mod meta;
pub mod model;
pub mod recipe;

pub fn run_cli() -> Result<(), String> {
    cli::run_cli()
}
