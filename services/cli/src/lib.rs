mod cli;
mod commands;

use soil_card::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
