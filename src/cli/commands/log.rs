use crate::cli::commands::open_db;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log {
        print,
        employee,
        limit,
    } = cmd
    {
        let pool = open_db(cfg)?;
        if *print {
            LogLogic::print_log(&pool.conn)?;
        } else {
            LogLogic::print_history(&pool.conn, *employee, *limit)?;
        }
    }

    Ok(())
}
