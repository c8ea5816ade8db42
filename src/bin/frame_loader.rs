use clap::Parser;
use csv_sql_loader::prelude::*;

/// Same tables as `cursor_loader`, but every CSV goes through a polars
/// dataframe and the tables are read back into dataframes for checking.
fn main() -> Result<(), LoaderError> {
    let opt = LoaderOpt::parse();
    let config = opt.resolve(&mut TerminalPrompter)?;

    let conn = SqliteConnection::open(&config, opt.create_database)?;
    println!("Connection Successful!");

    let verifications = with_connection(conn, |conn| {
        run_frame(conn, &opt.dataset.datasets(), &opt.data_dir)
    })?;
    for verification in &verifications {
        println!(
            "{}: {} of {} rows verified",
            verification.table, verification.fetched, verification.expected
        );
    }
    Ok(())
}
