use clap::Parser;
use csv_sql_loader::prelude::*;

fn main() -> Result<(), LoaderError> {
    let opt = LoaderOpt::parse();
    let config = opt.resolve(&mut TerminalPrompter)?;

    let conn = SqliteConnection::open(&config, opt.create_database)?;
    println!("Connection Successful!");

    let verifications = with_connection(conn, |conn| {
        run_cursor(conn, &opt.dataset.datasets(), &opt.data_dir)
    })?;
    for verification in &verifications {
        println!(
            "{}: {} of {} rows verified",
            verification.table, verification.fetched, verification.expected
        );
    }
    Ok(())
}
