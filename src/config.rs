use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use clap::Parser;

use crate::{datasets::Dataset, error::LoaderError};

pub const DEFAULT_HOST: &str = "24.205.251.117";

#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl ConnectionConfig {
    pub fn new(database: &str, username: &str, password: &str) -> Self {
        ConnectionConfig {
            host: DEFAULT_HOST.to_string(),
            database: database.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    pub fn connection_string(&self) -> String {
        [
            format!("Address={}", self.host),
            format!("Database={}", self.database),
            format!("UID={}", self.username),
            format!("PWD={}", self.password),
        ]
        .join(";")
    }

    pub fn validate(&self) -> Result<(), LoaderError> {
        if self.database.trim().is_empty() {
            return Err(LoaderError::Config("Database name is empty".to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Address={};Database={};UID={};PWD=****",
            self.host, self.database, self.username
        )
    }
}

// Never print the password, not even in debug output.
impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

/// Source of interactively supplied values.
pub trait Prompter {
    fn prompt(&mut self, label: &str) -> io::Result<String>;
    fn prompt_secret(&mut self, label: &str) -> io::Result<String>;
}

pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn prompt(&mut self, label: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", label)?;
        stdout.flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn prompt_secret(&mut self, label: &str) -> io::Result<String> {
        rpassword::prompt_password(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DatasetChoice {
    Iris,
    Bakery,
    All,
}

impl DatasetChoice {
    pub fn datasets(&self) -> Vec<Dataset> {
        match self {
            DatasetChoice::Iris => vec![Dataset::Iris],
            DatasetChoice::Bakery => vec![Dataset::Bakery],
            DatasetChoice::All => vec![Dataset::Iris, Dataset::Bakery],
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "loader", about = "Recreate the sample tables, load them from CSV and verify.")]
pub struct LoaderOpt {
    /// Database server address. Ignored by SQLite.
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,
    /// Database name. Prompted for when missing.
    #[arg(short = 'd', long)]
    pub database: Option<String>,
    /// User name. Prompted for when missing; ignored by SQLite.
    #[arg(short = 'u', long)]
    pub username: Option<String>,
    /// Password. Prompted for (masked) when missing; ignored by SQLite.
    #[arg(short = 'p', long)]
    pub password: Option<String>,
    /// Directory holding iris.csv and bakery/*.csv.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,
    /// Which dataset(s) to load.
    #[arg(long, value_enum, default_value = "all")]
    pub dataset: DatasetChoice,
    /// Create the database if it does not exist yet.
    #[arg(long)]
    pub create_database: bool,
}

impl LoaderOpt {
    /// Fill in whatever was not given on the command line, prompting in the
    /// order database, username, password.
    pub fn resolve(&self, prompter: &mut impl Prompter) -> Result<ConnectionConfig, LoaderError> {
        let database = match &self.database {
            Some(database) => database.clone(),
            None => prompter.prompt("Database name: ")?,
        };
        let username = match &self.username {
            Some(username) => username.clone(),
            None => prompter.prompt("Username: ")?,
        };
        let password = match &self.password {
            Some(password) => password.clone(),
            None => prompter.prompt_secret("Password: ")?,
        };
        let config = ConnectionConfig {
            host: self.host.clone(),
            database,
            username,
            password,
        };
        config.validate()?;
        Ok(config)
    }
}
