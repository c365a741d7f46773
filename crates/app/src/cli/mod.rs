use clap::{Parser, Subcommand};
use shopfront_app::{
    auth::PgAuthService,
    database::{self, Db},
};

mod db;
mod token;
mod user;

#[derive(Debug, Parser)]
#[command(name = "shopfront-app", about = "Shopfront administration CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(user::UserCommand),
    Token(token::TokenCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::User(command) => user::run(command).await,
            Commands::Token(command) => token::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

async fn connect(database_url: &str) -> Result<Db, String> {
    database::connect(database_url)
        .await
        .map(Db::new)
        .map_err(|error| format!("failed to connect to database: {error}"))
}

/// Auth service for one-off admin commands. Tokens it issues never expire.
async fn auth_service(database_url: &str) -> Result<PgAuthService, String> {
    Ok(PgAuthService::new(connect(database_url).await?, None))
}
