use clap::{Parser, Subcommand};

mod db;
mod directory;

#[derive(Debug, Parser)]
#[command(name = "mailroom-app", about = "Mailroom operator CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Schema migrations and database roles
    Db(db::DbCommand),
    Tenant(directory::TenantCommand),
    Location(directory::LocationCommand),
    Company(directory::CompanyCommand),
    Mailbox(directory::MailboxCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Tenant(command) => directory::run_tenant(command).await,
            Commands::Location(command) => directory::run_location(command).await,
            Commands::Company(command) => directory::run_company(command).await,
            Commands::Mailbox(command) => directory::run_mailbox(command).await,
        }
    }
}
