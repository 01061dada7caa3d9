//! Tenant, location, company and mailbox setup.

use clap::{Args, Subcommand};
use mailroom::uuids::{CompanyUuid, LocationUuid, MailboxUuid, TenantUuid};
use mailroom_app::{
    database,
    domain::tenants::{
        PgTenantsService, TenantsService,
        data::{NewCompany, NewLocation, NewMailbox, NewTenant},
    },
};

#[derive(Debug, Args)]
pub(crate) struct TenantCommand {
    #[command(subcommand)]
    command: TenantSubcommand,
}

#[derive(Debug, Subcommand)]
enum TenantSubcommand {
    Create(CreateTenantArgs),
}

#[derive(Debug, Args)]
struct CreateTenantArgs {
    /// Tenant display name
    #[arg(long)]
    name: String,

    /// Optional tenant UUID; generated when omitted
    #[arg(long)]
    tenant_uuid: Option<TenantUuid>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

#[derive(Debug, Args)]
pub(crate) struct LocationCommand {
    #[command(subcommand)]
    command: LocationSubcommand,
}

#[derive(Debug, Subcommand)]
enum LocationSubcommand {
    Create(CreateLocationArgs),
}

#[derive(Debug, Args)]
struct CreateLocationArgs {
    /// Owning tenant
    #[arg(long)]
    tenant: TenantUuid,

    /// Location display name
    #[arg(long)]
    name: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

#[derive(Debug, Args)]
pub(crate) struct CompanyCommand {
    #[command(subcommand)]
    command: CompanySubcommand,
}

#[derive(Debug, Subcommand)]
enum CompanySubcommand {
    Create(CreateCompanyArgs),
}

#[derive(Debug, Args)]
struct CreateCompanyArgs {
    /// Owning tenant
    #[arg(long)]
    tenant: TenantUuid,

    /// Registered company name
    #[arg(long)]
    name: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

#[derive(Debug, Args)]
pub(crate) struct MailboxCommand {
    #[command(subcommand)]
    command: MailboxSubcommand,
}

#[derive(Debug, Subcommand)]
enum MailboxSubcommand {
    Create(CreateMailboxArgs),
}

#[derive(Debug, Args)]
struct CreateMailboxArgs {
    /// Owning tenant
    #[arg(long)]
    tenant: TenantUuid,

    /// Location the mailbox sits in
    #[arg(long)]
    location: LocationUuid,

    /// Renting company, if any
    #[arg(long)]
    company: Option<CompanyUuid>,

    /// Private mailbox number, unique per location
    #[arg(long)]
    pmb_number: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

async fn service(database_url: &str) -> Result<PgTenantsService, String> {
    database::connect(database_url)
        .await
        .map(PgTenantsService::new)
        .map_err(|error| format!("failed to connect to database: {error}"))
}

pub(crate) async fn run_tenant(command: TenantCommand) -> Result<(), String> {
    let TenantSubcommand::Create(args) = command.command;

    let tenant = service(&args.database_url)
        .await?
        .create_tenant(NewTenant {
            uuid: args.tenant_uuid.unwrap_or_default(),
            name: args.name,
        })
        .await
        .map_err(|error| format!("failed to create tenant: {error}"))?;

    println!("tenant_uuid: {}", tenant.uuid);
    println!("tenant_name: {}", tenant.name);

    Ok(())
}

pub(crate) async fn run_location(command: LocationCommand) -> Result<(), String> {
    let LocationSubcommand::Create(args) = command.command;

    let location = service(&args.database_url)
        .await?
        .create_location(
            args.tenant,
            NewLocation {
                uuid: LocationUuid::new(),
                name: args.name,
            },
        )
        .await
        .map_err(|error| format!("failed to create location: {error}"))?;

    println!("location_uuid: {}", location.uuid);

    Ok(())
}

pub(crate) async fn run_company(command: CompanyCommand) -> Result<(), String> {
    let CompanySubcommand::Create(args) = command.command;

    let company = service(&args.database_url)
        .await?
        .create_company(
            args.tenant,
            NewCompany {
                uuid: CompanyUuid::new(),
                name: args.name,
            },
        )
        .await
        .map_err(|error| format!("failed to create company: {error}"))?;

    println!("company_uuid: {}", company.uuid);

    Ok(())
}

pub(crate) async fn run_mailbox(command: MailboxCommand) -> Result<(), String> {
    let MailboxSubcommand::Create(args) = command.command;

    let mailbox = service(&args.database_url)
        .await?
        .create_mailbox(
            args.tenant,
            NewMailbox {
                uuid: MailboxUuid::new(),
                location_uuid: args.location,
                company_uuid: args.company,
                pmb_number: args.pmb_number,
            },
        )
        .await
        .map_err(|error| format!("failed to create mailbox: {error}"))?;

    println!("mailbox_uuid: {}", mailbox.uuid);
    println!("pmb_number: {}", mailbox.pmb_number);

    Ok(())
}
