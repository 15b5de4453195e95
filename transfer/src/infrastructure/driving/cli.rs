use std::sync::Arc;
use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use url::Url;
use crate::application::owner::commands::list_permissions;
use crate::application::owner::commands::transfer_ownership::{
    OwnershipTransferResolver, Resolution, TransferRequest,
};
use crate::domain::{FileId, PermissionRecord, PrincipalEmail};
use crate::infrastructure::config::Settings;
use crate::infrastructure::driven::{AuthorizedClient, DrivePermissionStore, TokenFileCredentialProvider};

#[derive(Debug, Parser)]
#[command(about = "Transfer ownership of a Google Drive file to another account.", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output. Use once (-v) for logging level INFO and twice (-vv) for logging
    /// level DEBUG. RUST_LOG takes precedence when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Make another account the owner of a file.
    Transfer {
        /// Id of the file, as found in its URL (`/d/<FILE_ID>/`).
        #[arg(long, env = "DRIVE_TRANSFER_FILE_ID", value_parser = parse_file_id)]
        file_id: FileId,

        /// Email of the account receiving ownership.
        #[arg(long = "to", env = "DRIVE_TRANSFER_TO", value_parser = parse_email)]
        target_email: PrincipalEmail,
    },
    /// Print the permissions currently set on a file.
    Permissions {
        #[arg(long, env = "DRIVE_TRANSFER_FILE_ID", value_parser = parse_file_id)]
        file_id: FileId,
    },
    /// Save a refresh token, together with the client secrets, as the stored credential.
    Login {
        #[arg(long, env = "DRIVE_TRANSFER_REFRESH_TOKEN", hide_env_values = true)]
        refresh_token: String,
    },
}

fn parse_file_id(value: &str) -> Result<FileId, String> {
    FileId::new(value)
}

fn parse_email(value: &str) -> Result<PrincipalEmail, String> {
    PrincipalEmail::new(value)
}

impl Args {
    /// Filter directive used when RUST_LOG is unset
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            2.. => "info,drive_owner_transfer=debug",
            1 => "warn,drive_owner_transfer=info",
            _ => "warn",
        }
    }
}

pub async fn run(command: Command, settings: &Settings) -> anyhow::Result<()> {
    let http = reqwest::Client::new();
    let token_url = Url::parse(&settings.token_url)
        .with_context(|| format!("Invalid token_url '{}'", settings.token_url))?;
    let credentials = TokenFileCredentialProvider::new(
        http.clone(),
        settings.token_path.clone(),
        settings.credentials_path.clone(),
        token_url,
    );

    match command {
        Command::Transfer { file_id, target_email } => {
            let store = drive_store(http, &credentials, settings).await?;
            let resolver = OwnershipTransferResolver::new(Arc::new(store));
            let outcome = resolver
                .handle(TransferRequest { file_id: file_id.clone(), target_email })
                .await?;

            match &outcome.resolution {
                Resolution::Existing { id, previous_role } => {
                    println!("Reused permission {id} (was {previous_role})")
                }
                Resolution::Created { id } => println!("Created writer permission {id}"),
            }
            println!("Ownership transfer successful for file {file_id}");
            print_record(&outcome.permission);
        }
        Command::Permissions { file_id } => {
            let store = drive_store(http, &credentials, settings).await?;
            let records = list_permissions::execute(&store, &file_id).await?;
            info!("File {} has {} permissions", file_id, records.len());
            for record in &records {
                print_record(record);
            }
        }
        Command::Login { refresh_token } => {
            credentials.save_authorized_user(&refresh_token).await?;
            println!("Credential saved to {}", credentials.token_path().display());
        }
    }

    Ok(())
}

async fn drive_store(
    http: reqwest::Client,
    credentials: &TokenFileCredentialProvider,
    settings: &Settings,
) -> anyhow::Result<DrivePermissionStore> {
    let base_url = Url::parse(&settings.api_base_url)
        .with_context(|| format!("Invalid api_base_url '{}'", settings.api_base_url))?;
    if base_url.cannot_be_a_base() {
        anyhow::bail!("Invalid api_base_url '{}'", settings.api_base_url);
    }
    let client = AuthorizedClient::authorize(http, credentials).await?;
    Ok(DrivePermissionStore::new(client, base_url))
}

fn print_record(record: &PermissionRecord) {
    println!(
        "{}\t{}\t{}\t{}",
        record.id,
        record.role,
        record.kind.as_deref().unwrap_or("-"),
        record
            .principal_email
            .as_deref()
            .or(record.display_name.as_deref())
            .unwrap_or("-"),
    );
}
