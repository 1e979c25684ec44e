//! credstore - command-line access to the credential store
//!
//! Reads and writes go through the same resilient facade applications use,
//! so a missing or locked keychain degrades to a warning rather than a crash.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

use credential_store::{
    create_credential_store, CredentialAttributes, CredentialStoreFacade, Credentials,
    InMemoryCredentialStore, SettingsManager,
};

/// Resilient credential store CLI
#[derive(Parser, Debug)]
#[command(name = "credstore")]
#[command(author = "Symbia Labs")]
#[command(version = "0.1.0")]
#[command(about = "Store and look up credentials in the native OS keychain")]
struct Args {
    /// Directory holding settings.json (defaults to the user config dir)
    #[arg(long, env = "CREDSTORE_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the credentials stored for a service
    Get {
        #[arg(long)]
        service: String,
        #[arg(long)]
        account: Option<String>,
        /// Print the secret instead of masking it
        #[arg(long)]
        show_password: bool,
    },
    /// Store credentials for a service
    Set {
        #[arg(long)]
        service: String,
        #[arg(long)]
        account: Option<String>,
        /// User name saved alongside the secret
        #[arg(long)]
        user: Option<String>,
        /// Secret to store; prompted for when omitted
        #[arg(long, env = "CREDSTORE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Remove the credentials stored for a service
    Delete {
        #[arg(long)]
        service: String,
        #[arg(long)]
        account: Option<String>,
    },
    /// Show which store is in use
    Status,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_dir = match args.config_dir {
        Some(dir) => dir,
        None => SettingsManager::default_dir()?,
    };
    let mut settings = SettingsManager::new(&config_dir)
        .map_err(|e| format!("Failed to load settings: {}", e))?
        .get()
        .clone();
    settings.apply_env_overrides();

    let store = match create_credential_store(&settings) {
        Some(store) => store,
        None => {
            warn!("No native keychain available, credentials last for this run only");
            CredentialStoreFacade::new(Arc::new(InMemoryCredentialStore::new()), &settings)
        }
    };

    let succeeded = run_command(&store, args.command, &config_dir).await?;

    if store.is_fallback_active() {
        eprintln!(
            "warning: native keychain unavailable, changes were kept in memory and are now lost"
        );
    }

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Execute one subcommand; `false` when a lookup found nothing
async fn run_command(
    store: &CredentialStoreFacade,
    command: Command,
    config_dir: &Path,
) -> Result<bool, Box<dyn std::error::Error>> {
    match command {
        Command::Get {
            service,
            account,
            show_password,
        } => {
            let attributes = CredentialAttributes::new(service, account.as_deref());
            match store.get(&attributes).await {
                Some(credentials) => print_credentials(&credentials, show_password),
                None => {
                    eprintln!("No credentials stored for {}", attributes);
                    return Ok(false);
                }
            }
        }
        Command::Set {
            service,
            account,
            user,
            password,
        } => {
            let attributes = CredentialAttributes::new(service, account.as_deref());
            let password = match password {
                Some(password) => password,
                None => rpassword::prompt_password(format!("Secret for {}: ", attributes))?,
            };
            let credentials = Credentials::new(user.as_deref(), Some(password.as_str()));
            store.set(&attributes, Some(credentials)).await;
            store.flush().await;
            info!("Saved credentials for {}", attributes);
        }
        Command::Delete { service, account } => {
            let attributes = CredentialAttributes::new(service, account.as_deref());
            store.set(&attributes, None).await;
            store.flush().await;
            info!("Deleted credentials for {}", attributes);
        }
        Command::Status => {
            println!("Store: {}", store.backend_name());
            println!("Settings: {}", config_dir.display());
        }
    }

    Ok(true)
}

fn print_credentials(credentials: &Credentials, show_password: bool) {
    if let Some(user) = &credentials.user_name {
        println!("user: {}", user);
    }
    match credentials.password_str() {
        Some(password) if show_password => println!("password: {}", password),
        Some(_) => println!("password: ********"),
        None => println!("password: <none>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credential_store::Settings;

    fn memory_store() -> CredentialStoreFacade {
        CredentialStoreFacade::new(Arc::new(InMemoryCredentialStore::new()), &Settings::default())
    }

    fn get(service: &str) -> Command {
        Command::Get {
            service: service.to_string(),
            account: None,
            show_password: false,
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_report_failure() {
        let store = memory_store();
        let found = run_command(&store, get("absent"), Path::new("."))
            .await
            .unwrap();
        assert!(!found);
    }

    #[tokio::test]
    async fn test_set_then_get_succeeds() {
        let store = memory_store();
        let set = Command::Set {
            service: "svc".to_string(),
            account: None,
            user: Some("bob".to_string()),
            password: Some("x".to_string()),
        };

        assert!(run_command(&store, set, Path::new(".")).await.unwrap());
        assert!(run_command(&store, get("svc"), Path::new(".")).await.unwrap());

        let delete = Command::Delete {
            service: "svc".to_string(),
            account: None,
        };
        assert!(run_command(&store, delete, Path::new(".")).await.unwrap());
        assert!(!run_command(&store, get("svc"), Path::new(".")).await.unwrap());
    }
}
