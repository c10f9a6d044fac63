use chain_journal::application::{init::init, JournalService, SettingsStore};
use chain_journal::cli::{format_resolved_paths, format_settings, init_logging, Cli, Commands};
use chain_journal::domain::{FileHandle, SettingKey, TimeReference};
use chain_journal::error::ChainError;
use chain_journal::infrastructure::{
    editor_from_env, FileSystemVault, ObsidianDailyNotes, TomlSettingsFile,
};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::str::FromStr;

type CliService = JournalService<FileSystemVault, TomlSettingsFile, ObsidianDailyNotes>;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let today = Local::now().date_naive();
    let result = run(cli, today).await;

    match result {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            // Noticed errors were already shown to the user by the host
            if !e.is_noticed() {
                eprintln!("Error: {}", e.display_with_suggestions());
            }
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli, today: NaiveDate) -> Result<(), ChainError> {
    match cli.command {
        Some(Commands::Init {
            path,
            with_template,
        }) => {
            let created_template = init(&path, with_template).await?;
            println!("Initialized chain journal at {}", path.display());
            if created_template {
                println!("Created default template file");
            }
            Ok(())
        }
        Some(Commands::Config { key, value, list }) => {
            let mut service = open_service().await?;

            if list {
                print!("{}", format_settings(service.store().settings()));
                Ok(())
            } else if let Some(k) = key {
                if let Some(v) = value {
                    if service.store_mut().set_from_str(&k, &v).await? {
                        println!("Set {} = {}", k, v);
                    } else {
                        println!("{} is already {}", k, v);
                    }
                } else {
                    let key = SettingKey::from_str(&k)?;
                    println!("{}", service.store().get(key));
                }
                Ok(())
            } else {
                let keys: Vec<&str> = SettingKey::ALL.iter().map(|k| k.as_str()).collect();
                println!("Usage: chain config [--list | <key> [<value>]]");
                println!("Valid keys: {}", keys.join(", "));
                Ok(())
            }
        }
        Some(Commands::Path { date }) => {
            let service = open_service().await?;
            let date = TimeReference::parse(date.as_deref().unwrap_or("today"))?.resolve(today);
            print!("{}", format_resolved_paths(&service.preview(date)));
            Ok(())
        }
        Some(Commands::Startup) => {
            let service = open_service().await?;
            match service.startup(today).await? {
                Some(file) => print_opened(&service, &file),
                None => Ok(()),
            }
        }
        None => {
            let service = open_service().await?;
            let input = cli.date.as_deref().unwrap_or("today");
            let file = service.open_reference(input, today).await?;
            print_opened(&service, &file)
        }
    }
}

async fn open_service() -> Result<CliService, ChainError> {
    let vault = FileSystemVault::discover()?.with_editor(editor_from_env());
    let root = vault.root().to_path_buf();

    let store = SettingsStore::load(
        TomlSettingsFile::in_vault(&root),
        ObsidianDailyNotes::new(&root),
    )
    .await;

    Ok(JournalService::new(store, vault))
}

fn print_opened(service: &CliService, file: &FileHandle) -> Result<(), ChainError> {
    let full_path = service.vault().full_path(&file.path)?;
    println!("{}", full_path.display());
    Ok(())
}
