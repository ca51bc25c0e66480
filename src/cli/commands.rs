// Passbox CLI command handlers.
//
// Each function handles one CLI subcommand, coordinating the secure
// backend, the vault, and the password generator. Every command
// hydrates the vault once at startup, matching the store lifecycle.

use uuid::Uuid;

use crate::backend::KeyringBackend;
use crate::error::PassboxError;
use crate::generator;
use crate::store::{NewCredential, Vault};

use super::Commands;

/// Execute the parsed CLI command.
pub async fn execute(command: Commands) -> Result<(), PassboxError> {
    match command {
        Commands::List => cmd_list().await,
        Commands::Show { id, reveal } => cmd_show(id, reveal).await,
        Commands::Add {
            name,
            username,
            password,
            generate,
            length,
        } => cmd_add(name, username, password, generate, length).await,
        Commands::Delete { id } => cmd_delete(id).await,
        Commands::Generate { length } => cmd_generate(length),
    }
}

// ─── List ────────────────────────────────────────────────────────────────────

async fn cmd_list() -> Result<(), PassboxError> {
    let vault = open_vault()?;
    let records = vault.records().await;

    if records.is_empty() {
        println!("No credentials stored yet.");
        println!("Add one with: passbox add --name <label> --username <user> --generate");
        return Ok(());
    }

    println!("Stored credentials ({}):\n", records.len());
    for record in &records {
        println!(
            "  {} │ {:20} │ {}",
            record.id, record.name, record.username
        );
    }

    Ok(())
}

// ─── Show ────────────────────────────────────────────────────────────────────

async fn cmd_show(id_str: String, reveal: bool) -> Result<(), PassboxError> {
    let id = parse_id(&id_str)?;
    let vault = open_vault()?;

    match vault.get(&id).await {
        Some(record) => {
            println!("Credential details:\n");
            println!("  ID:       {}", record.id);
            println!("  Name:     {}", record.name);
            println!("  Username: {}", record.username);
            if reveal {
                println!("  Password: {}", record.password());
            } else {
                println!("  Password: [REDACTED] (use --reveal to print it)");
            }
        }
        None => {
            println!("Credential not found: {}", id);
        }
    }

    Ok(())
}

// ─── Add ─────────────────────────────────────────────────────────────────────

async fn cmd_add(
    name: String,
    username: String,
    password: Option<String>,
    generate: bool,
    length: usize,
) -> Result<(), PassboxError> {
    let password = match (password, generate) {
        (_, true) => generator::generate(length),
        (Some(p), false) => p,
        (None, false) => {
            return Err(PassboxError::Other(
                "Provide a password with --password or --generate".to_string(),
            ));
        }
    };

    let vault = open_vault()?;
    let record = vault
        .add(NewCredential {
            name,
            username,
            password,
        })
        .await?;

    println!("✓ Credential stored");
    println!("  ID:       {}", record.id);
    println!("  Name:     {}", record.name);
    println!("  Username: {}", record.username);
    if generate {
        println!("  Password: {}", record.password());
    }

    Ok(())
}

// ─── Delete ──────────────────────────────────────────────────────────────────

async fn cmd_delete(id_str: String) -> Result<(), PassboxError> {
    let id = parse_id(&id_str)?;
    let vault = open_vault()?;

    if vault.remove(&id).await? {
        println!("✓ Credential {} deleted", id);
    } else {
        println!("Credential not found: {}", id);
    }

    Ok(())
}

// ─── Generate ────────────────────────────────────────────────────────────────

fn cmd_generate(length: usize) -> Result<(), PassboxError> {
    println!("{}", generator::generate(length));
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Hydrate the vault from the platform keyring, surfacing a notice
/// when the stored payload was unreadable and had to be reset.
fn open_vault() -> Result<Vault<KeyringBackend>, PassboxError> {
    let vault = Vault::open(KeyringBackend::from_env())?;

    if vault.recovered_from_corruption() {
        eprintln!("warning: stored credential data was unreadable; starting with an empty list");
        eprintln!("         the old data will be overwritten on the next change");
    }

    Ok(vault)
}

fn parse_id(id_str: &str) -> Result<Uuid, PassboxError> {
    Uuid::parse_str(id_str).map_err(|e| PassboxError::Other(format!("Invalid UUID: {}", e)))
}
