use std::{collections::HashSet, fs, path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shared::domain::{Doctor, DoctorId};
use storage::{DirectoryCache, SqliteStore};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/doctors_cache.db")]
    cache_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the cached doctor list as JSON.
    Show,
    /// Drop the cached doctor list.
    Clear,
    /// Replace the cached doctor list with the JSON array in `file`.
    Import { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("warn").init();
    let cli = Cli::parse();
    let store = SqliteStore::new(&cli.cache_url).await?;
    let cache = DirectoryCache::new(Arc::new(store));

    match cli.command {
        Command::Show => match cache.load().await {
            Some(doctors) => println!("{}", serde_json::to_string_pretty(&doctors)?),
            None => println!("no cached doctors"),
        },
        Command::Clear => {
            cache.clear().await?;
            println!("cleared cached doctors");
        }
        Command::Import { file } => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("failed to read '{}'", file.display()))?;
            let doctors: Vec<Doctor> = serde_json::from_str(&raw)
                .with_context(|| format!("'{}' is not a JSON doctor list", file.display()))?;
            validate_import(&doctors)?;
            cache.save(&doctors).await?;
            println!("imported {} doctors", doctors.len());
        }
    }

    Ok(())
}

/// Every doctor needs a name and an id no other entry uses.
fn validate_import(doctors: &[Doctor]) -> Result<()> {
    let mut seen: HashSet<&DoctorId> = HashSet::new();
    for doctor in doctors {
        if doctor.name.trim().is_empty() {
            bail!("doctor {} has an empty name", doctor.id);
        }
        if !seen.insert(&doctor.id) {
            bail!("doctor id {} appears more than once", doctor.id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_unique_named_doctors() {
        let doctors = vec![
            Doctor::new(1, "Ivanov", "Cardiology"),
            Doctor::new("1", "Petrova", "Neurology"),
        ];
        assert!(validate_import(&doctors).is_ok());
        assert!(validate_import(&[]).is_ok());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let doctors = vec![
            Doctor::new(1, "Ivanov", "Cardiology"),
            Doctor::new(2, "Petrova", "Neurology"),
            Doctor::new(1, "Karimov", "Surgery"),
        ];
        let err = validate_import(&doctors).expect_err("duplicate id");
        assert!(err.to_string().contains("doctor id 1 appears more than once"));
    }

    #[test]
    fn rejects_blank_names() {
        let doctors = vec![Doctor::new(3, "  ", "Surgery")];
        assert!(validate_import(&doctors).is_err());
    }
}
