//! CSV storage connection: data directory layout and file paths.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

/// CsvConnection manages file paths and ensures CSV files exist for each user.
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Create a new CSV connection in the default data directory,
    /// `~/.expense-tracker`, unless `EXPENSE_TRACKER_DATA_DIR` overrides it.
    pub fn new_default() -> Result<Self> {
        let data_dir = match std::env::var("EXPENSE_TRACKER_DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => {
                let home_dir = std::env::var("HOME")
                    .or_else(|_| std::env::var("USERPROFILE"))
                    .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;
                PathBuf::from(home_dir).join(".expense-tracker")
            }
        };

        info!("Using data directory: {}", data_dir.display());
        Self::new(data_dir)
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Directory holding one user's data, created on demand.
    pub fn get_user_directory(&self, user_id: &str) -> PathBuf {
        self.base_directory
            .join(Self::generate_safe_directory_name(user_id))
    }

    /// Path of a user's expenses file
    pub fn get_expenses_file_path(&self, user_id: &str) -> PathBuf {
        self.get_user_directory(user_id).join("expenses.csv")
    }

    /// Path of the shared users file
    pub fn get_users_file_path(&self) -> PathBuf {
        self.base_directory.join("users.csv")
    }

    /// Ensure a user's expenses file exists with its header row
    pub fn ensure_expenses_file_exists(&self, user_id: &str) -> Result<()> {
        let dir = self.get_user_directory(user_id);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let file_path = self.get_expenses_file_path(user_id);
        if !file_path.exists() {
            fs::write(
                &file_path,
                "id,owner_id,title,amount,category,date,note,created_at\n",
            )?;
        }
        Ok(())
    }

    /// Ensure the users file exists with its header row
    pub fn ensure_users_file_exists(&self) -> Result<()> {
        let file_path = self.get_users_file_path();
        if !file_path.exists() {
            fs::write(
                &file_path,
                "id,email,password_hash,password_salt,email_verified,disabled,created_at\n",
            )?;
        }
        Ok(())
    }

    /// Turn a user id into a filesystem-safe directory name
    pub fn generate_safe_directory_name(user_id: &str) -> String {
        user_id
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect::<String>()
            .to_lowercase()
    }
}
