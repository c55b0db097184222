//! CSV-based user account repository.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use anyhow::Result;
use csv::{Reader, Writer};

use super::connection::CsvConnection;
use crate::backend::domain::models::user::User;
use crate::backend::storage::traits::UserStorage;

/// CSV-backed implementation of [`UserStorage`].
///
/// All accounts live in a single `users.csv` at the data directory root.
#[derive(Clone)]
pub struct UserRepository {
    connection: CsvConnection,
}

impl UserRepository {
    /// Create a new CSV user repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_users(&self) -> Result<Vec<User>> {
        self.connection.ensure_users_file_exists()?;

        let file = File::open(self.connection.get_users_file_path())?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut users = Vec::new();

        for result in csv_reader.records() {
            let record = result?;

            users.push(User {
                id: record.get(0).unwrap_or("").to_string(),
                email: record.get(1).unwrap_or("").to_string(),
                password_hash: record.get(2).unwrap_or("").to_string(),
                password_salt: record.get(3).unwrap_or("").to_string(),
                email_verified: record.get(4).unwrap_or("false") == "true",
                disabled: record.get(5).unwrap_or("false") == "true",
                created_at: record.get(6).unwrap_or("").to_string(),
            });
        }

        Ok(users)
    }

    fn write_users(&self, users: &[User]) -> Result<()> {
        self.connection.ensure_users_file_exists()?;
        let file_path = self.connection.get_users_file_path();

        // Write to a temp file, then rename over the original
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;

            let writer = BufWriter::new(file);
            let mut csv_writer = Writer::from_writer(writer);

            csv_writer.write_record([
                "id",
                "email",
                "password_hash",
                "password_salt",
                "email_verified",
                "disabled",
                "created_at",
            ])?;

            for user in users {
                csv_writer.write_record([
                    user.id.as_str(),
                    user.email.as_str(),
                    user.password_hash.as_str(),
                    user.password_salt.as_str(),
                    if user.email_verified { "true" } else { "false" },
                    if user.disabled { "true" } else { "false" },
                    user.created_at.as_str(),
                ])?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;

        Ok(())
    }
}

impl UserStorage for UserRepository {
    fn store_user(&self, user: &User) -> Result<()> {
        let mut users = self.read_users()?;
        users.push(user.clone());
        self.write_users(&users)
    }

    fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let users = self.read_users()?;
        Ok(users.into_iter().find(|u| u.id == user_id))
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.read_users()?;
        Ok(users.into_iter().find(|u| u.email == email))
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let mut users = self.read_users()?;
        if let Some(existing) = users.iter_mut().find(|u| u.id == user.id) {
            *existing = user.clone();
        }
        self.write_users(&users)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        self.read_users()
    }
}
