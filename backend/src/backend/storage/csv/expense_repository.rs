//! CSV-based expense repository.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use anyhow::Result;
use chrono::NaiveDate;
use csv::{Reader, Writer};
use shared::Category;
use tracing::warn;

use super::connection::CsvConnection;
use crate::backend::domain::models::expense::Expense;
use crate::backend::storage::traits::ExpenseStorage;

/// CSV-backed implementation of [`ExpenseStorage`].
///
/// One `expenses.csv` per owner directory; rows stay in the order they were
/// appended, which is what gives lists their stable insertion order.
#[derive(Clone)]
pub struct ExpenseRepository {
    connection: CsvConnection,
}

impl ExpenseRepository {
    /// Create a new CSV expense repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read all expenses for an owner from their CSV file
    fn read_expenses(&self, owner_id: &str) -> Result<Vec<Expense>> {
        self.connection.ensure_expenses_file_exists(owner_id)?;

        let file_path = self.connection.get_expenses_file_path(owner_id);
        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut expenses = Vec::new();

        for result in csv_reader.records() {
            let record = result?;

            let id = record.get(0).unwrap_or("").to_string();

            let Some(category) = Category::parse(record.get(4).unwrap_or("")) else {
                // A row outside the fixed category set would poison every
                // aggregate; leave it out of the collection.
                warn!("Skipping expense row {} with unknown category", id);
                continue;
            };
            let Ok(date) = NaiveDate::parse_from_str(record.get(5).unwrap_or(""), "%Y-%m-%d")
            else {
                warn!("Skipping expense row {} with unparsable date", id);
                continue;
            };

            expenses.push(Expense {
                id,
                owner_id: record.get(1).unwrap_or("").to_string(),
                title: record.get(2).unwrap_or("").to_string(),
                amount: record.get(3).unwrap_or("0").parse::<f64>().unwrap_or(0.0),
                category,
                date,
                note: record.get(6).unwrap_or("").to_string(),
                created_at: record.get(7).unwrap_or("").to_string(),
            });
        }

        Ok(expenses)
    }

    /// Write all expenses for an owner to their CSV file
    fn write_expenses(&self, owner_id: &str, expenses: &[Expense]) -> Result<()> {
        self.connection.ensure_expenses_file_exists(owner_id)?;
        let file_path = self.connection.get_expenses_file_path(owner_id);

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
                "owner_id",
                "title",
                "amount",
                "category",
                "date",
                "note",
                "created_at",
            ])?;

            for expense in expenses {
                let amount = expense.amount.to_string();
                let date = expense.date.format("%Y-%m-%d").to_string();
                csv_writer.write_record([
                    expense.id.as_str(),
                    expense.owner_id.as_str(),
                    expense.title.as_str(),
                    amount.as_str(),
                    expense.category.as_str(),
                    date.as_str(),
                    expense.note.as_str(),
                    expense.created_at.as_str(),
                ])?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;

        Ok(())
    }
}

impl ExpenseStorage for ExpenseRepository {
    fn store_expense(&self, expense: &Expense) -> Result<()> {
        let mut expenses = self.read_expenses(&expense.owner_id)?;
        expenses.push(expense.clone());
        self.write_expenses(&expense.owner_id, &expenses)
    }

    fn get_expense(&self, owner_id: &str, expense_id: &str) -> Result<Option<Expense>> {
        let expenses = self.read_expenses(owner_id)?;
        Ok(expenses.into_iter().find(|e| e.id == expense_id))
    }

    fn list_expenses(&self, owner_id: &str) -> Result<Vec<Expense>> {
        self.read_expenses(owner_id)
    }

    fn update_expense(&self, expense: &Expense) -> Result<bool> {
        let mut expenses = self.read_expenses(&expense.owner_id)?;

        let Some(existing) = expenses.iter_mut().find(|e| e.id == expense.id) else {
            return Ok(false);
        };
        *existing = expense.clone();

        self.write_expenses(&expense.owner_id, &expenses)?;
        Ok(true)
    }

    fn delete_expense(&self, owner_id: &str, expense_id: &str) -> Result<bool> {
        let mut expenses = self.read_expenses(owner_id)?;
        let before = expenses.len();
        expenses.retain(|e| e.id != expense_id);

        if expenses.len() == before {
            return Ok(false);
        }

        self.write_expenses(owner_id, &expenses)?;
        Ok(true)
    }
}
