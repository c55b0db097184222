use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use shared::ExpenseRecord as SharedExpense;

use crate::backend::domain::models::expense::Expense as DomainExpense;

pub struct ExpenseMapper;

impl ExpenseMapper {
    pub fn to_dto(domain: DomainExpense) -> SharedExpense {
        SharedExpense {
            id: domain.id,
            owner_id: domain.owner_id,
            title: domain.title,
            amount: domain.amount,
            category: domain.category,
            date: domain.date.format("%Y-%m-%d").to_string(),
            note: domain.note,
            created_at: domain.created_at,
        }
    }

    pub fn to_domain(dto: SharedExpense) -> Result<DomainExpense> {
        let date = NaiveDate::parse_from_str(&dto.date, "%Y-%m-%d")
            .map_err(|e| anyhow!("Invalid expense date '{}': {}", dto.date, e))?;

        Ok(DomainExpense {
            id: dto.id,
            owner_id: dto.owner_id,
            title: dto.title,
            amount: dto.amount,
            category: dto.category,
            date,
            note: dto.note,
            created_at: dto.created_at,
        })
    }
}
