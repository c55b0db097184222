//! Expense service domain logic for the expense tracker.
//!
//! Owns CRUD orchestration over the storage trait, the ownership boundary
//! (every operation is scoped to the requesting user), and the live
//! subscription mechanism that re-delivers a full snapshot of an owner's
//! records after every mutation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Local, Utc};
use shared::ExpenseRecord;
use tokio::sync::watch;
use tracing::{error, info};

use crate::backend::domain::commands::expenses::{
    CreateExpenseCommand, DeleteExpenseCommand, DeleteExpenseResult, ExpenseListQuery,
    ExpenseListResult, ExpenseSummaryQuery, UpdateExpenseCommand,
};
use crate::backend::domain::errors::ExpenseServiceError;
use crate::backend::domain::expense_validator::ExpenseValidator;
use crate::backend::domain::models::expense::Expense as DomainExpense;
use crate::backend::domain::projection::ProjectionService;
use crate::backend::storage::traits::ExpenseStorage;

/// A live view of one owner's expense records.
///
/// Each delivery is the FULL matching result set - a wholesale overwrite of
/// whatever the holder was displaying, never an incremental patch. The
/// snapshot is authoritative and always wins over local optimistic state.
/// Dropping the handle (or calling [`ExpenseSubscription::cancel`]) releases
/// it; nothing is delivered after release.
pub struct ExpenseSubscription {
    owner_id: String,
    receiver: watch::Receiver<Vec<DomainExpense>>,
}

impl ExpenseSubscription {
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// The most recently delivered snapshot.
    pub fn latest(&self) -> Vec<DomainExpense> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next snapshot. Returns `None` once the service side has
    /// gone away.
    pub async fn next_snapshot(&mut self) -> Option<Vec<DomainExpense>> {
        match self.receiver.changed().await {
            Ok(()) => Some(self.receiver.borrow_and_update().clone()),
            Err(_) => None,
        }
    }

    /// Explicit release for teardown and signed-out transitions.
    pub fn cancel(self) {
        // Dropping the receiver is the release; the service prunes the
        // sender on its next publish.
    }
}

#[derive(Clone)]
pub struct ExpenseService {
    expense_repository: Arc<dyn ExpenseStorage>,
    validator: ExpenseValidator,
    projection: ProjectionService,
    subscriptions: Arc<Mutex<HashMap<String, watch::Sender<Vec<DomainExpense>>>>>,
    last_id_millis: Arc<Mutex<u64>>,
}

impl ExpenseService {
    pub fn new(expense_repository: Arc<dyn ExpenseStorage>) -> Self {
        Self {
            expense_repository,
            validator: ExpenseValidator::new(),
            projection: ProjectionService::new(),
            subscriptions: Arc::new(Mutex::new(HashMap::new())),
            last_id_millis: Arc::new(Mutex::new(0)),
        }
    }

    pub fn validator(&self) -> &ExpenseValidator {
        &self.validator
    }

    pub fn create_expense(
        &self,
        command: CreateExpenseCommand,
    ) -> Result<DomainExpense, ExpenseServiceError> {
        // Today in local time when no date is provided, matching the form's
        // default date field.
        let date = command
            .date
            .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string());

        let draft = self
            .validator
            .validate_record(
                &command.title,
                command.amount,
                &command.category,
                &date,
                command.note,
            )
            .map_err(|e| ExpenseServiceError::Validation(self.validator.get_error_message(&e)))?;

        let expense = DomainExpense {
            id: self.next_expense_id()?,
            owner_id: command.owner_id.clone(),
            title: draft.title,
            amount: draft.amount,
            category: draft.category,
            date: draft.date,
            note: draft.note,
            created_at: Utc::now().to_rfc3339(),
        };

        self.expense_repository.store_expense(&expense)?;
        info!("Created expense {} for owner {}", expense.id, expense.owner_id);

        self.publish_snapshot(&command.owner_id);
        Ok(expense)
    }

    pub fn update_expense(
        &self,
        command: UpdateExpenseCommand,
    ) -> Result<DomainExpense, ExpenseServiceError> {
        let mut expense = self
            .expense_repository
            .get_expense(&command.owner_id, &command.expense_id)?
            .ok_or(ExpenseServiceError::NotFound)?;

        let draft = self
            .validator
            .validate_record(
                &command.title,
                command.amount,
                &command.category,
                &command.date,
                command.note,
            )
            .map_err(|e| ExpenseServiceError::Validation(self.validator.get_error_message(&e)))?;

        // Full overwrite of the editable fields, never a partial merge.
        expense.overwrite_with(draft);

        if !self.expense_repository.update_expense(&expense)? {
            return Err(ExpenseServiceError::NotFound);
        }
        info!("Updated expense {} for owner {}", expense.id, expense.owner_id);

        self.publish_snapshot(&command.owner_id);
        Ok(expense)
    }

    pub fn delete_expense(
        &self,
        command: DeleteExpenseCommand,
    ) -> Result<DeleteExpenseResult, ExpenseServiceError> {
        let deleted = self
            .expense_repository
            .delete_expense(&command.owner_id, &command.expense_id)?;

        if deleted {
            info!(
                "Deleted expense {} for owner {}",
                command.expense_id, command.owner_id
            );
            self.publish_snapshot(&command.owner_id);
        }

        Ok(DeleteExpenseResult {
            deleted,
            success_message: if deleted {
                "Expense deleted".to_string()
            } else {
                "Expense was already gone".to_string()
            },
        })
    }

    /// List an owner's expenses, narrowed by the query's filter.
    ///
    /// Every call re-reads storage and re-runs the filter from scratch; a
    /// filter change is a fresh evaluation, not a patch of a previous result.
    pub fn list_expenses(
        &self,
        query: ExpenseListQuery,
    ) -> Result<ExpenseListResult, ExpenseServiceError> {
        let all = self.expense_repository.list_expenses(&query.owner_id)?;
        Ok(ExpenseListResult {
            expenses: query.filter.apply(&all),
        })
    }

    /// Filtered records plus their aggregates, shaped for the list display
    /// and the category chart.
    pub fn summarize(
        &self,
        query: ExpenseSummaryQuery,
    ) -> Result<shared::ExpenseSummaryResponse, ExpenseServiceError> {
        let all = self.expense_repository.list_expenses(&query.owner_id)?;
        let filtered = query.filter.apply(&all);
        Ok(self.projection.project_summary(&filtered))
    }

    /// Open a live subscription to an owner's records.
    ///
    /// The handle starts with the current snapshot and receives the full
    /// result set again after every mutation.
    pub fn subscribe(&self, owner_id: &str) -> Result<ExpenseSubscription, ExpenseServiceError> {
        let current = self.expense_repository.list_expenses(owner_id)?;

        let mut subscriptions = self.subscriptions.lock().unwrap();
        let receiver = match subscriptions.get(owner_id) {
            Some(sender) if !sender.is_closed() => {
                sender.send_replace(current);
                sender.subscribe()
            }
            _ => {
                let (sender, receiver) = watch::channel(current);
                subscriptions.insert(owner_id.to_string(), sender);
                receiver
            }
        };

        Ok(ExpenseSubscription {
            owner_id: owner_id.to_string(),
            receiver,
        })
    }

    /// Push a fresh full snapshot to this owner's subscribers, pruning
    /// channels nobody listens to anymore.
    fn publish_snapshot(&self, owner_id: &str) {
        let mut subscriptions = self.subscriptions.lock().unwrap();

        let closed = match subscriptions.get(owner_id) {
            Some(sender) => sender.is_closed(),
            None => return,
        };
        if closed {
            subscriptions.remove(owner_id);
            return;
        }

        let snapshot = match self.expense_repository.list_expenses(owner_id) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                // The mutation itself already succeeded; subscribers keep
                // their previous snapshot until the next publish.
                error!("Failed to load snapshot for subscription publish: {}", e);
                return;
            }
        };

        if let Some(sender) = subscriptions.get(owner_id) {
            sender.send_replace(snapshot);
        }
    }

    fn next_expense_id(&self) -> Result<String, ExpenseServiceError> {
        let now_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ExpenseServiceError::Persistence(anyhow::anyhow!(e)))?
            .as_millis() as u64;

        // Strictly monotonic so two creates in the same millisecond cannot
        // collide on the same id.
        let mut last = self.last_id_millis.lock().unwrap();
        let millis = now_millis.max(*last + 1);
        *last = millis;

        Ok(ExpenseRecord::generate_id(millis))
    }
}
