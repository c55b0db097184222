//! Expense form state management.
//!
//! This module contains the editor state machine and all form-level business
//! rules: buffer handling, validation on submit, the loading flag, and the
//! timed banner messages. The UI should only handle presentation concerns.
//!
//! The editor has two states. Creating: no record selected, submit creates.
//! Editing: a record is selected, submit overwrites it and returns to
//! Creating on success or explicit cancel. Selecting a record while already
//! editing another discards the in-progress buffer silently - there is never
//! more than one edit session.

use chrono::Local;
use shared::{
    CreateExpenseRequest, EditorMode, ExpenseFormConfig, ExpenseFormState, ExpenseFormValidation,
    ExpenseRecord, UpdateExpenseRequest,
};

use crate::backend::domain::expense_validator::ExpenseValidator;

/// Form fields addressable by [`ExpenseFormService::set_field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Amount,
    Category,
    Date,
    Note,
}

/// What a successful submit should do, ready for the persistence layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitAction {
    Create(CreateExpenseRequest),
    Update {
        expense_id: String,
        request: UpdateExpenseRequest,
    },
}

/// Expense form service that owns all form-related business logic.
#[derive(Clone)]
pub struct ExpenseFormService {
    validator: ExpenseValidator,
    config: ExpenseFormConfig,
}

impl Default for ExpenseFormService {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseFormService {
    pub fn new() -> Self {
        Self::with_config(ExpenseFormConfig::default())
    }

    pub fn with_config(config: ExpenseFormConfig) -> Self {
        Self {
            validator: ExpenseValidator::with_config(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &ExpenseFormConfig {
        &self.config
    }

    /// A blank form in Creating mode, date defaulted to today.
    pub fn create_form_state(&self) -> ExpenseFormState {
        ExpenseFormState {
            title: String::new(),
            amount_input: String::new(),
            category_input: String::new(),
            date_input: Local::now().date_naive().format("%Y-%m-%d").to_string(),
            note: String::new(),
            mode: EditorMode::Creating,
            is_submitting: false,
            error_message: None,
            success_message: None,
            error_set_at_ms: None,
            success_set_at_ms: None,
        }
    }

    /// Merge one field value into the buffer.
    pub fn set_field(&self, state: &mut ExpenseFormState, field: FormField, value: &str) {
        match field {
            FormField::Title => state.title = value.to_string(),
            FormField::Amount => state.amount_input = value.to_string(),
            FormField::Category => state.category_input = value.to_string(),
            FormField::Date => state.date_input = value.to_string(),
            FormField::Note => state.note = value.to_string(),
        }
    }

    /// Select a record for editing.
    ///
    /// Any in-progress buffer - including a different record's pending edits -
    /// is discarded silently and replaced by the selected record's fields.
    pub fn begin_edit(&self, state: &mut ExpenseFormState, expense: &ExpenseRecord) {
        state.title = expense.title.clone();
        state.amount_input = format!("{}", expense.amount);
        state.category_input = expense.category.as_str().to_string();
        state.date_input = expense.date.clone();
        state.note = expense.note.clone();
        state.mode = EditorMode::Editing {
            expense_id: expense.id.clone(),
        };
        state.is_submitting = false;
    }

    /// Abandon the edit session and return to a blank Creating form.
    pub fn cancel_edit(&self, state: &mut ExpenseFormState) {
        *state = self.create_form_state();
    }

    /// Validate the current buffer without touching any state.
    pub fn validate(&self, state: &ExpenseFormState) -> ExpenseFormValidation {
        self.validator.validate_form(
            &state.title,
            &state.amount_input,
            &state.category_input,
            &state.date_input,
        )
    }

    /// Attempt a submit.
    ///
    /// Returns the action the caller should perform against persistence, or
    /// None when the form is invalid (an inline error is set) or a submit is
    /// already in flight. On success the loading flag is raised; interaction
    /// stays disabled until [`Self::finish_submit_success`] or
    /// [`Self::finish_submit_failure`] settles it.
    pub fn prepare_submit(
        &self,
        state: &mut ExpenseFormState,
        now_ms: u64,
    ) -> Option<SubmitAction> {
        if state.is_submitting {
            return None;
        }

        let validation = self.validate(state);
        if !validation.is_valid {
            let message = validation
                .errors
                .first()
                .map(|e| self.validator.get_error_message(e))
                .unwrap_or_else(|| "Invalid input".to_string());
            self.set_error(state, message, now_ms);
            return None;
        }

        let amount = validation.cleaned_amount?;
        state.is_submitting = true;
        state.error_message = None;
        state.error_set_at_ms = None;

        let action = match &state.mode {
            EditorMode::Creating => SubmitAction::Create(CreateExpenseRequest {
                title: state.title.trim().to_string(),
                amount,
                category: state.category_input.clone(),
                date: Some(state.date_input.clone()),
                note: if state.note.is_empty() {
                    None
                } else {
                    Some(state.note.clone())
                },
            }),
            EditorMode::Editing { expense_id } => SubmitAction::Update {
                expense_id: expense_id.clone(),
                request: UpdateExpenseRequest {
                    title: state.title.trim().to_string(),
                    amount,
                    category: state.category_input.clone(),
                    date: state.date_input.clone(),
                    note: if state.note.is_empty() {
                        None
                    } else {
                        Some(state.note.clone())
                    },
                },
            },
        };

        Some(action)
    }

    /// Settle a submit that succeeded: clear the buffer, show the success
    /// banner, and return an Editing session to Creating.
    pub fn finish_submit_success(
        &self,
        state: &mut ExpenseFormState,
        message: String,
        now_ms: u64,
    ) {
        *state = self.create_form_state();
        state.success_message = Some(message);
        state.success_set_at_ms = Some(now_ms);
    }

    /// Settle a submit that failed: re-enable the form and show the error
    /// banner. The buffer is kept so the user can retry.
    pub fn finish_submit_failure(
        &self,
        state: &mut ExpenseFormState,
        message: String,
        now_ms: u64,
    ) {
        state.is_submitting = false;
        self.set_error(state, message, now_ms);
    }

    /// Dismiss the error banner.
    pub fn clear_error(&self, state: &mut ExpenseFormState) {
        state.error_message = None;
        state.error_set_at_ms = None;
    }

    /// Clear banners whose display time has elapsed.
    pub fn expire_banners(&self, state: &mut ExpenseFormState, now_ms: u64) {
        if let Some(set_at) = state.error_set_at_ms {
            if now_ms.saturating_sub(set_at) >= self.config.error_message_duration_ms {
                self.clear_error(state);
            }
        }
        if let Some(set_at) = state.success_set_at_ms {
            if now_ms.saturating_sub(set_at) >= self.config.success_message_duration_ms {
                state.success_message = None;
                state.success_set_at_ms = None;
            }
        }
    }

    fn set_error(&self, state: &mut ExpenseFormState, message: String, now_ms: u64) {
        state.error_message = Some(message);
        state.error_set_at_ms = Some(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Category;

    fn record(id: &str, title: &str, amount: f64, category: Category) -> ExpenseRecord {
        ExpenseRecord {
            id: id.to_string(),
            owner_id: "user::a".to_string(),
            title: title.to_string(),
            amount,
            category,
            date: "2025-06-10".to_string(),
            note: "note".to_string(),
            created_at: "2025-06-10T12:00:00+00:00".to_string(),
        }
    }

    fn filled_creating_state(service: &ExpenseFormService) -> ExpenseFormState {
        let mut state = service.create_form_state();
        service.set_field(&mut state, FormField::Title, "Lunch");
        service.set_field(&mut state, FormField::Amount, "12.50");
        service.set_field(&mut state, FormField::Category, "Food");
        service.set_field(&mut state, FormField::Date, "2025-06-10");
        state
    }

    #[test]
    fn test_blank_form_defaults_date_to_today() {
        let service = ExpenseFormService::new();
        let state = service.create_form_state();

        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(state.date_input, today);
        assert_eq!(state.mode, EditorMode::Creating);
        assert!(!state.is_submitting);
    }

    #[test]
    fn test_submit_in_creating_mode_yields_create() {
        let service = ExpenseFormService::new();
        let mut state = filled_creating_state(&service);

        let action = service.prepare_submit(&mut state, 1000).unwrap();
        match action {
            SubmitAction::Create(request) => {
                assert_eq!(request.title, "Lunch");
                assert_eq!(request.amount, 12.5);
                assert_eq!(request.category, "Food");
                assert_eq!(request.date, Some("2025-06-10".to_string()));
            }
            other => panic!("expected Create, got {:?}", other),
        }
        assert!(state.is_submitting);
    }

    #[test]
    fn test_begin_edit_fills_buffer_and_switches_mode() {
        let service = ExpenseFormService::new();
        let mut state = service.create_form_state();

        service.begin_edit(&mut state, &record("expense::1", "Rent", 800.0, Category::Bills));

        assert_eq!(state.title, "Rent");
        assert_eq!(state.amount_input, "800");
        assert_eq!(state.category_input, "Bills");
        assert_eq!(
            state.mode,
            EditorMode::Editing {
                expense_id: "expense::1".to_string()
            }
        );
    }

    #[test]
    fn test_selecting_another_record_discards_pending_edits() {
        let service = ExpenseFormService::new();
        let mut state = service.create_form_state();

        // Start editing X and change a field...
        service.begin_edit(&mut state, &record("expense::1", "Rent", 800.0, Category::Bills));
        service.set_field(&mut state, FormField::Title, "Rent (edited, unsaved)");

        // ...then select Y before submitting. X's pending edit is gone; only
        // Y's fields populate the editor.
        service.begin_edit(&mut state, &record("expense::2", "Bus", 2.75, Category::Transport));

        assert_eq!(state.title, "Bus");
        assert_eq!(state.amount_input, "2.75");
        assert_eq!(state.category_input, "Transport");
        assert_eq!(
            state.mode,
            EditorMode::Editing {
                expense_id: "expense::2".to_string()
            }
        );
    }

    #[test]
    fn test_submit_in_editing_mode_yields_update_then_returns_to_creating() {
        let service = ExpenseFormService::new();
        let mut state = service.create_form_state();
        service.begin_edit(&mut state, &record("expense::1", "Rent", 800.0, Category::Bills));
        service.set_field(&mut state, FormField::Amount, "850");

        let action = service.prepare_submit(&mut state, 1000).unwrap();
        match action {
            SubmitAction::Update {
                expense_id,
                request,
            } => {
                assert_eq!(expense_id, "expense::1");
                assert_eq!(request.amount, 850.0);
                assert_eq!(request.title, "Rent");
            }
            other => panic!("expected Update, got {:?}", other),
        }

        service.finish_submit_success(&mut state, "Expense updated".to_string(), 2000);
        assert_eq!(state.mode, EditorMode::Creating);
        assert!(!state.is_submitting);
        assert_eq!(state.title, "");
        assert_eq!(state.success_message, Some("Expense updated".to_string()));
    }

    #[test]
    fn test_cancel_edit_returns_to_creating() {
        let service = ExpenseFormService::new();
        let mut state = service.create_form_state();
        service.begin_edit(&mut state, &record("expense::1", "Rent", 800.0, Category::Bills));

        service.cancel_edit(&mut state);

        assert_eq!(state.mode, EditorMode::Creating);
        assert_eq!(state.title, "");
        assert_eq!(state.amount_input, "");
    }

    #[test]
    fn test_invalid_submit_sets_inline_error() {
        let service = ExpenseFormService::new();
        let mut state = service.create_form_state();
        // Title left empty

        let action = service.prepare_submit(&mut state, 1000);
        assert!(action.is_none());
        assert!(!state.is_submitting);
        assert_eq!(state.error_message, Some("Please enter a title".to_string()));
        assert_eq!(state.error_set_at_ms, Some(1000));
    }

    #[test]
    fn test_submit_while_submitting_is_a_no_op() {
        let service = ExpenseFormService::new();
        let mut state = filled_creating_state(&service);

        assert!(service.prepare_submit(&mut state, 1000).is_some());
        // Still in flight: a second submit does nothing
        assert!(service.prepare_submit(&mut state, 1001).is_none());
    }

    #[test]
    fn test_failed_submit_keeps_buffer_for_retry() {
        let service = ExpenseFormService::new();
        let mut state = filled_creating_state(&service);
        service.prepare_submit(&mut state, 1000).unwrap();

        service.finish_submit_failure(
            &mut state,
            "Something went wrong. Please try again.".to_string(),
            2000,
        );

        assert!(!state.is_submitting);
        assert_eq!(state.title, "Lunch");
        assert_eq!(
            state.error_message,
            Some("Something went wrong. Please try again.".to_string())
        );

        // The user can retry immediately
        assert!(service.prepare_submit(&mut state, 3000).is_some());
    }

    #[test]
    fn test_error_banner_auto_clears_after_configured_delay() {
        let service = ExpenseFormService::new();
        let mut state = service.create_form_state();
        service.finish_submit_failure(&mut state, "oops".to_string(), 1000);

        // Not yet
        service.expire_banners(&mut state, 1000 + 4999);
        assert!(state.error_message.is_some());

        // 5000 ms after being set, it is gone
        service.expire_banners(&mut state, 1000 + 5000);
        assert!(state.error_message.is_none());
        assert!(state.error_set_at_ms.is_none());
    }

    #[test]
    fn test_success_banner_auto_clears_after_configured_delay() {
        let service = ExpenseFormService::new();
        let mut state = service.create_form_state();
        service.finish_submit_success(&mut state, "Expense added".to_string(), 1000);

        service.expire_banners(&mut state, 1000 + 2999);
        assert!(state.success_message.is_some());

        service.expire_banners(&mut state, 1000 + 3000);
        assert!(state.success_message.is_none());
    }
}
