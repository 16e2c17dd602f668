//! Todo Creation Form State
//!
//! Submission is split around the backend call so a UI can render the
//! intermediate state: `begin_submit` clears the input and enters the
//! submitting state before anything is awaited, and `finish_submit` either
//! leaves the input cleared or puts the captured text back.
//!
//! The created todo is never inserted into a local list from here; the
//! list's change subscription is what makes it appear.

use crate::domain::{BackendError, NewTodo, Todo};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFormState {
    content: String,
    submitting: bool,
}

/// Trimmed text captured when a submission starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTodo {
    content: String,
}

impl PendingTodo {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn to_new_todo(&self) -> NewTodo {
        NewTodo::new(self.content.clone())
    }
}

impl TodoFormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        if !self.submitting {
            self.content = content.into();
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether the submit control is enabled
    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.content.trim().is_empty()
    }

    /// Capture the trimmed text, clear the input, and enter the submitting
    /// state. `None` (and no state change) when there is nothing to submit.
    pub fn begin_submit(&mut self) -> Option<PendingTodo> {
        if !self.can_submit() {
            return None;
        }
        let content = self.content.trim().to_string();
        self.content.clear();
        self.submitting = true;
        Some(PendingTodo { content })
    }

    /// Leave the submitting state. On failure the captured text is restored
    /// so it can be retried.
    pub fn finish_submit(&mut self, pending: PendingTodo, outcome: &Result<Todo, BackendError>) {
        self.submitting = false;
        if let Err(err) = outcome {
            log::error!("creating todo failed: {err}");
            self.content = pending.content;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::backend::TodoBackend;

    async fn submit(form: &mut TodoFormState, backend: &MemoryBackend) -> Option<Result<Todo, BackendError>> {
        let pending = form.begin_submit()?;
        let outcome = backend.create(pending.to_new_todo()).await;
        form.finish_submit(pending, &outcome);
        Some(outcome)
    }

    #[tokio::test]
    async fn test_blank_content_is_a_no_op() {
        let backend = MemoryBackend::new();
        for blank in ["", "   ", "\t\n "] {
            let mut form = TodoFormState::new();
            form.set_content(blank);
            assert!(!form.can_submit());
            assert!(submit(&mut form, &backend).await.is_none());
            assert_eq!(form.content(), blank);
            assert!(!form.is_submitting());
        }
        assert!(backend.snapshot().is_empty());
    }

    #[test]
    fn test_begin_submit_clears_input_immediately() {
        let mut form = TodoFormState::new();
        form.set_content("  Buy milk  ");
        let pending = form.begin_submit().unwrap();

        assert_eq!(pending.content(), "Buy milk");
        assert_eq!(pending.to_new_todo().priority, 0);
        assert_eq!(form.content(), "");
        assert!(form.is_submitting());
        assert!(!form.can_submit());
    }

    #[tokio::test]
    async fn test_success_leaves_input_cleared() {
        let backend = MemoryBackend::new();
        let mut form = TodoFormState::new();
        form.set_content("Buy milk");

        let created = submit(&mut form, &backend).await.unwrap().unwrap();
        assert_eq!(created.content, "Buy milk");
        assert_eq!(form.content(), "");
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_failure_restores_submitted_text() {
        let backend = MemoryBackend::new();
        backend.fail_creates(true);
        let mut form = TodoFormState::new();
        form.set_content("  Walk the dog ");

        assert!(submit(&mut form, &backend).await.unwrap().is_err());
        assert_eq!(form.content(), "Walk the dog");
        assert!(!form.is_submitting());
        assert!(backend.snapshot().is_empty());
    }

    #[test]
    fn test_input_is_locked_while_submitting() {
        let mut form = TodoFormState::new();
        form.set_content("a");
        let _pending = form.begin_submit().unwrap();
        form.set_content("typed during submit");
        assert_eq!(form.content(), "");
    }
}
