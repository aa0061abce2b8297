//! The create/edit task form.

use taskdesk_types::{DraftInput, Field, FieldErrors, Schema, Task, TaskDraft, TaskId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(TaskId),
}

/// Result of pressing submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// A previous submission has not resolved yet.
    Busy,
    /// Validation failed; errors are now on the form.
    Invalid,
    Create(Task),
    Update(TaskId, Task),
}

#[derive(Debug, Clone)]
pub struct TaskForm {
    mode: FormMode,
    full_name: DraftInput,
    title: DraftInput,
    description: DraftInput,
    initial: TaskDraft,
    errors: FieldErrors,
    focus: Field,
    submitting: bool,
    schema: Schema,
}

impl TaskForm {
    #[must_use]
    pub fn create() -> Self {
        Self::with_mode(FormMode::Create, TaskDraft::default())
    }

    /// Prefilled from `task`; submits as an update of its id.
    #[must_use]
    pub fn edit(task: &Task) -> Self {
        Self::with_mode(FormMode::Edit(task.id.clone()), task.draft())
    }

    fn with_mode(mode: FormMode, initial: TaskDraft) -> Self {
        Self {
            mode,
            full_name: DraftInput::with_text(initial.full_name.clone()),
            title: DraftInput::with_text(initial.title.clone()),
            description: DraftInput::with_text(initial.description.clone()),
            initial,
            errors: FieldErrors::default(),
            focus: Field::FullName,
            submitting: false,
            schema: Schema::task(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    #[must_use]
    pub fn input(&self, field: Field) -> &DraftInput {
        match field {
            Field::FullName => &self.full_name,
            Field::Title => &self.title,
            Field::Description => &self.description,
        }
    }

    fn input_mut(&mut self, field: Field) -> &mut DraftInput {
        match field {
            Field::FullName => &mut self.full_name,
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
        }
    }

    #[must_use]
    pub fn focus(&self) -> Field {
        self.focus
    }

    /// Move focus, validating the field being left.
    pub fn set_focus(&mut self, field: Field) {
        if field != self.focus {
            self.blur(self.focus);
            self.focus = field;
        }
    }

    /// Focus `field` when arriving from outside the form. Nothing is blurred.
    pub fn enter(&mut self, field: Field) {
        self.focus = field;
    }

    pub fn focus_next(&mut self) {
        self.set_focus(self.focus.next());
    }

    pub fn focus_previous(&mut self) {
        self.set_focus(self.focus.previous());
    }

    pub fn blur(&mut self, field: Field) {
        let message = self
            .schema
            .validate_field(field, self.input(field).text());
        self.errors.set(field, message);
    }

    pub fn enter_char(&mut self, c: char) {
        self.input_mut(self.focus).enter_char(c);
    }

    pub fn delete_char(&mut self) {
        self.input_mut(self.focus).delete_char();
    }

    pub fn delete_char_forward(&mut self) {
        self.input_mut(self.focus).delete_char_forward();
    }

    pub fn move_cursor_left(&mut self) {
        self.input_mut(self.focus).move_cursor_left();
    }

    pub fn move_cursor_right(&mut self) {
        self.input_mut(self.focus).move_cursor_right();
    }

    pub fn move_cursor_home(&mut self) {
        self.input_mut(self.focus).move_cursor_home();
    }

    pub fn move_cursor_end(&mut self) {
        self.input_mut(self.focus).move_cursor_end();
    }

    #[must_use]
    pub fn draft(&self) -> TaskDraft {
        TaskDraft::new(
            self.full_name.text(),
            self.title.text(),
            self.description.text(),
        )
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validate every field and, if clean, produce the request to send.
    ///
    /// `now_millis` becomes the id of a created task.
    pub fn submit(&mut self, now_millis: u64) -> Submission {
        if self.submitting {
            return Submission::Busy;
        }
        let draft = self.draft();
        self.errors = self.schema.validate(&draft);
        if !self.errors.is_empty() {
            return Submission::Invalid;
        }
        self.submitting = true;
        match &self.mode {
            FormMode::Create => {
                Submission::Create(Task::from_draft(TaskId::from_millis(now_millis), draft))
            }
            FormMode::Edit(id) => Submission::Update(id.clone(), Task::from_draft(id.clone(), draft)),
        }
    }

    /// The submission resolved. Success resets the fields; failure keeps
    /// what the user typed.
    pub fn finish(&mut self, succeeded: bool) {
        self.submitting = false;
        if succeeded {
            self.reset();
        }
    }

    /// Back to the initial values (empty for a create form).
    pub fn reset(&mut self) {
        let initial = self.initial.clone();
        self.full_name.set_text(initial.full_name);
        self.title.set_text(initial.title);
        self.description.set_text(initial.description);
        self.errors.clear();
        self.focus = Field::FullName;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_into(form: &mut TaskForm, field: Field, text: &str) {
        form.set_focus(field);
        for c in text.chars() {
            form.enter_char(c);
        }
    }

    #[test]
    fn empty_submit_flags_every_field() {
        let mut form = TaskForm::create();
        assert_eq!(form.submit(1), Submission::Invalid);
        assert_eq!(form.errors().get(Field::FullName), Some("Full Name is required"));
        assert_eq!(form.errors().get(Field::Title), Some("Title is required"));
        assert_eq!(
            form.errors().get(Field::Description),
            Some("Description is required")
        );
        assert!(!form.is_submitting());
    }

    #[test]
    fn blur_validates_only_the_field_left() {
        let mut form = TaskForm::create();
        form.focus_next();
        assert_eq!(form.focus(), Field::Title);
        assert_eq!(form.errors().len(), 1);
        assert!(form.errors().get(Field::FullName).is_some());

        form.focus_previous();
        form.enter_char('A');
        form.focus_next();
        assert!(form.errors().get(Field::FullName).is_none());
        // Title was left empty on the way back.
        assert!(form.errors().get(Field::Title).is_some());
    }

    #[test]
    fn create_submission_uses_clock_id_and_blocks_resubmit() {
        let mut form = TaskForm::create();
        type_into(&mut form, Field::FullName, "A");
        type_into(&mut form, Field::Title, "B");
        type_into(&mut form, Field::Description, "C");

        let Submission::Create(task) = form.submit(1_700_000_000_000) else {
            panic!("expected create");
        };
        assert_eq!(task.id, TaskId::Number(1_700_000_000_000));
        assert_eq!(task.draft(), TaskDraft::new("A", "B", "C"));
        assert_eq!(form.submit(1), Submission::Busy);

        form.finish(true);
        assert!(!form.is_submitting());
        assert_eq!(form.draft(), TaskDraft::default());
    }

    #[test]
    fn failed_submission_preserves_values() {
        let mut form = TaskForm::create();
        type_into(&mut form, Field::FullName, "A");
        type_into(&mut form, Field::Title, "B");
        type_into(&mut form, Field::Description, "C");
        assert!(matches!(form.submit(5), Submission::Create(_)));
        form.finish(false);
        assert_eq!(form.draft(), TaskDraft::new("A", "B", "C"));
    }

    #[test]
    fn edit_form_is_prefilled_and_submits_update() {
        let task = Task::from_draft(TaskId::from("t1"), TaskDraft::new("A", "B", "C"));
        let mut form = TaskForm::edit(&task);
        assert!(form.is_editing());
        assert_eq!(form.draft(), task.draft());

        form.set_focus(Field::Title);
        form.move_cursor_end();
        form.enter_char('2');
        match form.submit(99) {
            Submission::Update(id, updated) => {
                assert_eq!(id, TaskId::from("t1"));
                assert_eq!(updated.id, id);
                assert_eq!(updated.title, "B2");
            }
            other => panic!("expected update, got {other:?}"),
        }
    }
}
