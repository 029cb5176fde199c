use crate::expenses::ExpenseDraft;

use super::actions::EditingAction;
use super::editor::Editor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Description,
    Category,
    Date,
    Amount,
}

impl EditField {
    pub const ALL: [EditField; 4] = [
        Self::Description,
        Self::Category,
        Self::Date,
        Self::Amount,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Description => "Описание",
            Self::Category => "Категория",
            Self::Date => "Дата (гггг-мм-дд)",
            Self::Amount => "Сумма",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Edits an [`ExpenseDraft`] one field at a time.
///
/// Text fields go through an [`Editor`] that is written back into the draft
/// whenever focus moves; the category field cycles through the fixed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEditor {
    draft: ExpenseDraft,
    field: EditField,
    input: Editor,
}

impl FieldEditor {
    pub fn new(draft: ExpenseDraft) -> Self {
        let input = Editor::new(draft.description.clone());
        Self {
            draft,
            field: EditField::Description,
            input,
        }
    }

    pub fn field(&self) -> EditField {
        self.field
    }

    pub fn input(&self) -> &Editor {
        &self.input
    }

    /// The draft including whatever is typed into the focused field.
    pub fn draft(&self) -> ExpenseDraft {
        let mut draft = self.draft.clone();
        Self::write_field(&mut draft, self.field, self.input.value());
        draft
    }

    /// Current text of `field`, as it should be displayed.
    pub fn value(&self, field: EditField) -> String {
        let draft = self.draft();
        match field {
            EditField::Description => draft.description,
            EditField::Category => draft.category.label().to_string(),
            EditField::Date => draft.date,
            EditField::Amount => draft.amount,
        }
    }

    fn write_field(draft: &mut ExpenseDraft, field: EditField, value: &str) {
        match field {
            EditField::Description => draft.description = value.to_string(),
            EditField::Date => draft.date = value.to_string(),
            EditField::Amount => draft.amount = value.to_string(),
            EditField::Category => {}
        }
    }

    pub fn focus(&mut self, field: EditField) {
        if field == self.field {
            return;
        }
        self.draft = self.draft();
        self.field = field;
        self.input = match field {
            EditField::Description => Editor::new(self.draft.description.clone()),
            EditField::Date => Editor::new(self.draft.date.clone()),
            EditField::Amount => Editor::new(self.draft.amount.clone()),
            EditField::Category => Editor::default(),
        };
    }

    /// Applies a keystroke. `Confirm` and `Leave` are left to the owner.
    pub fn apply(&mut self, action: EditingAction) {
        match (self.field, action) {
            (_, EditingAction::NextField) => self.focus(self.field.next()),
            (_, EditingAction::PrevField) => self.focus(self.field.prev()),
            (EditField::Category, EditingAction::MoveLeft) => {
                self.draft.category = self.draft.category.prev()
            }
            (EditField::Category, EditingAction::MoveRight | EditingAction::InsertChar(' ')) => {
                self.draft.category = self.draft.category.next()
            }
            (EditField::Category, _) => {}
            (_, EditingAction::InsertChar(c)) => self.input.insert_char(c),
            (_, EditingAction::DeleteLeft) => self.input.delete_left(),
            (_, EditingAction::DeleteRight) => self.input.delete_right(),
            (_, EditingAction::MoveLeft) => self.input.move_left(),
            (_, EditingAction::MoveRight) => self.input.move_right(),
            (_, EditingAction::Home) => self.input.move_home(),
            (_, EditingAction::End) => self.input.move_end(),
            (_, EditingAction::Confirm | EditingAction::Leave) => {}
        }
    }
}
