use std::fmt::Display;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{RashodyError, ValidationError};
use crate::parse::{parse_amount, round_amount};

pub mod storage;
pub mod store;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Exclusive upper bound for amounts. Below it every two-place value
/// survives the round trip through a JSON float unchanged.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_316_134_912, 2_328, 0, false, 0);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    #[default]
    #[serde(rename = "Еда")]
    Food,
    #[serde(rename = "Транспорт")]
    Transport,
    #[serde(rename = "Жилье")]
    Housing,
    #[serde(rename = "Развлечения")]
    Entertainment,
    #[serde(rename = "Образование")]
    Education,
    #[serde(rename = "Другое")]
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 6] = [
        Self::Food,
        Self::Transport,
        Self::Housing,
        Self::Entertainment,
        Self::Education,
        Self::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Food => "Еда",
            Self::Transport => "Транспорт",
            Self::Housing => "Жилье",
            Self::Entertainment => "Развлечения",
            Self::Education => "Образование",
            Self::Other => "Другое",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ExpenseCategory {
    type Err = RashodyError;

    /// Accepts the display label or the english variant name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| {
                c.label().to_lowercase() == wanted || format!("{c:?}").to_lowercase() == wanted
            })
            .ok_or_else(|| RashodyError::Parse(format!("unknown category \"{}\"", s.trim())))
    }
}

/// One recorded spending event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Expense {
    pub id: Uuid,
    pub description: String,
    pub category: ExpenseCategory,
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl Display for Expense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {} ({:.2})",
            self.date.format(DATE_FORMAT),
            self.category,
            self.description,
            self.amount
        )
    }
}

impl Expense {
    /// Checks the record against the same rules `add` applies to new input.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.description, Some(self.date), Some(self.amount))
    }

    /// Trims the description and rounds the amount.
    pub fn normalized(mut self) -> Self {
        self.description = self.description.trim().to_string();
        self.amount = round_amount(self.amount);
        self
    }

    pub fn to_draft(&self) -> ExpenseDraft {
        ExpenseDraft {
            description: self.description.clone(),
            category: self.category,
            date: self.date.format(DATE_FORMAT).to_string(),
            amount: self.amount.normalize().to_string(),
        }
    }
}

/// The rule set shared by creation and editing.
///
/// `date` is `None` when the input held no usable date and `amount` is
/// `None` when the input could not be parsed as a number.
pub fn validate_fields(
    description: &str,
    date: Option<NaiveDate>,
    amount: Option<Decimal>,
) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    if date.is_none() {
        return Err(ValidationError::MissingDate);
    }
    match amount {
        None => Err(ValidationError::UnparseableAmount),
        Some(amount) if amount <= Decimal::ZERO => Err(ValidationError::NonPositiveAmount),
        Some(amount) if amount >= MAX_AMOUNT => Err(ValidationError::AmountTooLarge),
        Some(_) => Ok(()),
    }
}

/// Raw user input for an expense, as typed into a form or the row editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub description: String,
    pub category: ExpenseCategory,
    pub date: String,
    pub amount: String,
}

impl Default for ExpenseDraft {
    fn default() -> Self {
        Self {
            description: String::new(),
            category: ExpenseCategory::default(),
            date: Local::now().date_naive().format(DATE_FORMAT).to_string(),
            amount: String::new(),
        }
    }
}

impl ExpenseDraft {
    pub fn new(description: &str, category: ExpenseCategory, date: &str, amount: &str) -> Self {
        Self {
            description: description.to_string(),
            category,
            date: date.to_string(),
            amount: amount.to_string(),
        }
    }

    /// Validates the input and builds the record it describes under `id`.
    pub fn to_expense(&self, id: Uuid) -> Result<Expense, ValidationError> {
        let description = self.description.trim();
        let date = match self.date.trim() {
            "" => None,
            date => Some(
                NaiveDate::parse_from_str(date, DATE_FORMAT)
                    .map_err(|_| ValidationError::InvalidDate)?,
            ),
        };
        let amount = parse_amount(&self.amount).ok();
        validate_fields(description, date, amount)?;

        match (date, amount) {
            (Some(date), Some(amount)) => Ok(Expense {
                id,
                description: description.to_string(),
                category: self.category,
                date,
                amount,
            }),
            (None, _) => Err(ValidationError::MissingDate),
            (_, None) => Err(ValidationError::UnparseableAmount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn draft_builds_rounded_expense() {
        let draft = ExpenseDraft::new("  Кофе ", ExpenseCategory::Food, "2024-01-05", "199,555");
        let expense = draft.to_expense(Uuid::new_v4()).unwrap();
        assert_eq!(expense.description, "Кофе");
        assert_eq!(expense.amount, dec("199.56"));
        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn draft_rejections() {
        let cases = [
            ("", "2024-01-05", "10", ValidationError::EmptyDescription),
            ("   ", "2024-01-05", "10", ValidationError::EmptyDescription),
            ("Такси", "", "10", ValidationError::MissingDate),
            ("Такси", "05.01.2024", "10", ValidationError::InvalidDate),
            ("Такси", "2024-01-05", "abc", ValidationError::UnparseableAmount),
            ("Такси", "2024-01-05", "0", ValidationError::NonPositiveAmount),
            ("Такси", "2024-01-05", "-5", ValidationError::NonPositiveAmount),
            ("Такси", "2024-01-05", "0.001", ValidationError::NonPositiveAmount),
            ("Такси", "2024-01-05", "10000000000000", ValidationError::AmountTooLarge),
        ];
        for (description, date, amount, expected) in cases {
            let draft = ExpenseDraft::new(description, ExpenseCategory::Transport, date, amount);
            assert_eq!(draft.to_expense(Uuid::new_v4()), Err(expected), "{draft:?}");
        }
    }

    #[test]
    fn amount_bound_is_ten_trillion() {
        assert_eq!(MAX_AMOUNT, dec("10000000000000"));
        let date = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert_eq!(
            validate_fields("Аренда", date, Some(dec("9999999999999.99"))),
            Ok(())
        );
        assert_eq!(
            validate_fields("Аренда", date, Some(Decimal::MAX)),
            Err(ValidationError::AmountTooLarge)
        );
    }

    #[test]
    fn category_labels_round_trip() {
        for category in ExpenseCategory::ALL {
            assert_eq!(category.label().parse::<ExpenseCategory>().unwrap(), category);
        }
        assert_eq!(
            "education".parse::<ExpenseCategory>().unwrap(),
            ExpenseCategory::Education
        );
        assert!("Путешествия".parse::<ExpenseCategory>().is_err());
    }

    #[test]
    fn category_cycles() {
        assert_eq!(ExpenseCategory::Other.next(), ExpenseCategory::Food);
        assert_eq!(ExpenseCategory::Food.prev(), ExpenseCategory::Other);
    }

    #[test]
    fn draft_from_expense_keeps_fields() {
        let expense = ExpenseDraft::new("Книга", ExpenseCategory::Education, "2024-02-29", "450.50")
            .to_expense(Uuid::new_v4())
            .unwrap();
        let draft = expense.to_draft();
        assert_eq!(draft.amount, "450.5");
        assert_eq!(draft.to_expense(expense.id).unwrap(), expense);
    }
}
