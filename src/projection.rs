use std::cmp::Ordering;
use std::fmt::Display;

use icu_collator::{Collator, CollatorOptions};
use icu_locid::locale;

use crate::errors::RashodyError;
use crate::expenses::{Expense, ExpenseCategory};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Category(ExpenseCategory),
}

impl Filter {
    pub fn matches(&self, expense: &Expense) -> bool {
        match self {
            Filter::All => true,
            Filter::Category(category) => expense.category == *category,
        }
    }

    /// "All" followed by every category, in menu order.
    pub fn options() -> Vec<Filter> {
        std::iter::once(Filter::All)
            .chain(ExpenseCategory::ALL.into_iter().map(Filter::Category))
            .collect()
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::All => write!(f, "Все"),
            Filter::Category(category) => write!(f, "{category}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Date,
    Amount,
    Description,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn options() -> Vec<Sort> {
        [SortKey::Date, SortKey::Amount, SortKey::Description]
            .into_iter()
            .flat_map(|key| {
                [SortDirection::Descending, SortDirection::Ascending]
                    .into_iter()
                    .map(move |direction| Sort::new(key, direction))
            })
            .collect()
    }
}

impl Display for Sort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = match self.key {
            SortKey::Date => "Дата",
            SortKey::Amount => "Сумма",
            SortKey::Description => "Описание",
        };
        let arrow = match self.direction {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        };
        write!(f, "{key} {arrow}")
    }
}

/// Derives the displayed sequence from the collection.
///
/// Holds only the collator; every call recomputes from scratch.
pub struct Projector {
    collator: Collator,
}

impl std::fmt::Debug for Projector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Projector").finish_non_exhaustive()
    }
}

impl Projector {
    /// Uses Russian collation rules for descriptions.
    pub fn new() -> Result<Self, RashodyError> {
        let collator = Collator::try_new(&locale!("ru").into(), CollatorOptions::new())?;
        Ok(Self { collator })
    }

    pub fn compare(&self, key: SortKey, a: &Expense, b: &Expense) -> Ordering {
        match key {
            // NaiveDate orders exactly like its zero-padded yyyy-mm-dd text
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::Amount => a.amount.cmp(&b.amount),
            SortKey::Description => self.collator.compare(&a.description, &b.description),
        }
    }

    /// Filters `expenses` and sorts the result stably.
    ///
    /// Records that compare equal keep their relative order from `expenses`.
    pub fn project<'a>(&self, expenses: &'a [Expense], filter: Filter, sort: Sort) -> Vec<&'a Expense> {
        let mut projected: Vec<&Expense> = expenses.iter().filter(|e| filter.matches(e)).collect();
        projected.sort_by(|a, b| {
            let ordering = self.compare(sort.key, a, b);
            match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        projected
    }
}
