use std::path::PathBuf;

use chrono::{Local, Weekday};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::validator::Validation;
use inquire::{DateSelect, Select, Text};
use log::info;

use self::config::{default_config_path, load_config, RashodyConfig};
use self::errors::RashodyError;
use self::expenses::storage::JsonFileStorage;
use self::expenses::store::ExpenseStore;
use self::expenses::{ExpenseCategory, ExpenseDraft, DATE_FORMAT, MAX_AMOUNT};
use self::format::{format_amount, format_date};
use self::parse::parse_amount;
use self::projection::{Filter, Projector, Sort, SortDirection, SortKey};
use self::tui::open_widget;
use self::tui::table::ExpenseTable;

mod config;
pub mod errors;
mod expenses;
mod format;
mod logging;
mod parse;
mod projection;
mod tui;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
    /// Expense file to use instead of the configured one
    #[arg(long)]
    data_file: Option<PathBuf>,
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive expense table (default)
    Tui,
    /// Record an expense through prompts
    Add,
    /// Print expenses, optionally filtered and sorted
    List {
        #[arg(short, long, value_parser = parse_category)]
        category: Option<ExpenseCategory>,
        #[arg(short, long, value_enum, default_value_t = SortArg::Date)]
        sort: SortArg,
        /// Sort descending
        #[arg(long)]
        desc: bool,
    },
    /// Remove an expense by id or unique id prefix
    Delete { id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Date,
    Amount,
    Description,
}

impl From<SortArg> for SortKey {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Date => SortKey::Date,
            SortArg::Amount => SortKey::Amount,
            SortArg::Description => SortKey::Description,
        }
    }
}

fn parse_category(s: &str) -> Result<ExpenseCategory, String> {
    s.parse().map_err(|e: RashodyError| e.to_string())
}

fn open_store(config: &RashodyConfig) -> ExpenseStore {
    ExpenseStore::open(Box::new(JsonFileStorage::new(&config.data_file)))
}

fn prompt_draft() -> Result<ExpenseDraft, RashodyError> {
    let description = Text::new("Описание:")
        .with_validator(|input: &str| {
            if input.trim().is_empty() {
                Ok(Validation::Invalid("Описание не может быть пустым".into()))
            } else {
                Ok(Validation::Valid)
            }
        })
        .prompt()?;
    let category = Select::new("Категория:", ExpenseCategory::ALL.to_vec()).prompt()?;
    let date = DateSelect::new("Дата:")
        .with_default(Local::now().date_naive())
        .with_week_start(Weekday::Mon)
        .prompt()?;
    let amount = Text::new("Сумма:")
        .with_help_message("Можно использовать точку или запятую")
        .with_validator(|input: &str| match parse_amount(input) {
            Ok(amount) if amount.is_sign_positive() && !amount.is_zero() && amount < MAX_AMOUNT => {
                Ok(Validation::Valid)
            }
            _ => Ok(Validation::Invalid(
                "Введите положительное число меньше 10 000 000 000 000".into(),
            )),
        })
        .prompt()?;
    Ok(ExpenseDraft::new(
        &description,
        category,
        &date.format(DATE_FORMAT).to_string(),
        &amount,
    ))
}

fn run_command(command: Command, config: &RashodyConfig) -> Result<(), RashodyError> {
    match command {
        Command::Tui => {
            let table = ExpenseTable::new(open_store(config), Projector::new()?, config);
            open_widget(table)?;
        }
        Command::Add => {
            let mut store = open_store(config);
            let draft = prompt_draft()?;
            let expense = store.add(&draft)?;
            println!("Добавлено: {} ({})", expense, expense.id);
        }
        Command::List {
            category,
            sort,
            desc,
        } => {
            let store = open_store(config);
            let projector = Projector::new()?;
            let filter = category.map_or(Filter::All, Filter::Category);
            let direction = if desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            let projected = projector.project(
                store.expenses(),
                filter,
                Sort::new(sort.into(), direction),
            );
            for expense in projected {
                println!(
                    "{}  {}  {:<12} {:>12}  {}",
                    &expense.id.to_string()[..8],
                    format_date(expense.date),
                    expense.category.label(),
                    format_amount(expense.amount, &config.currency),
                    expense.description
                );
            }
        }
        Command::Delete { id } => {
            let mut store = open_store(config);
            let id = store.resolve_id(&id)?;
            store.delete(id)?;
            println!("Удалено: {id}");
        }
    }
    Ok(())
}

fn main() -> Result<(), RashodyError> {
    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(default_config_path);
    let mut config = load_config(&config_path)?;
    if let Some(data_file) = args.data_file {
        config.data_file = data_file;
    }
    if args.debug {
        config.log_level = "debug".to_string();
    }

    let _logger = logging::init_logging(&config.log_level, &config.log_dir)?;
    info!(
        "event=config_ready module=main data_file={}",
        config.data_file.display()
    );

    run_command(args.command.unwrap_or(Command::Tui), &config)
}
