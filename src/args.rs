//! These structs provide the CLI interface for the iexpense CLI.

use crate::model::Category;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// iexpense: keep track of what you spend.
///
/// Expenses have a name, an amount and a category, either Personal or Business. They are listed in
/// one section per category and saved locally after every change.
///
/// Run `iexpense init` once, then use `iexpense ui` for the interactive screen or the `list`, `add`
/// and `delete` commands from scripts.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the configuration file.
    ///
    /// By default the data directory is $HOME/iexpense. Pass --iexpense-home or set IEXPENSE_HOME
    /// to keep it somewhere else.
    Init(InitArgs),
    /// Show all expenses, one section per category.
    List,
    /// Add an expense.
    Add(AddArgs),
    /// Delete expenses by their position within a section, as shown by `list`.
    Delete(DeleteArgs),
    /// Open the interactive screen.
    Ui,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where expenses and configuration are kept. Defaults to ~/iexpense
    #[arg(long, env = "IEXPENSE_HOME", default_value_t = default_iexpense_home())]
    iexpense_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, iexpense_home: PathBuf) -> Self {
        Self {
            log_level,
            iexpense_home: iexpense_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn iexpense_home(&self) -> &DisplayPath {
        &self.iexpense_home
    }
}

/// Args for the `iexpense init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The ISO 4217 code to display amounts in, e.g. EUR. When omitted, the currency of your
    /// locale is used.
    #[arg(long)]
    currency: Option<String>,

    /// The key the expense list is stored under.
    #[arg(long)]
    storage_key: Option<String>,
}

impl InitArgs {
    pub fn new(currency: Option<String>, storage_key: Option<String>) -> Self {
        Self {
            currency,
            storage_key,
        }
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn storage_key(&self) -> Option<&str> {
        self.storage_key.as_deref()
    }
}

/// Args for the `iexpense add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// What the money was spent on.
    #[arg(long)]
    name: String,

    /// Personal or Business.
    #[arg(long, default_value_t = Category::Personal)]
    category: Category,

    /// How much was spent, e.g. 3.50 or $1,200.
    #[arg(long)]
    amount: String,
}

impl AddArgs {
    pub fn new(name: impl Into<String>, category: Category, amount: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category,
            amount: amount.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }
}

/// Args for the `iexpense delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The section to delete from: Personal or Business.
    #[arg(long)]
    section: Category,

    /// Zero-based positions within the section.
    #[arg(required = true, num_args = 1..)]
    offsets: Vec<usize>,
}

impl DeleteArgs {
    pub fn new(section: Category, offsets: impl IntoIterator<Item = usize>) -> Self {
        Self {
            section,
            offsets: offsets.into_iter().collect(),
        }
    }

    pub fn section(&self) -> Category {
        self.section
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }
}

fn default_iexpense_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("iexpense"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --iexpense-home or IEXPENSE_HOME instead of relying on the \
                default home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("iexpense")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
