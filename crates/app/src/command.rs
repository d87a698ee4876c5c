//! One-line command syntax.
//!
//! ```text
//! add <key>|<title>|<creator>|<category>|<year>
//! remove <key>
//! find key|title|creator|category <value>
//! borrow <title>|<borrower>
//! return <title>|<borrower>
//! items | available | borrowed | report | counts
//! import <path>
//! export all|available <path>
//! save | help | quit
//! ```
//!
//! Arguments are separated by `|` so titles and names may contain spaces.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use lendstore_catalog::Item;
use lendstore_core::{BorrowerName, CatalogKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Key,
    Title,
    Creator,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    All,
    Available,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Item),
    Remove(CatalogKey),
    Find(SearchField, String),
    Borrow { title: String, borrower: BorrowerName },
    Return { title: String, borrower: BorrowerName },
    ListItems,
    ListAvailable,
    ListBorrowed,
    Report,
    Counts,
    Import(PathBuf),
    Export(ExportScope, PathBuf),
    Save,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub const HELP: &str = "\
add <key>|<title>|<creator>|<category>|<year>
remove <key>
find key|title|creator|category <value>
borrow <title>|<borrower>
return <title>|<borrower>
items | available | borrowed | report | counts
import <path>
export all|available <path>
save | help | quit";

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandParseError::Empty);
        }
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match verb.to_ascii_lowercase().as_str() {
            "add" => parse_add(rest),
            "remove" => Ok(Command::Remove(parse_value(rest, "remove <key>")?)),
            "find" => parse_find(rest),
            "borrow" => {
                let (title, borrower) = parse_title_borrower(rest, "borrow <title>|<borrower>")?;
                Ok(Command::Borrow { title, borrower })
            }
            "return" => {
                let (title, borrower) = parse_title_borrower(rest, "return <title>|<borrower>")?;
                Ok(Command::Return { title, borrower })
            }
            "items" => Ok(Command::ListItems),
            "available" => Ok(Command::ListAvailable),
            "borrowed" => Ok(Command::ListBorrowed),
            "report" => Ok(Command::Report),
            "counts" => Ok(Command::Counts),
            "import" => Ok(Command::Import(parse_path(rest, "import <path>")?)),
            "export" => parse_export(rest),
            "save" => Ok(Command::Save),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandParseError::Unknown(other.to_string())),
        }
    }
}

fn split_args(rest: &str) -> Vec<&str> {
    rest.split('|').map(str::trim).collect()
}

fn parse_value<T>(rest: &str, usage: &'static str) -> Result<T, CommandParseError>
where
    T: FromStr,
{
    rest.parse().map_err(|_| CommandParseError::Usage(usage))
}

fn parse_path(rest: &str, usage: &'static str) -> Result<PathBuf, CommandParseError> {
    if rest.is_empty() {
        return Err(CommandParseError::Usage(usage));
    }
    Ok(PathBuf::from(rest))
}

fn parse_add(rest: &str) -> Result<Command, CommandParseError> {
    const USAGE: &str = "add <key>|<title>|<creator>|<category>|<year>";

    let args = split_args(rest);
    let [key, title, creator, category, year] = args.as_slice() else {
        return Err(CommandParseError::Usage(USAGE));
    };
    if [title, creator, category].iter().any(|v| v.is_empty()) {
        return Err(CommandParseError::Usage(USAGE));
    }

    let key: CatalogKey = parse_value(key, USAGE)?;
    let year: i32 = year
        .parse()
        .map_err(|_| CommandParseError::InvalidArgument(format!("year '{year}' is not an integer")))?;

    Ok(Command::Add(Item::new(key, *title, *creator, *category, year)))
}

fn parse_find(rest: &str) -> Result<Command, CommandParseError> {
    const USAGE: &str = "find key|title|creator|category <value>";

    let (field, value) = rest
        .split_once(char::is_whitespace)
        .ok_or(CommandParseError::Usage(USAGE))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(CommandParseError::Usage(USAGE));
    }

    let field = match field.to_ascii_lowercase().as_str() {
        "key" | "isbn" => SearchField::Key,
        "title" => SearchField::Title,
        "creator" | "author" => SearchField::Creator,
        "category" | "genre" => SearchField::Category,
        other => {
            return Err(CommandParseError::InvalidArgument(format!(
                "unknown search field '{other}'"
            )));
        }
    };
    Ok(Command::Find(field, value.to_string()))
}

fn parse_title_borrower(
    rest: &str,
    usage: &'static str,
) -> Result<(String, BorrowerName), CommandParseError> {
    let args = split_args(rest);
    let [title, borrower] = args.as_slice() else {
        return Err(CommandParseError::Usage(usage));
    };
    if title.is_empty() {
        return Err(CommandParseError::Usage(usage));
    }
    Ok((title.to_string(), parse_value(borrower, usage)?))
}

fn parse_export(rest: &str) -> Result<Command, CommandParseError> {
    const USAGE: &str = "export all|available <path>";

    let (scope, path) = rest
        .split_once(char::is_whitespace)
        .ok_or(CommandParseError::Usage(USAGE))?;
    let scope = match scope.to_ascii_lowercase().as_str() {
        "all" => ExportScope::All,
        "available" => ExportScope::Available,
        _ => return Err(CommandParseError::Usage(USAGE)),
    };
    Ok(Command::Export(scope, parse_path(path.trim(), USAGE)?))
}
