//! Line commands for the terminal front end.

use crate::error::{ClientError, ClientResult};
use crate::models::Language;

pub const HELP: &str = "\
Type a movie title to get suggestions, then:
  /recommend, /r      recommend movies like the current title
  /lang <code>        switch language (en hi mr ta te kn ml)
  /open <n>           open result n and add it to recently viewed
  /trend <n>          open trending movie n
  /hist <n>           open recently viewed movie n
  /results            show recommendations
  /suggestions        show suggestions
  /trending           show trending movies
  /history            show recently viewed movies
  /languages          list languages
  /help               show this help
  /quit               exit
";

/// Which list an index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Results,
    Trending,
    History,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Anything that is not a slash command replaces the query text
    Input(String),
    Recommend,
    Language(Language),
    Open(Section, usize),
    Show(Section),
    Suggestions,
    Languages,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> ClientResult<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Command::Input(line.to_string()));
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        let command = match (name, arg) {
            ("recommend" | "r", None) => Command::Recommend,
            ("lang", Some(code)) => Command::Language(code.parse()?),
            ("open", Some(n)) => Command::Open(Section::Results, parse_index(n)?),
            ("trend", Some(n)) => Command::Open(Section::Trending, parse_index(n)?),
            ("hist", Some(n)) => Command::Open(Section::History, parse_index(n)?),
            ("results", None) => Command::Show(Section::Results),
            ("trending", None) => Command::Show(Section::Trending),
            ("history", None) => Command::Show(Section::History),
            ("suggestions", None) => Command::Suggestions,
            ("languages", None) => Command::Languages,
            ("help", None) => Command::Help,
            ("quit" | "q" | "exit", None) => Command::Quit,
            _ => {
                return Err(ClientError::InvalidInput(format!(
                    "Unknown command: /{}",
                    rest.trim()
                )))
            }
        };

        if parts.next().is_some() {
            return Err(ClientError::InvalidInput(format!(
                "Too many arguments: /{}",
                rest.trim()
            )));
        }

        Ok(command)
    }
}

/// 1-based index as typed by the user
fn parse_index(raw: &str) -> ClientResult<usize> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ClientError::InvalidInput(format!(
            "Expected a number from 1, got {}",
            raw
        ))),
    }
}
