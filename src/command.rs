use std::fmt;

use geocoin_grid::Cell;

use crate::player::Direction;

/// One line of player input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Move(Direction),
    Goto { lat: f64, lng: f64 },
    NoGps,
    Collect { cell: Cell, index: usize },
    Deposit { cell: Cell, coin: Option<String> },
    Reset,
    Look,
    Inventory,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    Usage(&'static str),
    BadNumber { arg: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(word) => write!(f, "unknown command {:?} (try `help`)", word),
            CommandError::Usage(usage) => write!(f, "usage: {}", usage),
            CommandError::BadNumber { arg } => write!(f, "not a number: {:?}", arg),
        }
    }
}

impl std::error::Error for CommandError {}

pub const HELP: &str = "\
commands:
  n | s | e | w              step one cell
  goto <lat> <lng>           report a geolocation fix
  nogps                      report a geolocation failure
  collect <i> <j> <index>    take a coin from the cache at i:j
  deposit <i> <j> [coin-id]  put a coin (default: last collected) into i:j
  reset                      restore every cache and empty the inventory
  look                       redraw the map and show a status line
  inv                        list carried coins
  quit";

fn num<T: std::str::FromStr>(arg: &str) -> Result<T, CommandError> {
    arg.parse().map_err(|_| CommandError::BadNumber { arg: arg.to_string() })
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = words.split_first() else {
        return Ok(None);
    };
    let cmd = match (head.to_ascii_lowercase().as_str(), args) {
        ("n" | "s" | "e" | "w" | "north" | "south" | "east" | "west", []) => {
            Command::Move(head.parse().map_err(|_| CommandError::Unknown(head.to_string()))?)
        }
        ("goto", [lat, lng]) => Command::Goto {
            lat: num(lat)?,
            lng: num(lng)?,
        },
        ("goto", _) => return Err(CommandError::Usage("goto <lat> <lng>")),
        ("nogps", []) => Command::NoGps,
        ("collect" | "c", [i, j, index]) => Command::Collect {
            cell: Cell::new(num(i)?, num(j)?),
            index: num(index)?,
        },
        ("collect" | "c", _) => return Err(CommandError::Usage("collect <i> <j> <index>")),
        ("deposit" | "d", [i, j]) => Command::Deposit {
            cell: Cell::new(num(i)?, num(j)?),
            coin: None,
        },
        ("deposit" | "d", [i, j, id]) => Command::Deposit {
            cell: Cell::new(num(i)?, num(j)?),
            coin: Some(id.to_string()),
        },
        ("deposit" | "d", _) => return Err(CommandError::Usage("deposit <i> <j> [coin-id]")),
        ("reset", []) => Command::Reset,
        ("look" | "l", []) => Command::Look,
        ("inv" | "i", []) => Command::Inventory,
        ("help" | "?", _) => Command::Help,
        ("quit" | "q" | "exit", _) => Command::Quit,
        _ => return Err(CommandError::Unknown(line.trim().to_string())),
    };
    Ok(Some(cmd))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_and_blanks() {
        assert_eq!(parse("n"), Ok(Some(Command::Move(Direction::North))));
        assert_eq!(parse("  West "), Ok(Some(Command::Move(Direction::West))));
        assert_eq!(parse("   "), Ok(None));
    }

    #[test]
    fn collect_and_deposit() {
        assert_eq!(
            parse("collect 2 -3 1"),
            Ok(Some(Command::Collect {
                cell: Cell::new(2, -3),
                index: 1
            }))
        );
        assert_eq!(
            parse("deposit 2 2"),
            Ok(Some(Command::Deposit {
                cell: Cell::new(2, 2),
                coin: None
            }))
        );
        assert_eq!(
            parse("d 2 2 1:1#0"),
            Ok(Some(Command::Deposit {
                cell: Cell::new(2, 2),
                coin: Some("1:1#0".into())
            }))
        );
    }

    #[test]
    fn bad_input_is_reported() {
        assert_eq!(parse("collect 1 2"), Err(CommandError::Usage("collect <i> <j> <index>")));
        assert_eq!(
            parse("goto north 3"),
            Err(CommandError::BadNumber { arg: "north".into() })
        );
        assert!(matches!(parse("dance"), Err(CommandError::Unknown(_))));
        assert!(matches!(parse("n 3"), Err(CommandError::Unknown(_))));
    }

    #[test]
    fn goto_parses_floats() {
        assert_eq!(
            parse("goto 36.9895 -122.0628"),
            Ok(Some(Command::Goto {
                lat: 36.9895,
                lng: -122.0628
            }))
        );
    }
}
