use thiserror::Error;

pub const HELP: &str = "Available commands:
  connect          - Connects to the game server
  join             - Asks to join the game
  start            - Asks the server to start the game
  play <row> <col> - Places your token, rows and columns count from 0
  update           - Prints the current board
  gameover         - Reports the current board as finished
  error            - Sends a test error message
  time             - Shows the current time
  exit             - Exits the program
  help             - Displays this help message";

pub const UNKNOWN: &str = "Unknown command. Type 'help' for a list of commands.";

#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("Missing {0}. Usage: play <row> <col>")]
    MissingArgument(&'static str),
    #[error("Invalid {name} {value:?}, expected a whole number")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Connect,
    Join,
    Start,
    Play { row: i64, col: i64 },
    Update,
    GameOver,
    Error,
    Time,
    Help,
    Exit,
    Empty,
    Unknown(String),
}

pub fn parse(line: &str) -> Result<Command, InputError> {
    let mut words = line.split_whitespace();
    let command = match words.next() {
        Some(word) => word,
        None => return Ok(Command::Empty),
    };
    let command = match command {
        "connect" => Command::Connect,
        "join" => Command::Join,
        "start" => Command::Start,
        "play" => {
            let row = parse_number("row", words.next())?;
            let col = parse_number("col", words.next())?;
            Command::Play { row, col }
        }
        "update" => Command::Update,
        "gameover" => Command::GameOver,
        "error" => Command::Error,
        "time" => Command::Time,
        "help" => Command::Help,
        "exit" => Command::Exit,
        other => Command::Unknown(other.to_string()),
    };
    Ok(command)
}

fn parse_number(name: &'static str, word: Option<&str>) -> Result<i64, InputError> {
    let word = word.ok_or(InputError::MissingArgument(name))?;
    word.parse().map_err(|_| InputError::InvalidNumber {
        name,
        value: word.to_string(),
    })
}
