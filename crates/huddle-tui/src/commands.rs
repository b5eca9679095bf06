//! Slash-command parsing for the input line.

/// What a submitted input line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// `/join <name>`
    Join {
        /// Requested username, as typed after the command.
        username: String,
    },
    /// `/leave`
    Leave,
    /// `/quit`
    Quit,
    /// Anything that is not a command.
    Message {
        /// Text exactly as typed.
        text: String,
    },
    /// A slash command that is not recognised.
    Unknown {
        /// The command word, including the slash.
        command: String,
    },
}

/// Parse one submitted line.
pub fn parse(line: &str) -> Input {
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Input::Message { text: line.to_owned() };
    };

    let (command, argument) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    match command {
        "join" | "j" => Input::Join { username: argument.to_owned() },
        "leave" => Input::Leave,
        "quit" | "q" => Input::Quit,
        _ => Input::Unknown { command: format!("/{command}") },
    }
}
