//! Query parsing into one of the four commands.

use super::errors::DispatchError;

/// Human-readable forms of the recognised commands.
pub const VALID_COMMANDS: [&str; 4] = [
    "get info <pokemon>",
    "compare <pokemon1> <pokemon2>",
    "strategy <pokemon>",
    "team <description>",
];

/// A parsed query.
///
/// All arguments are lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `get info <name...>`
    Lookup {
        /// Creature name, possibly several words.
        name: String,
    },
    /// `compare <a> <b...>`; every argument token is kept.
    Compare {
        /// Argument tokens in query order.
        names: Vec<String>,
    },
    /// `strategy <name...>`
    Strategy {
        /// Creature name, possibly several words.
        name: String,
    },
    /// `team <description...>`
    Team {
        /// Free-text description of the wanted team.
        description: String,
    },
}

impl Command {
    /// Parses a trimmed, non-empty query.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidCommand`] when the keyword is unknown
    /// or lacks the arguments its form requires.
    pub fn parse(query: &str) -> Result<Self, DispatchError> {
        let lowered = query.to_lowercase();
        let tokens: Vec<&str> = lowered.split_whitespace().collect();
        let Some((&keyword, args)) = tokens.split_first() else {
            return Err(DispatchError::invalid_command(""));
        };

        match (keyword, args) {
            ("get", ["info", name @ ..]) if !name.is_empty() => Ok(Self::Lookup {
                name: name.join(" "),
            }),
            ("compare", names) if names.len() >= 2 => Ok(Self::Compare {
                names: names.iter().map(|name| (*name).to_owned()).collect(),
            }),
            ("strategy", name) if !name.is_empty() => Ok(Self::Strategy {
                name: name.join(" "),
            }),
            ("team", description) if !description.is_empty() => Ok(Self::Team {
                description: description.join(" "),
            }),
            _ => Err(DispatchError::invalid_command(keyword)),
        }
    }

    /// Keyword the command was parsed from.
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Lookup { .. } => "get",
            Self::Compare { .. } => "compare",
            Self::Strategy { .. } => "strategy",
            Self::Team { .. } => "team",
        }
    }
}
