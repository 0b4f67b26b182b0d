//! Team suggestion report.

use crate::team::Role;

use super::title_case;

/// One line of a suggested team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamMember {
    /// Member resolved against PokeAPI.
    Resolved {
        /// Creature name.
        name: String,
        /// Type names in slot order.
        types: Vec<String>,
        /// Role derived from base stats.
        role: Role,
    },
    /// Member whose data could not be fetched.
    Unavailable {
        /// Candidate name as listed in the roster.
        name: String,
    },
}

impl TeamMember {
    fn describe(&self) -> String {
        match self {
            Self::Resolved { name, types, role } => {
                let types = types
                    .iter()
                    .map(|t| title_case(t))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "{} ({types}) - {}",
                    title_case(name),
                    title_case((*role).into())
                )
            }
            Self::Unavailable { name } => format!("{name} - Data unavailable"),
        }
    }
}

/// Team suggestion report.
#[must_use]
pub fn team_report(description: &str, members: &[TeamMember]) -> String {
    let roster = members
        .iter()
        .enumerate()
        .map(|(index, member)| format!("{}. {}", index + 1, member.describe()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "
Team Suggestion Based On: \"{description}\"

Recommended Team:
{roster}

Team Strategy:
- Balanced type coverage
- Mix of offensive and defensive roles
- Synergistic team composition
- Adaptable to various battle scenarios

Note: This is a basic suggestion. Consider individual Pokemon movesets, abilities, and your specific battle format for optimal team building.
"
    )
}
