//! Team-building heuristics: role rosters, team focus and stat-based roles.

use std::collections::HashMap;

use strum::{Display, IntoStaticStr};

use crate::model::Pokemon;

/// Battle role a team member fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// High offensive stats.
    Attacker,
    /// High defensive stats.
    Defender,
    /// Utility and healing.
    Support,
    /// Fast and hard-hitting.
    Speed,
    /// Large HP pool.
    Tank,
}

impl Role {
    /// Canonical candidates for the role, in preference order.
    #[must_use]
    pub fn roster(self) -> &'static [&'static str] {
        match self {
            Self::Attacker => &["Charizard", "Dragonite", "Tyranitar", "Gengar", "Alakazam"],
            Self::Defender => &["Blastoise", "Steelix", "Skarmory", "Umbreon", "Chansey"],
            Self::Support => &["Clefable", "Blissey", "Togekiss", "Whimsicott", "Amoonguss"],
            Self::Speed => &["Jolteon", "Crobat", "Aerodactyl", "Weavile", "Noivern"],
            Self::Tank => &["Snorlax", "Aggron", "Metagross", "Goodra", "Toxapex"],
        }
    }

    /// Classifies a creature by its base stats.
    #[must_use]
    pub fn classify(pokemon: &Pokemon) -> Self {
        let hp = pokemon.stat("hp");
        let total_attack = pokemon.stat("attack") + pokemon.stat("special-attack");
        let total_defense = pokemon.stat("defense") + pokemon.stat("special-defense") + hp;
        let speed = pokemon.stat("speed");

        if speed > 100 && total_attack > 150 {
            Self::Speed
        } else if total_attack > 150 {
            Self::Attacker
        } else if total_defense > 200 {
            Self::Defender
        } else if hp > 100 && total_defense > 150 {
            Self::Tank
        } else {
            Self::Support
        }
    }
}

/// Role slots to fill for a free-text description.
#[must_use]
pub fn team_focus(description: &str) -> &'static [Role] {
    use Role::{Attacker, Defender, Speed, Support, Tank};

    let lowered = description.to_lowercase();
    if lowered.contains("balanced") {
        &[Attacker, Defender, Support, Speed, Tank]
    } else if lowered.contains("offensive") || lowered.contains("attack") {
        &[Attacker, Attacker, Speed, Attacker, Support, Tank]
    } else if lowered.contains("defensive") || lowered.contains("defense") {
        &[Defender, Tank, Support, Defender, Tank, Support]
    } else {
        &[Attacker, Defender, Support, Speed, Tank, Attacker]
    }
}

/// Position of every role in its roster.
///
/// Each pick hands out the creature under the role's cursor and advances
/// it, so consecutive teams cycle through the rosters.
#[derive(Debug, Default)]
pub struct RosterRotation {
    cursors: HashMap<Role, usize>,
}

impl RosterRotation {
    /// Picks one candidate per slot and advances the rosters.
    pub fn pick(&mut self, focus: &[Role]) -> Vec<&'static str> {
        focus
            .iter()
            .filter_map(|&role| {
                let roster = role.roster();
                let cursor = self.cursors.entry(role).or_default();
                let candidate = roster.get(*cursor).copied();
                *cursor += 1;
                if *cursor >= roster.len() {
                    *cursor = 0;
                }
                candidate
            })
            .collect()
    }
}
