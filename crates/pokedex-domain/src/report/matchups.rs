//! Type matchup report.

use crate::model::Pokemon;

use super::title_case;

/// Attacking type that hits a creature super effectively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Weakness {
    /// Attacking type name.
    pub attacking_type: String,
    /// How many of the creature's own types it is super effective against.
    pub count: u32,
}

/// Tallies super-effective attacking types across a creature's types.
///
/// `per_type` holds, for each of the creature's types, the attacking types
/// dealing double damage. The result is ordered by descending count; ties
/// keep first-seen order.
#[must_use]
pub fn rank_weaknesses<I, S>(per_type: I) -> Vec<Weakness>
where
    I: IntoIterator<Item = Vec<S>>,
    S: Into<String>,
{
    let mut tally: Vec<Weakness> = Vec::new();
    for attackers in per_type {
        for attacker in attackers {
            let attacker = attacker.into();
            match tally.iter_mut().find(|w| w.attacking_type == attacker) {
                Some(weakness) => weakness.count += 1,
                None => tally.push(Weakness {
                    attacking_type: attacker,
                    count: 1,
                }),
            }
        }
    }
    tally.sort_by(|left, right| right.count.cmp(&left.count));
    tally
}

/// Counter-strategy report for a creature.
#[must_use]
pub fn matchup_report(pokemon: &Pokemon, weaknesses: &[Weakness]) -> String {
    let name = title_case(&pokemon.name);
    let types = pokemon
        .type_names()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(", ");
    let counters = if weaknesses.is_empty() {
        "Any type".to_owned()
    } else {
        weaknesses
            .iter()
            .take(3)
            .map(|w| title_case(&w.attacking_type))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let super_effective = if weaknesses.is_empty() {
        "None identified".to_owned()
    } else {
        weaknesses
            .iter()
            .map(|w| format!("{} (x{})", title_case(&w.attacking_type), w.count))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "
Type Matchup Analysis for {name}

Pokemon Types: {types}

Counter-Strategy Recommendations:
- Use Pokemon with these types: {counters}
- These types are super effective: {super_effective}
"
    )
}
