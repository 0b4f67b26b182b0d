//! Side-by-side comparison of two creatures.

use crate::model::Pokemon;

use super::{bullet_list, joined_titles, or_unknown, tenths, title_case};

const SAMPLE_MOVES: usize = 5;

/// Explanation returned when fewer than two names were supplied.
#[must_use]
pub fn not_enough_names_report(names: &[String]) -> String {
    format!(
        "Please name two Pokémon to compare (got: '{}'). Example: compare pikachu raichu",
        names.join(" ")
    )
}

/// Side-by-side comparison of two creatures.
#[must_use]
pub fn comparison_report(first: &Pokemon, second: &Pokemon) -> String {
    let a = title_case(&first.name);
    let b = title_case(&second.name);

    let stat_line = |label: &str, stat: &str| {
        format!(
            "{label}: {a} {} vs {b} {}",
            first.stat(stat),
            second.stat(stat)
        )
    };
    let stats = [
        stat_line("HP", "hp"),
        stat_line("Attack", "attack"),
        stat_line("Defense", "defense"),
        stat_line("Sp. Attack", "special-attack"),
        stat_line("Sp. Defense", "special-defense"),
        stat_line("Speed", "speed"),
        format!(
            "Total: {a} {} vs {b} {}",
            first.total_stats(),
            second.total_stats()
        ),
    ]
    .join("\n");

    format!(
        "
Detailed Comparison: {a} vs {b}
====================================

Basic Information:
-----------------
{a}: Height {height_a}m, Weight {weight_a}kg
{b}: Height {height_b}m, Weight {weight_b}kg

Types:
------
{a}: {types_a}
{b}: {types_b}

Abilities:
----------
{a}:
{abilities_a}
{b}:
{abilities_b}

Base Stats Comparison:
--------------------
{stats}

Sample Moves:
------------
{a}:
{moves_a}
{b}:
{moves_b}

Held Items:
----------
{a}:
{items_a}
{b}:
{items_b}

Additional Information:
---------------------
{a}:
- Order: #{order_a}
- Base Experience: {experience_a}

{b}:
- Order: #{order_b}
- Base Experience: {experience_b}
",
        height_a = tenths(first.height),
        weight_a = tenths(first.weight),
        height_b = tenths(second.height),
        weight_b = tenths(second.weight),
        types_a = joined_titles(first.type_names(), "Unknown"),
        types_b = joined_titles(second.type_names(), "Unknown"),
        abilities_a = abilities(first),
        abilities_b = abilities(second),
        moves_a = moves(first),
        moves_b = moves(second),
        items_a = held_items(first),
        items_b = held_items(second),
        order_a = or_unknown(first.order),
        order_b = or_unknown(second.order),
        experience_a = or_unknown(first.base_experience),
        experience_b = or_unknown(second.base_experience),
    )
}

fn abilities(pokemon: &Pokemon) -> String {
    bullet_list(
        pokemon
            .abilities
            .iter()
            .map(|slot| title_case(&slot.ability.name)),
        "Unknown",
    )
}

fn moves(pokemon: &Pokemon) -> String {
    bullet_list(
        pokemon
            .moves
            .iter()
            .take(SAMPLE_MOVES)
            .map(|entry| title_case(&entry.action.name)),
        "No moves available",
    )
}

fn held_items(pokemon: &Pokemon) -> String {
    bullet_list(
        pokemon
            .held_items
            .iter()
            .map(|held| title_case(&held.item.name)),
        "No held items",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::{PIKACHU, SNORLAX, pokemon};

    #[test]
    fn compares_stats_side_by_side() {
        let report = comparison_report(&pokemon(PIKACHU), &pokemon(SNORLAX));

        assert!(report.contains("Detailed Comparison: Pikachu vs Snorlax"));
        assert!(report.contains("Pikachu: Height 0.4m, Weight 6.0kg"));
        assert!(report.contains("Snorlax: Height 2.1m, Weight 460.0kg"));
        assert!(report.contains("HP: Pikachu 35 vs Snorlax 160"));
        assert!(report.contains("Total: Pikachu 320 vs Snorlax 540"));
        assert!(report.contains("- Thick-Fat"));
    }

    #[test]
    fn reports_missing_lists() {
        let report = comparison_report(&pokemon(PIKACHU), &pokemon(SNORLAX));
        assert!(report.contains("Snorlax:\nNo held items"));
    }

    #[test]
    fn explains_missing_second_name() {
        let message = not_enough_names_report(&["pikachu".to_owned(), "vs".to_owned()]);
        assert!(message.contains("pikachu vs"));
        assert!(message.contains("compare pikachu raichu"));
    }
}
