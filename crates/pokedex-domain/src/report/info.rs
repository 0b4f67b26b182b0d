//! Single-creature information report.

use crate::model::Pokemon;

use super::{bullet_list, joined_titles, or_unknown, tenths, title_case};

const SAMPLE_MOVES: usize = 5;

/// Full profile of a single creature.
#[must_use]
pub fn info_report(pokemon: &Pokemon) -> String {
    let name = title_case(&pokemon.name);
    let abilities = bullet_list(
        pokemon
            .abilities
            .iter()
            .map(|slot| title_case(&slot.ability.name)),
        "Unknown",
    );
    let moves = bullet_list(
        pokemon
            .moves
            .iter()
            .take(SAMPLE_MOVES)
            .map(|entry| title_case(&entry.action.name)),
        "Unknown",
    );
    let held_items = bullet_list(
        pokemon
            .held_items
            .iter()
            .map(|held| title_case(&held.item.name)),
        "No held items",
    );
    let games = bullet_list(
        pokemon
            .game_indices
            .iter()
            .map(|game| title_case(&game.version.name)),
        "No game data available",
    );
    let front = pokemon
        .sprites
        .front_default
        .as_deref()
        .unwrap_or("Not available");
    let back = pokemon
        .sprites
        .back_default
        .as_deref()
        .unwrap_or("Not available");

    format!(
        "
Pokemon Information for {name}
====================================

Basic Information:
-----------------
Height: {height} m
Weight: {weight} kg
Types: {types}
Base Experience: {base_experience}

Abilities:
----------
{abilities}

Base Stats:
-----------
HP: {hp}
Attack: {attack}
Defense: {defense}
Sp. Attack: {special_attack}
Sp. Defense: {special_defense}
Speed: {speed}
Total: {total}

Sample Moves:
------------
{moves}

Held Items:
----------
{held_items}

Game Appearances:
---------------
{games}

Sprites:
--------
Front: {front}
Back: {back}

Additional Information:
---------------------
- Order: #{order}
",
        height = tenths(pokemon.height),
        weight = tenths(pokemon.weight),
        types = joined_titles(pokemon.type_names(), "Unknown"),
        base_experience = or_unknown(pokemon.base_experience),
        hp = pokemon.stat("hp"),
        attack = pokemon.stat("attack"),
        defense = pokemon.stat("defense"),
        special_attack = pokemon.stat("special-attack"),
        special_defense = pokemon.stat("special-defense"),
        speed = pokemon.stat("speed"),
        total = pokemon.total_stats(),
        order = or_unknown(pokemon.order),
    )
}
