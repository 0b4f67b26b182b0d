//! Subset of the PokeAPI resources the reports need.
//!
//! Fields default when missing so that sparse or partial payloads still
//! render a report instead of failing to decode.

use serde::Deserialize;

/// Named reference to another resource (`{"name": ..., "url": ...}`).
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct NamedResource {
    /// Resource name, lower-case and hyphenated.
    #[serde(default)]
    pub name: String,
}

/// A creature as served by `GET /pokemon/{name}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pokemon {
    /// Canonical lower-case name.
    #[serde(default)]
    pub name: String,
    /// National dex ordering.
    #[serde(default)]
    pub order: Option<i64>,
    /// Height in decimetres.
    #[serde(default)]
    pub height: u32,
    /// Weight in hectograms.
    #[serde(default)]
    pub weight: u32,
    /// Experience gained for defeating this creature.
    #[serde(default)]
    pub base_experience: Option<u32>,
    /// Elemental types in slot order.
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    /// Abilities, hidden ones included.
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    /// Base stats.
    #[serde(default)]
    pub stats: Vec<StatEntry>,
    /// Learnable moves.
    #[serde(default)]
    pub moves: Vec<MoveEntry>,
    /// Items the creature may hold in the wild.
    #[serde(default)]
    pub held_items: Vec<HeldItem>,
    /// Game versions the creature appears in.
    #[serde(default)]
    pub game_indices: Vec<GameIndex>,
    /// Sprite URLs.
    #[serde(default)]
    pub sprites: Sprites,
}

/// Type slot of a creature.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TypeSlot {
    /// The referenced type.
    #[serde(rename = "type", default)]
    pub kind: NamedResource,
}

/// Ability slot of a creature.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AbilitySlot {
    /// The referenced ability.
    #[serde(default)]
    pub ability: NamedResource,
}

/// One base stat value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatEntry {
    /// Base value of the stat.
    #[serde(default)]
    pub base_stat: u32,
    /// Which stat this is (`hp`, `attack`, `special-defense`, ...).
    #[serde(default)]
    pub stat: NamedResource,
}

/// A learnable move.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoveEntry {
    /// The referenced move.
    #[serde(rename = "move", default)]
    pub action: NamedResource,
}

/// A wild held item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeldItem {
    /// The referenced item.
    #[serde(default)]
    pub item: NamedResource,
}

/// Appearance in a game version.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameIndex {
    /// The referenced game version.
    #[serde(default)]
    pub version: NamedResource,
}

/// Default sprite URLs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sprites {
    /// Front-facing sprite.
    #[serde(default)]
    pub front_default: Option<String>,
    /// Back-facing sprite.
    #[serde(default)]
    pub back_default: Option<String>,
}

impl Pokemon {
    /// Base value of the named stat, zero when absent.
    #[must_use]
    pub fn stat(&self, name: &str) -> u32 {
        self.stats
            .iter()
            .find(|entry| entry.stat.name == name)
            .map_or(0, |entry| entry.base_stat)
    }

    /// Sum of all base stats.
    #[must_use]
    pub fn total_stats(&self) -> u32 {
        self.stats.iter().map(|entry| entry.base_stat).sum()
    }

    /// Type names in slot order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|slot| slot.kind.name.as_str())
    }
}

/// A type as served by `GET /type/{name}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ElementType {
    /// Type name.
    #[serde(default)]
    pub name: String,
    /// How other types interact with this one.
    #[serde(default)]
    pub damage_relations: DamageRelations,
}

/// Defensive damage relations of a type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DamageRelations {
    /// Attacking types dealing double damage.
    #[serde(default)]
    pub double_damage_from: Vec<NamedResource>,
    /// Attacking types dealing half damage.
    #[serde(default)]
    pub half_damage_from: Vec<NamedResource>,
    /// Attacking types dealing no damage.
    #[serde(default)]
    pub no_damage_from: Vec<NamedResource>,
}

/// Damage multiplier applied by an attacking type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplier {
    /// Super effective (x2).
    Double,
    /// Not very effective (x0.5).
    Half,
    /// No effect (x0).
    Immune,
}

impl DamageRelations {
    /// Flattens the relations into `(attacking type, multiplier)` pairs.
    ///
    /// Later categories win when PokeAPI lists a type twice, so immunity
    /// overrides resistance, which overrides weakness.
    #[must_use]
    pub fn effectiveness(&self) -> Vec<(String, Multiplier)> {
        let mut table: Vec<(String, Multiplier)> = Vec::new();
        let categories = [
            (&self.double_damage_from, Multiplier::Double),
            (&self.half_damage_from, Multiplier::Half),
            (&self.no_damage_from, Multiplier::Immune),
        ];
        for (relations, multiplier) in categories {
            for relation in relations {
                match table.iter_mut().find(|(name, _)| *name == relation.name) {
                    Some(entry) => entry.1 = multiplier,
                    None => table.push((relation.name.clone(), multiplier)),
                }
            }
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_sparse_payload() {
        let pokemon: Pokemon =
            serde_json::from_str(r#"{"name":"ditto"}"#).expect("sparse payload decodes");
        assert_eq!(pokemon.name, "ditto");
        assert_eq!(pokemon.total_stats(), 0);
        assert_eq!(pokemon.stat("hp"), 0);
    }

    #[test]
    fn later_relations_override_earlier_ones() {
        let relations: DamageRelations = serde_json::from_str(
            r#"{
                "double_damage_from":[{"name":"ground"},{"name":"water"}],
                "half_damage_from":[{"name":"fire"}],
                "no_damage_from":[{"name":"ground"}]
            }"#,
        )
        .expect("relations decode");

        let table = relations.effectiveness();
        assert_eq!(
            table,
            vec![
                ("ground".to_owned(), Multiplier::Immune),
                ("water".to_owned(), Multiplier::Double),
                ("fire".to_owned(), Multiplier::Half),
            ]
        );
    }
}
