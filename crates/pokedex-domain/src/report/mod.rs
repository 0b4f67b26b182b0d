//! Plain-text report rendering.
//!
//! Reports are multi-line strings meant to be read by a person (or relayed
//! by an assistant), so names are title-cased and units converted.

mod comparison;
mod info;
mod matchups;
mod team;

pub use comparison::{comparison_report, not_enough_names_report};
pub use info::info_report;
pub use matchups::{Weakness, matchup_report, rank_weaknesses};
pub use team::{TeamMember, team_report};

/// Explanation returned when a name does not resolve.
#[must_use]
pub fn not_found_report(name: &str) -> String {
    format!("Unable to find Pokémon '{name}'. Please check the spelling and try again.")
}

/// Title-cases a hyphenated or spaced PokeAPI name (`special-attack` ->
/// `Special-Attack`).
#[must_use]
pub fn title_case(name: &str) -> String {
    let mut titled = String::with_capacity(name.len());
    let mut at_word_start = true;
    for ch in name.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                titled.extend(ch.to_uppercase());
            } else {
                titled.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            titled.push(ch);
            at_word_start = true;
        }
    }
    titled
}

/// Formats a decimetre or hectogram value as a one-decimal figure.
fn tenths(value: u32) -> String {
    format!("{}.{}", value / 10, value % 10)
}

/// Renders `- item` lines, or `empty` when there is nothing to list.
fn bullet_list<I, S>(items: I, empty: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let lines: Vec<String> = items
        .into_iter()
        .map(|item| format!("- {}", item.as_ref()))
        .collect();
    if lines.is_empty() {
        empty.to_owned()
    } else {
        lines.join("\n")
    }
}

/// Comma-joined title-cased names, or `empty` when there are none.
fn joined_titles<'a, I>(names: I, empty: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let titled: Vec<String> = names.into_iter().map(title_case).collect();
    if titled.is_empty() {
        empty.to_owned()
    } else {
        titled.join(", ")
    }
}

/// Displays an optional value or `Unknown`.
fn or_unknown<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "Unknown".to_owned(), |inner| inner.to_string())
}
