//! PokeAPI-backed implementation of [`DomainOperations`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

use pokedex_config::Config;

use crate::client::PokeApiClient;
use crate::model::Multiplier;
use crate::report::{
    TeamMember, comparison_report, info_report, matchup_report, not_enough_names_report,
    not_found_report, rank_weaknesses, team_report,
};
use crate::team::{Role, RosterRotation, team_focus};
use crate::{DomainError, DomainOperations};

const DOMAIN_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::pokeapi");

/// Words skipped when picking the two names of a comparison.
const COMPARE_FILLERS: &[&str] = &["and", "vs", "vs.", "versus", "with", "to", "against", "or"];

/// Domain operations resolved against PokeAPI.
///
/// Type weaknesses are cached for the lifetime of the value; creature data
/// is always fetched fresh. Team suggestions advance a shared roster
/// rotation, so consecutive requests propose different creatures.
#[derive(Debug)]
pub struct PokeApi {
    client: PokeApiClient,
    weakness_cache: Mutex<HashMap<String, Arc<Vec<String>>>>,
    rotation: Mutex<RosterRotation>,
}

impl PokeApi {
    /// Wraps an existing client.
    #[must_use]
    pub fn new(client: PokeApiClient) -> Self {
        Self {
            client,
            weakness_cache: Mutex::new(HashMap::new()),
            rotation: Mutex::new(RosterRotation::default()),
        }
    }

    /// Builds the client from the configured base URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidBaseUrl`] when the configured URL is
    /// unusable and [`DomainError::Client`] when the HTTP client fails to
    /// build.
    pub fn from_config(config: &Config) -> Result<Self, DomainError> {
        let base_url = config
            .api_base_url()
            .map_err(|_| DomainError::InvalidBaseUrl {
                url: config.api_base_url.clone(),
            })?;
        let client = PokeApiClient::new(base_url, config.http_timeout())?;
        Ok(Self::new(client))
    }

    /// Attacking types dealing double damage to `type_name`.
    ///
    /// Lookup failures degrade to "no known weaknesses" and are not cached.
    async fn weaknesses_of(&self, type_name: &str) -> Arc<Vec<String>> {
        if let Some(cached) = self.cached_weaknesses(type_name) {
            return cached;
        }

        let weaknesses = match self.client.element_type(type_name).await {
            Ok(Some(element)) => element
                .damage_relations
                .effectiveness()
                .into_iter()
                .filter(|(_, multiplier)| *multiplier == Multiplier::Double)
                .map(|(attacker, _)| attacker)
                .collect::<Vec<_>>(),
            Ok(None) => return Arc::new(Vec::new()),
            Err(error) => {
                warn!(target: DOMAIN_TARGET, %error, type_name, "type lookup failed");
                return Arc::new(Vec::new());
            }
        };

        let weaknesses = Arc::new(weaknesses);
        if let Ok(mut cache) = self.weakness_cache.lock() {
            cache.insert(type_name.to_owned(), Arc::clone(&weaknesses));
        }
        weaknesses
    }

    fn cached_weaknesses(&self, type_name: &str) -> Option<Arc<Vec<String>>> {
        self.weakness_cache
            .lock()
            .ok()
            .and_then(|cache| cache.get(type_name).cloned())
    }

    fn next_candidates(&self, description: &str) -> Vec<&'static str> {
        let focus = team_focus(description);
        self.rotation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pick(focus)
    }

    async fn team_member(&self, candidate: &str) -> TeamMember {
        match self.client.pokemon(candidate).await {
            Ok(Some(pokemon)) => TeamMember::Resolved {
                name: pokemon.name.clone(),
                types: pokemon.type_names().map(str::to_owned).collect(),
                role: Role::classify(&pokemon),
            },
            Ok(None) => TeamMember::Unavailable {
                name: candidate.to_owned(),
            },
            Err(error) => {
                warn!(target: DOMAIN_TARGET, %error, candidate, "team member lookup failed");
                TeamMember::Unavailable {
                    name: candidate.to_owned(),
                }
            }
        }
    }
}

/// Picks the two creature names out of a comparison's tokens.
fn comparison_names(tokens: &[String]) -> Option<(&str, &str)> {
    let mut names = tokens
        .iter()
        .map(String::as_str)
        .filter(|token| !COMPARE_FILLERS.contains(token));
    let first = names.next()?;
    let second = names.next()?;
    Some((first, second))
}

impl DomainOperations for PokeApi {
    async fn lookup(&self, name: &str) -> Result<Option<String>, DomainError> {
        let pokemon = self.client.pokemon(name).await?;
        Ok(pokemon.as_ref().map(info_report))
    }

    async fn compare(&self, names: &[String]) -> Result<String, DomainError> {
        let Some((first_name, second_name)) = comparison_names(names) else {
            return Ok(not_enough_names_report(names));
        };

        let Some(first) = self.client.pokemon(first_name).await? else {
            return Ok(not_found_report(first_name));
        };
        let Some(second) = self.client.pokemon(second_name).await? else {
            return Ok(not_found_report(second_name));
        };
        Ok(comparison_report(&first, &second))
    }

    async fn analyze_matchups(&self, name: &str) -> Result<String, DomainError> {
        let Some(pokemon) = self.client.pokemon(name).await? else {
            return Ok(not_found_report(name));
        };

        let mut per_type = Vec::with_capacity(pokemon.types.len());
        for type_name in pokemon.type_names() {
            let weaknesses = self.weaknesses_of(type_name).await;
            per_type.push(weaknesses.as_ref().clone());
        }
        Ok(matchup_report(&pokemon, &rank_weaknesses(per_type)))
    }

    async fn suggest_team(&self, description: &str) -> Result<String, DomainError> {
        let mut members = Vec::new();
        for candidate in self.next_candidates(description) {
            members.push(self.team_member(candidate).await);
        }
        Ok(team_report(description, &members))
    }
}
