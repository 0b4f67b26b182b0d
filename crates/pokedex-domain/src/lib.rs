//! Pokémon domain operations consumed by the command server.
//!
//! The server only knows the [`DomainOperations`] trait: four asynchronous
//! capabilities that take plain text and hand back a human-readable report.
//! [`PokeApi`] is the production implementation; it resolves creatures and
//! type relations against a PokeAPI deployment and renders the reports in
//! [`report`].
//!
//! A name that does not resolve is not an error. `lookup` answers `None`
//! and the other operations return an explanatory report. Only transport
//! failures and unexpected upstream responses surface as [`DomainError`].

mod client;
mod error;
pub mod model;
mod operations;
mod pokeapi;
pub mod report;
pub mod team;

pub use client::{PokeApiClient, USER_AGENT};
pub use error::DomainError;
pub use operations::DomainOperations;
pub use pokeapi::PokeApi;
