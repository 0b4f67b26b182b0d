//! JSON-lines request dispatch.
//!
//! Each input line carries one request object:
//!
//! ```json
//! {"query": "get info pikachu", "user": "ash"}
//! ```
//!
//! and is answered with exactly one response object:
//!
//! ```json
//! {"response": "Pikachu ..."}
//! {"error": "Request must contain a 'query' field"}
//! ```
//!
//! Lines are decoded and validated by [`QueryRequest`], parsed into a
//! [`Command`] and routed by [`CommandRouter`] onto the domain operations.
//! [`RequestHandler`] ties the steps together and journals each of them.

mod command;
mod errors;
mod handler;
mod request;
mod response;
mod router;

pub use self::command::{Command, VALID_COMMANDS};
pub use self::errors::{DispatchError, INTERNAL_SERVER_ERROR};
pub use self::handler::RequestHandler;
pub use self::request::{QueryRequest, UNKNOWN_USER};
pub use self::response::Response;
pub use self::router::CommandRouter;
