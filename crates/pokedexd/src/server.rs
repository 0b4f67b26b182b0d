//! The read, dispatch and respond loop.
//!
//! One request is handled at a time: a response is written and flushed
//! before the next line is read. Per-request failures are answered in-band
//! and never stop the loop; only closure of the input or output ends it.

use std::io;

use pokedex_domain::DomainOperations;
use strum::Display;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use crate::dispatch::{DispatchError, INTERNAL_SERVER_ERROR, RequestHandler, Response};
use crate::transport::LineTransport;

const SERVER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::server");

/// Fallback line used if a response cannot be encoded.
const ENCODING_FAILURE_LINE: &str = "{\"error\":\"Internal server error\"}\n";

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ShutdownReason {
    /// The input reached end-of-stream.
    #[strum(to_string = "input stream closed")]
    InputClosed,
    /// The output reported a broken pipe.
    #[strum(to_string = "output stream closed")]
    OutputClosed,
    /// The process received an interrupt.
    #[strum(to_string = "interrupted")]
    Interrupted,
}

/// Line-protocol server over an async reader and writer.
#[derive(Debug)]
pub struct Server<D, R, W> {
    transport: LineTransport<R, W>,
    handler: RequestHandler<D>,
}

impl<D, R, W> Server<D, R, W>
where
    D: DomainOperations,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a server reading from `transport` and answering via `handler`.
    pub fn new(transport: LineTransport<R, W>, handler: RequestHandler<D>) -> Self {
        Self { transport, handler }
    }

    /// Runs until the input closes or the output goes away.
    pub async fn run(&mut self) -> ShutdownReason {
        loop {
            let response = match self.transport.read_line().await {
                Ok(Some(line)) => match self.handler.handle_line(&line).await {
                    Some(response) => response,
                    None => continue,
                },
                Ok(None) => {
                    debug!(target: SERVER_TARGET, "end of input");
                    return ShutdownReason::InputClosed;
                }
                Err(error) => self.outer_fault(&error),
            };

            if let Some(reason) = self.respond(&response).await {
                return reason;
            }
        }
    }

    /// Transport, primarily useful for testing.
    pub fn transport(&self) -> &LineTransport<R, W> {
        &self.transport
    }

    fn outer_fault(&self, error: &DispatchError) -> Response {
        let journal = self.handler.journal();
        match error {
            DispatchError::RequestTooLarge { .. } => {
                journal.log_error(error, Some("Rejected oversized request"));
                Response::from_error(error)
            }
            _ => {
                journal.log_error(error, Some("Failed to read request"));
                Response::failure(INTERNAL_SERVER_ERROR)
            }
        }
    }

    async fn respond(&mut self, response: &Response) -> Option<ShutdownReason> {
        let journal = self.handler.journal();
        let line = response.to_line().unwrap_or_else(|error| {
            journal.log_error(&error, Some("Failed to encode response"));
            ENCODING_FAILURE_LINE.to_owned()
        });

        match self.transport.write_line(&line).await {
            Ok(()) => None,
            Err(error) if error.kind() == io::ErrorKind::BrokenPipe => {
                journal.log_error(&error, Some("Output closed while writing response"));
                Some(ShutdownReason::OutputClosed)
            }
            Err(error) => {
                journal.log_error(&error, Some("Failed to write response"));
                None
            }
        }
    }
}
