use crate::dispatcher::DispatchError;
use std::io;
use thiserror::Error;

/// Errors surfaced to a client of the slice service.
#[derive(Error, Debug)]
pub enum Error {
    /// The TCP connection could not be established
    #[error("connecting to server: {0}")]
    Connect(#[source] io::Error),

    /// Framing, encoding or transport failure on an established connection
    #[error("codec: {0}")]
    Codec(#[from] bincode::Error),

    /// The server closed the connection before answering
    #[error("connection closed by server")]
    Disconnected,

    /// The call deadline passed before a response arrived
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// An earlier call on this connection did not complete
    #[error("connection unusable after an interrupted call")]
    Poisoned,

    /// The server could not dispatch the call
    #[error("remote: {0}")]
    Remote(#[from] DispatchError),

    /// The server answered with a response of the wrong kind
    #[error("unexpected response to {0} request")]
    UnexpectedResponse(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
