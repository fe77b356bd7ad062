pub mod config;
mod dispatcher;
pub mod error;
pub mod logging;
mod macros;
pub mod net;
pub mod script;
pub mod service;
pub mod types;

pub use config::{ClientConfig, ServerConfig};
pub use dispatcher::{CallError, DispatchError, RpcFunctionInfo};
pub use error::{Error, Result};
pub use futures::future::BoxFuture;
pub use net::{client::Client, server::Server};
pub use service::SliceClient;
pub use types::Payload;

use serde::{de::DeserializeOwned, Serialize};

/// A single unary method that can be registered on a [`Server`].
///
/// `Domain` is decoded from the request payload, `Range` is encoded into the
/// response payload. Implementations hold no per-call state.
pub trait RpcFunction {
    type Domain: DeserializeOwned;
    type Range: Serialize;

    fn name(&self) -> &str;

    fn call<'call>(&'call self, args: Self::Domain) -> BoxFuture<'call, Self::Range>;
}
