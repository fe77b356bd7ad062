pub mod client;
pub mod server;

use crate::{
    dispatcher::{DispatchError, RpcFunctionInfo},
    types::Payload,
};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub(crate) enum Request {
    Ping,
    RpcFunctions,
    Call { name: String, args: Payload },
}

#[derive(Serialize, Deserialize, Debug)]
pub(crate) enum Response {
    Ping,
    RpcFunctions(Vec<RpcFunctionInfo>),
    Call(Result<Payload, DispatchError>),
}
