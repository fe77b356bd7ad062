use crate::{types::Payload, RpcFunction};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use thiserror::Error;

/// Maps [`RpcFunction`] names to a type-erased callable.
///
/// Functions are registered with [`add`](Dispatcher::add) and called by name
/// with [`call`](Dispatcher::call). The registered names can be listed with
/// [`rpc_functions`](Dispatcher::rpc_functions).
#[derive(Default)]
pub(crate) struct Dispatcher {
    rpc_functions: BTreeMap<String, Arc<dyn DynamicRpcFunction + Send + Sync + 'static>>,
}

impl Dispatcher {
    pub(crate) fn add<RFn>(&mut self, rpc_function: RFn)
    where
        RFn: RpcFunction + Send + Sync + 'static,
        RFn::Domain: Send,
    {
        let typed = TypedRpcFunction { rpc_function };
        let name = typed.name().to_owned();
        self.rpc_functions.insert(name, Arc::new(typed));
    }

    pub(crate) async fn call(&self, name: &str, args: Payload) -> CallResult {
        let rfn = self
            .rpc_functions
            .get(name)
            .ok_or_else(|| DispatchError::NoSuchFunction(name.to_owned()))?;
        Ok(rfn.call(args).await?)
    }

    pub(crate) fn rpc_functions(&self) -> Vec<RpcFunctionInfo> {
        self.rpc_functions
            .keys()
            .map(|name| RpcFunctionInfo { name: name.clone() })
            .collect()
    }
}

pub(crate) type CallResult = Result<Payload, DispatchError>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RpcFunctionInfo {
    pub name: String,
}

struct TypedRpcFunction<RFn> {
    rpc_function: RFn,
}

impl<RFn> TypedRpcFunction<RFn>
where
    RFn: RpcFunction + Send + Sync,
    RFn::Domain: Send,
{
    async fn call(&self, args: Payload) -> Result<Payload, CallError> {
        let decoded_args: RFn::Domain = args
            .decode()
            .map_err(|e| CallError::Domain(e.to_string()))?;
        let retval = self.rpc_function.call(decoded_args).await;
        Payload::encode(&retval).map_err(|e| CallError::Range(e.to_string()))
    }
}

/// A type-erased version of the main trait, RpcFunction
trait DynamicRpcFunction {
    fn name(&self) -> &str;
    fn call(&self, args: Payload) -> BoxFuture<Result<Payload, CallError>>;
}

impl<RFn> DynamicRpcFunction for TypedRpcFunction<RFn>
where
    RFn: RpcFunction + Send + Sync,
    RFn::Domain: Send,
{
    fn name(&self) -> &str {
        self.rpc_function.name()
    }

    fn call(&self, args: Payload) -> BoxFuture<Result<Payload, CallError>> {
        Box::pin(self.call(args))
    }
}

#[derive(Serialize, Deserialize, Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("no function named {0:?}")]
    NoSuchFunction(String),

    #[error("calling function: {0}")]
    CallError(#[from] CallError),
}

#[derive(Serialize, Deserialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("decoding arguments: {0}")]
    Domain(String),

    #[error("(BUG in RPC function) encoding return value: {0}")]
    Range(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{call, name};

    struct Negate;

    impl RpcFunction for Negate {
        name!("Negate");
        call! {
            async fn call(&self, n: i64) -> i64 {
                -n
            }
        }
    }

    fn dispatcher() -> Dispatcher {
        let mut dispatcher = Dispatcher::default();
        dispatcher.add(Negate);
        dispatcher
    }

    #[tokio::test]
    async fn calls_by_name() {
        let out = dispatcher()
            .call("Negate", Payload::encode(&21i64).unwrap())
            .await
            .unwrap();
        assert_eq!(out.decode::<i64>().unwrap(), -21);
    }

    #[tokio::test]
    async fn unknown_name() {
        let err = dispatcher()
            .call("Nope", Payload::default())
            .await
            .unwrap_err();
        assert_eq!(err, DispatchError::NoSuchFunction("Nope".to_owned()));
    }

    #[tokio::test]
    async fn undecodable_args() {
        let err = dispatcher()
            .call("Negate", Payload::from(vec![1]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::CallError(CallError::Domain(_))
        ));
    }

    #[test]
    fn lists_registered_names() {
        let names = dispatcher().rpc_functions();
        assert_eq!(names, vec![RpcFunctionInfo { name: "Negate".into() }]);
    }
}
