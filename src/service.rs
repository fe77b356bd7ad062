//! The slice service: two transform methods and two echo methods over
//! sequences of numbers and strings.
//!
//! Transform methods compute a new sequence element by element. Echo methods
//! hand the input back untouched together with what the server saw of it,
//! including the caller's absence flag. No method can fail on a decodable
//! request, and a zero-length input yields a zero-length output.

use crate::{
    call,
    config::ServerConfig,
    error::Result,
    name,
    net::{client::Client, server::Server},
    types::{NumbersRequest, NumbersResponse, SliceMetadata, StringsRequest, StringsResponse},
    RpcFunction, RpcFunctionInfo,
};
use tokio::{net::ToSocketAddrs, time::Instant};
use tracing::info;

pub const PROCESS_NUMBERS: &str = "ProcessNumbers";
pub const PROCESS_STRINGS: &str = "ProcessStrings";
pub const ECHO_NUMBERS: &str = "EchoNumbers";
pub const ECHO_STRINGS: &str = "EchoStrings";

pub fn process_numbers(req: &NumbersRequest) -> NumbersResponse {
    let processed_numbers: Vec<i32> = req.numbers.iter().map(|n| n.wrapping_mul(2)).collect();
    NumbersResponse {
        message: format!(
            "{} processed, each number doubled",
            processed_numbers.len()
        ),
        processed_numbers,
        metadata: None,
    }
}

pub fn process_strings(req: &StringsRequest, prefix: &str) -> StringsResponse {
    let processed_strings: Vec<String> = req
        .strings
        .iter()
        .map(|s| format!("{prefix}{}", s.to_uppercase()))
        .collect();
    StringsResponse {
        message: format!(
            "{} processed, each string upper-cased and prefixed",
            processed_strings.len()
        ),
        processed_strings,
        metadata: None,
    }
}

pub fn echo_numbers(req: NumbersRequest) -> NumbersResponse {
    let metadata = SliceMetadata::observe(req.numbers_is_absent, req.numbers.len());
    NumbersResponse {
        message: echo_message(&metadata),
        processed_numbers: req.numbers,
        metadata: Some(metadata),
    }
}

pub fn echo_strings(req: StringsRequest) -> StringsResponse {
    let metadata = SliceMetadata::observe(req.strings_is_absent, req.strings.len());
    StringsResponse {
        message: echo_message(&metadata),
        processed_strings: req.strings,
        metadata: Some(metadata),
    }
}

fn echo_message(metadata: &SliceMetadata) -> String {
    format!(
        "echoed {} elements, caller marked absent: {}",
        metadata.slice_length, metadata.is_absent
    )
}

pub struct ProcessNumbers;

impl RpcFunction for ProcessNumbers {
    name!(PROCESS_NUMBERS);
    call! {
        async fn call(&self, req: NumbersRequest) -> NumbersResponse {
            info!("{PROCESS_NUMBERS} received {:?}", req.numbers);
            let resp = process_numbers(&req);
            info!("{PROCESS_NUMBERS} returning {:?}", resp.processed_numbers);
            resp
        }
    }
}

pub struct ProcessStrings {
    prefix: String,
}

impl ProcessStrings {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl RpcFunction for ProcessStrings {
    name!(PROCESS_STRINGS);
    call! {
        async fn call(&self, req: StringsRequest) -> StringsResponse {
            info!("{PROCESS_STRINGS} received {:?}", req.strings);
            let resp = process_strings(&req, &self.prefix);
            info!("{PROCESS_STRINGS} returning {:?}", resp.processed_strings);
            resp
        }
    }
}

pub struct EchoNumbers;

impl RpcFunction for EchoNumbers {
    name!(ECHO_NUMBERS);
    call! {
        async fn call(&self, req: NumbersRequest) -> NumbersResponse {
            info!(
                "{ECHO_NUMBERS} received {:?} (absent: {})",
                req.numbers, req.numbers_is_absent
            );
            echo_numbers(req)
        }
    }
}

pub struct EchoStrings;

impl RpcFunction for EchoStrings {
    name!(ECHO_STRINGS);
    call! {
        async fn call(&self, req: StringsRequest) -> StringsResponse {
            info!(
                "{ECHO_STRINGS} received {:?} (absent: {})",
                req.strings, req.strings_is_absent
            );
            echo_strings(req)
        }
    }
}

/// Registers all four slice service methods on `server`.
pub fn register(server: &mut Server, config: &ServerConfig) {
    server.add(ProcessNumbers);
    server.add(ProcessStrings::new(config.string_prefix.clone()));
    server.add(EchoNumbers);
    server.add(EchoStrings);
}

/// Typed calls against a server running the slice service.
pub struct SliceClient {
    inner: Client,
}

impl SliceClient {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        Ok(Self::from(Client::connect(addr).await?))
    }

    pub async fn connect_until(addr: impl ToSocketAddrs, deadline: Instant) -> Result<Self> {
        Ok(Self::from(Client::connect_until(addr, deadline).await?))
    }

    pub fn set_deadline(&mut self, deadline: Instant) {
        self.inner.set_deadline(deadline);
    }

    pub async fn ping(&mut self) -> Result<()> {
        self.inner.ping().await
    }

    pub async fn methods(&mut self) -> Result<Vec<RpcFunctionInfo>> {
        self.inner.rpc_functions().await
    }

    pub async fn process_numbers(&mut self, req: &NumbersRequest) -> Result<NumbersResponse> {
        self.inner.call(PROCESS_NUMBERS, req).await
    }

    pub async fn process_strings(&mut self, req: &StringsRequest) -> Result<StringsResponse> {
        self.inner.call(PROCESS_STRINGS, req).await
    }

    pub async fn echo_numbers(&mut self, req: &NumbersRequest) -> Result<NumbersResponse> {
        self.inner.call(ECHO_NUMBERS, req).await
    }

    pub async fn echo_strings(&mut self, req: &StringsRequest) -> Result<StringsResponse> {
        self.inner.call(ECHO_STRINGS, req).await
    }
}

impl From<Client> for SliceClient {
    fn from(inner: Client) -> Self {
        Self { inner }
    }
}
