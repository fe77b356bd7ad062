//! The fixed sequence of calls the client binary runs.

use crate::{
    error::Result,
    service::{SliceClient, ECHO_NUMBERS, ECHO_STRINGS, PROCESS_NUMBERS, PROCESS_STRINGS},
    types::{NumbersRequest, NumbersResponse, SliceMetadata, StringsRequest, StringsResponse},
};
use tracing::info;

#[derive(Debug, Clone)]
pub enum Step {
    EchoNumbers(NumbersRequest),
    EchoStrings(StringsRequest),
    ProcessNumbers(NumbersRequest),
    ProcessStrings(StringsRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Numbers(NumbersResponse),
    Strings(StringsResponse),
}

impl Outcome {
    pub fn metadata(&self) -> Option<SliceMetadata> {
        match self {
            Outcome::Numbers(resp) => resp.metadata,
            Outcome::Strings(resp) => resp.metadata,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Outcome::Numbers(resp) => &resp.message,
            Outcome::Strings(resp) => &resp.message,
        }
    }
}

impl Step {
    pub fn method(&self) -> &'static str {
        match self {
            Step::EchoNumbers(_) => ECHO_NUMBERS,
            Step::EchoStrings(_) => ECHO_STRINGS,
            Step::ProcessNumbers(_) => PROCESS_NUMBERS,
            Step::ProcessStrings(_) => PROCESS_STRINGS,
        }
    }

    pub async fn run(&self, client: &mut SliceClient) -> Result<Outcome> {
        match self {
            Step::EchoNumbers(req) => client.echo_numbers(req).await.map(Outcome::Numbers),
            Step::EchoStrings(req) => client.echo_strings(req).await.map(Outcome::Strings),
            Step::ProcessNumbers(req) => client.process_numbers(req).await.map(Outcome::Numbers),
            Step::ProcessStrings(req) => client.process_strings(req).await.map(Outcome::Strings),
        }
    }

    fn log_request(&self) {
        match self {
            Step::EchoNumbers(req) | Step::ProcessNumbers(req) => info!(
                "  sending {:?} (absent: {}, len: {})",
                req.numbers,
                req.numbers_is_absent,
                req.numbers.len()
            ),
            Step::EchoStrings(req) | Step::ProcessStrings(req) => info!(
                "  sending {:?} (absent: {}, len: {})",
                req.strings,
                req.strings_is_absent,
                req.strings.len()
            ),
        }
    }
}

fn log_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Numbers(resp) => info!(
            "  returned {:?} (empty: {})",
            resp.processed_numbers,
            resp.processed_numbers.is_empty()
        ),
        Outcome::Strings(resp) => info!(
            "  returned {:?} (empty: {})",
            resp.processed_strings,
            resp.processed_strings.is_empty()
        ),
    }
    if let Some(meta) = outcome.metadata() {
        info!(
            "  server saw absent: {}, length: {}, capacity: {}",
            meta.is_absent, meta.slice_length, meta.slice_capacity
        );
    }
    info!("  message: {}", outcome.message());
}

/// Echo checks for empty and absent sequences, then the transforms.
pub fn steps() -> Vec<Step> {
    vec![
        Step::EchoNumbers(NumbersRequest::new(vec![])),
        Step::EchoNumbers(NumbersRequest::absent()),
        Step::EchoNumbers(NumbersRequest::new(vec![1, 2, 3, 4, 5])),
        Step::EchoStrings(StringsRequest::new(Vec::<String>::new())),
        Step::EchoStrings(StringsRequest::absent()),
        Step::ProcessNumbers(NumbersRequest::new(vec![])),
        Step::ProcessNumbers(NumbersRequest::new(vec![1, 2, 3, 4, 5])),
        Step::ProcessStrings(StringsRequest::new(["hello", "world"])),
    ]
}

/// Runs every step in order, stopping at the first failed call.
pub async fn run(client: &mut SliceClient) -> Result<Vec<Outcome>> {
    let steps = steps();
    let mut outcomes = Vec::with_capacity(steps.len());
    for (i, step) in steps.iter().enumerate() {
        info!("step {}: {}", i + 1, step.method());
        step.log_request();
        let outcome = step.run(client).await?;
        log_outcome(&outcome);
        outcomes.push(outcome);
    }
    info!("all {} steps completed", outcomes.len());
    Ok(outcomes)
}
