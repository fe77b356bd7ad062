use slice_rpc::{
    call, name,
    script::{self, Outcome},
    service::{self, EchoNumbers, EchoStrings},
    types::{NumbersRequest, StringsRequest, StringsResponse},
    Client, DispatchError, Error, RpcFunction, Server, ServerConfig, SliceClient,
};
use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{net::TcpListener, task, time::Instant};

struct Stall;

impl RpcFunction for Stall {
    name!("Stall");
    call! {
        async fn call(&self, numbers: Vec<i32>) -> Vec<i32> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            numbers
        }
    }
}

/// Stands in for `ProcessStrings` and counts how often it is reached.
struct CountingStrings(Arc<AtomicUsize>);

impl RpcFunction for CountingStrings {
    name!(service::PROCESS_STRINGS);
    call! {
        async fn call(&self, req: StringsRequest) -> StringsResponse {
            self.0.fetch_add(1, Ordering::SeqCst);
            service::process_strings(&req, "")
        }
    }
}

async fn spawn(server: Server) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    task::spawn(server.serve(listener));
    addr
}

async fn spawn_server(prefix: &str) -> SocketAddr {
    let config = ServerConfig {
        listen_addr: String::new(),
        string_prefix: prefix.into(),
    };
    let mut server = Server::new();
    service::register(&mut server, &config);
    server.add(Stall);
    spawn(server).await
}

#[tokio::test]
async fn lists_all_four_methods() {
    let addr = spawn_server("PREFIX-").await;
    let mut client = SliceClient::connect(addr).await.unwrap();
    client.ping().await.unwrap();

    let names: Vec<String> = client.methods().await.unwrap().into_iter().map(|i| i.name).collect();
    for method in ["ProcessNumbers", "ProcessStrings", "EchoNumbers", "EchoStrings"] {
        assert!(names.iter().any(|n| n == method), "{method} missing from {names:?}");
    }
}

#[tokio::test]
async fn transforms_over_the_wire() {
    let addr = spawn_server("PREFIX-").await;
    let mut client = SliceClient::connect(addr).await.unwrap();

    let resp = client
        .process_numbers(&NumbersRequest::new(vec![]))
        .await
        .unwrap();
    assert!(resp.processed_numbers.is_empty());
    assert!(resp.message.contains("0 processed"));

    let resp = client
        .process_numbers(&NumbersRequest::new(vec![1, 2, 3, 4, 5]))
        .await
        .unwrap();
    assert_eq!(resp.processed_numbers, vec![2, 4, 6, 8, 10]);

    let resp = client
        .process_strings(&StringsRequest::new(["hello", "world"]))
        .await
        .unwrap();
    assert_eq!(resp.processed_strings, vec!["PREFIX-HELLO", "PREFIX-WORLD"]);
}

#[tokio::test]
async fn absence_flag_round_trips() {
    let addr = spawn_server("PREFIX-").await;
    let mut client = SliceClient::connect(addr).await.unwrap();

    let absent = client.echo_numbers(&NumbersRequest::absent()).await.unwrap();
    let meta = absent.metadata.unwrap();
    assert!(meta.is_absent);
    assert_eq!(meta.slice_length, 0);
    assert!(absent.processed_numbers.is_empty());

    let empty = client
        .echo_numbers(&NumbersRequest::new(vec![]))
        .await
        .unwrap();
    let meta = empty.metadata.unwrap();
    assert!(!meta.is_absent);
    assert_eq!(meta.slice_length, 0);

    let absent = client.echo_strings(&StringsRequest::absent()).await.unwrap();
    assert!(absent.metadata.unwrap().is_absent);
    let empty = client
        .echo_strings(&StringsRequest::new(Vec::<String>::new()))
        .await
        .unwrap();
    assert!(!empty.metadata.unwrap().is_absent);
}

#[tokio::test]
async fn echo_returns_input_unchanged() {
    let addr = spawn_server("PREFIX-").await;
    let mut client = SliceClient::connect(addr).await.unwrap();

    let numbers: Vec<i32> = (0..100).map(|_| rand::random()).collect();
    let resp = client
        .echo_numbers(&NumbersRequest::new(numbers.clone()))
        .await
        .unwrap();
    assert_eq!(resp.processed_numbers, numbers);
    let meta = resp.metadata.unwrap();
    assert_eq!(meta.slice_length as usize, numbers.len());
    assert_eq!(meta.slice_capacity, meta.slice_length);

    let strings = vec!["héllo".to_owned(), String::new(), "MiXeD".to_owned()];
    let resp = client
        .echo_strings(&StringsRequest::new(strings.clone()))
        .await
        .unwrap();
    assert_eq!(resp.processed_strings, strings);
    assert_eq!(resp.metadata.unwrap().slice_length, 3);
}

#[tokio::test]
async fn script_runs_to_completion() {
    let addr = spawn_server("PREFIX-").await;
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut client = SliceClient::connect_until(addr, deadline).await.unwrap();

    let outcomes = script::run(&mut client).await.unwrap();
    assert_eq!(outcomes.len(), script::steps().len());

    let absent_flags: Vec<bool> = outcomes
        .iter()
        .filter_map(Outcome::metadata)
        .map(|m| m.is_absent)
        .collect();
    assert_eq!(absent_flags, vec![false, true, false, false, true]);

    match outcomes.last().unwrap() {
        Outcome::Strings(resp) => {
            assert_eq!(resp.processed_strings, vec!["PREFIX-HELLO", "PREFIX-WORLD"])
        }
        other => panic!("unexpected last outcome {other:?}"),
    }
}

#[tokio::test]
async fn deadline_exceeded_mid_call() {
    let addr = spawn_server("PREFIX-").await;
    let mut client = Client::connect(addr).await.unwrap();
    client.set_deadline(Instant::now() + Duration::from_millis(100));

    let err = client
        .call::<_, Vec<i32>>("Stall", &vec![10, 20, 30])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DeadlineExceeded), "got {err}");
}

#[tokio::test]
async fn unknown_method_is_a_remote_error() {
    let addr = spawn_server("PREFIX-").await;
    let mut client = Client::connect(addr).await.unwrap();

    let err = client
        .call::<_, Vec<i32>>("DoubleNumbers", &NumbersRequest::new(vec![1]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Remote(DispatchError::NoSuchFunction(ref name)) if name == "DoubleNumbers"
    ));
}

#[tokio::test]
async fn connect_failure_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = SliceClient::connect(addr).await.err().unwrap();
    assert!(matches!(err, Error::Connect(_)));
}

#[tokio::test]
async fn timed_out_connection_is_not_reused() {
    let addr = spawn_server("PREFIX-").await;
    let mut client = Client::connect(addr).await.unwrap();
    client.set_deadline(Instant::now() + Duration::from_millis(50));

    let err = client
        .call::<_, Vec<i32>>("Stall", &vec![10, 20, 30])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DeadlineExceeded), "got {err}");
    assert!(client.is_poisoned());

    // The late [10, 20, 30] reply must never be handed to a later call.
    client.set_deadline(Instant::now() + Duration::from_secs(10));
    let err = client
        .call::<_, Vec<i32>>("Stall", &vec![1])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Poisoned), "got {err}");

    let mut client = SliceClient::from(client);
    let err = client
        .echo_numbers(&NumbersRequest::new(vec![7]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Poisoned), "got {err}");
}

#[tokio::test]
async fn remote_errors_leave_connection_usable() {
    let addr = spawn_server("PREFIX-").await;
    let mut client = Client::connect(addr).await.unwrap();

    client
        .call::<_, Vec<i32>>("Missing", &vec![1])
        .await
        .unwrap_err();
    assert!(!client.is_poisoned());
    client.ping().await.unwrap();
}

#[tokio::test]
async fn script_stops_at_first_failed_call() {
    let reached = Arc::new(AtomicUsize::new(0));
    let mut server = Server::new();
    server.add(EchoNumbers);
    server.add(EchoStrings);
    server.add(CountingStrings(reached.clone()));
    let addr = spawn(server).await;

    let mut client = SliceClient::connect(addr).await.unwrap();
    let err = script::run(&mut client).await.unwrap_err();
    assert!(
        matches!(
            err,
            Error::Remote(DispatchError::NoSuchFunction(ref name)) if name == service::PROCESS_NUMBERS
        ),
        "got {err}"
    );

    // ProcessStrings comes after the failing ProcessNumbers step.
    assert_eq!(reached.load(Ordering::SeqCst), 0);
}
