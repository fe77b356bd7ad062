use super::{Request, Response};
use crate::{
    dispatcher::RpcFunctionInfo,
    error::{Error, Result},
    types::Payload,
};
use async_bincode::{tokio::AsyncBincodeStream, AsyncDestination};
use futures::{SinkExt, StreamExt};
use serde::{de::DeserializeOwned, Serialize};
use tokio::{
    io::BufStream,
    net::{TcpStream, ToSocketAddrs},
    time::{self, Instant},
};

type ClientStream = AsyncBincodeStream<BufStream<TcpStream>, Response, Request, AsyncDestination>;

/// One connection to a [`Server`](crate::Server), used for one call at a time.
///
/// When a deadline is set every exchange is bounded by it. An exchange that
/// does not finish (deadline, transport or framing failure) may leave a
/// half-sent request or a late response on the socket, so every later call
/// fails with [`Error::Poisoned`].
pub struct Client {
    sock: ClientStream,
    deadline: Option<Instant>,
    poisoned: bool,
}

impl Client {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let sock = TcpStream::connect(addr).await.map_err(Error::Connect)?;
        let sock = AsyncBincodeStream::from(BufStream::new(sock)).for_async();
        Ok(Self {
            sock,
            deadline: None,
            poisoned: false,
        })
    }

    /// Connects, giving up with [`Error::DeadlineExceeded`] at `deadline`.
    /// The deadline then carries over to every later call.
    pub async fn connect_until(addr: impl ToSocketAddrs, deadline: Instant) -> Result<Self> {
        let mut client = time::timeout_at(deadline, Self::connect(addr))
            .await
            .map_err(|_| Error::DeadlineExceeded)??;
        client.set_deadline(deadline);
        Ok(client)
    }

    pub fn set_deadline(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }

    async fn exchange(&mut self, req: Request) -> Result<Response> {
        self.sock.send(req).await?;
        self.sock.next().await.ok_or(Error::Disconnected)?.map_err(Error::from)
    }

    async fn send_recv(&mut self, req: Request) -> Result<Response> {
        if self.poisoned {
            return Err(Error::Poisoned);
        }
        // Cleared only once a whole response has been read.
        self.poisoned = true;
        let response = match self.deadline {
            Some(deadline) => time::timeout_at(deadline, self.exchange(req))
                .await
                .map_err(|_| Error::DeadlineExceeded)?,
            None => self.exchange(req).await,
        }?;
        self.poisoned = false;
        Ok(response)
    }

    /// Whether an earlier exchange was cut short and the connection is unusable.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    pub async fn ping(&mut self) -> Result<()> {
        match self.send_recv(Request::Ping).await? {
            Response::Ping => Ok(()),
            _ => Err(Error::UnexpectedResponse("ping")),
        }
    }

    pub async fn rpc_functions(&mut self) -> Result<Vec<RpcFunctionInfo>> {
        match self.send_recv(Request::RpcFunctions).await? {
            Response::RpcFunctions(infos) => Ok(infos),
            _ => Err(Error::UnexpectedResponse("rpc_functions")),
        }
    }

    pub async fn call<Domain, Range>(&mut self, name: &str, args: &Domain) -> Result<Range>
    where
        Domain: Serialize,
        Range: DeserializeOwned,
    {
        let req = Request::Call {
            name: name.to_owned(),
            args: Payload::encode(args)?,
        };
        match self.send_recv(req).await? {
            Response::Call(result) => Ok(result?.decode()?),
            _ => Err(Error::UnexpectedResponse("call")),
        }
    }
}
