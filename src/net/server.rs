use crate::{
    dispatcher::Dispatcher,
    net::{Request, Response},
    RpcFunction,
};
use async_bincode::tokio::AsyncBincodeStream;
use futures::{SinkExt, StreamExt};
use std::{io, net::SocketAddr, sync::Arc};
use tokio::{
    io::BufStream,
    net::{TcpListener, TcpStream, ToSocketAddrs},
    task,
};
use tracing::{debug, info, warn};

/// Accepts TCP connections and answers requests against its registered
/// [`RpcFunction`]s. Every connection gets its own task; calls share nothing
/// but the immutable dispatch table.
#[derive(Default)]
pub struct Server {
    dispatcher: Dispatcher,
}

impl Server {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<RFn>(&mut self, rpc_function: RFn)
    where
        RFn: RpcFunction + Send + Sync + 'static,
        RFn::Domain: Send,
    {
        self.dispatcher.add(rpc_function);
    }

    async fn handle_request(&self, req: Request) -> Response {
        match req {
            Request::Ping => Response::Ping,
            Request::RpcFunctions => Response::RpcFunctions(self.dispatcher.rpc_functions()),
            Request::Call { name, args } => {
                let result = self.dispatcher.call(&name, args).await;
                if let Err(e) = &result {
                    warn!("call to {name} failed: {e}");
                }
                Response::Call(result)
            }
        }
    }

    /// Binds `addr` and serves until accepting fails.
    pub async fn serve_tcp(self, addr: impl ToSocketAddrs) -> io::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        info!("listening on {}", listener.local_addr()?);
        self.serve(listener).await
    }

    /// Serves an already bound listener until accepting fails.
    pub async fn serve(self, listener: TcpListener) -> io::Result<()> {
        let root_arc = Arc::new(self);
        loop {
            let arc_self = root_arc.clone();
            let (sock, addr) = listener.accept().await?;
            debug!("accepted connection from {addr}");
            task::spawn(arc_self.handle_connection(sock, addr));
        }
    }

    async fn handle_connection(self: Arc<Self>, sock: TcpStream, addr: SocketAddr) {
        let mut sock = AsyncBincodeStream::<_, Request, Response, _>::from(BufStream::new(sock))
            .for_async();

        while let Some(request) = sock.next().await {
            let request = match request {
                Ok(request) => request,
                Err(e) => {
                    warn!("reading request from {addr}: {e}");
                    return;
                }
            };
            let response = self.handle_request(request).await;
            if let Err(e) = sock.send(response).await {
                warn!("writing response to {addr}: {e}");
                return;
            }
        }
        debug!("connection from {addr} closed");
    }
}
