use {
    crate::ComError,
    codec::Codec,
    futures_util::{SinkExt, StreamExt},
    std::{collections::HashMap, marker::PhantomData, net::SocketAddr, sync::Arc},
    tokio::{
        net::{TcpListener, TcpStream, ToSocketAddrs},
        sync::{Mutex, mpsc},
        task::JoinHandle,
    },
    tokio_websockets::{Message, ServerBuilder, WebSocketStream},
};

type WsSink = futures_util::stream::SplitSink<WebSocketStream<TcpStream>, Message>;
type Clients = Arc<Mutex<HashMap<SocketAddr, WsSink>>>;

// messages waiting for the broadcast task; publishing into a full queue drops the message
const QUEUE_CAPACITY: usize = 16;

/// Fire-and-forget WebSocket broadcaster.
///
/// Every connected client receives each published message as one binary frame.
/// Publishing never waits on the network.
pub struct Publisher<T> {
    clients: Clients,
    sender: mpsc::Sender<Vec<u8>>,
    local_addr: SocketAddr,
    accept_task: JoinHandle<()>,
    broadcast_task: JoinHandle<()>,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Codec> Publisher<T> {
    /// Bind a listener and start accepting subscribers.
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, ComError> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let clients: Clients = Arc::new(Mutex::new(HashMap::new()));
        let (sender, receiver) = mpsc::channel(QUEUE_CAPACITY);

        let accept_task = tokio::spawn(accept_loop(listener, clients.clone()));
        let broadcast_task = tokio::spawn(broadcast_loop(receiver, clients.clone()));

        log::info!("publisher: listening on ws://{}", local_addr);
        Ok(Self {
            clients,
            sender,
            local_addr,
            accept_task,
            broadcast_task,
            _marker: PhantomData,
        })
    }

    /// Queue `value` for every connected client.
    ///
    /// Returns `ComError::Backpressure` when the queue is full; the message is dropped.
    pub fn publish(&self, value: &T) -> Result<(), ComError> {
        self.sender.try_send(value.to_bytes()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => ComError::Backpressure,
            mpsc::error::TrySendError::Closed(_) => ComError::ConnectionClosed,
        })
    }

    pub async fn client_count(&self) -> usize {
        self.clients.lock().await.len()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl<T> Drop for Publisher<T> {
    fn drop(&mut self) {
        self.accept_task.abort();
        self.broadcast_task.abort();
    }
}

async fn accept_loop(listener: TcpListener, clients: Clients) {
    loop {
        let (tcp_stream, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                log::warn!("publisher: accept error: {}", e);
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                continue;
            }
        };
        let ws_stream = match ServerBuilder::new().accept(tcp_stream).await {
            Ok((_request, ws_stream)) => ws_stream,
            Err(e) => {
                log::warn!("publisher: handshake failed for {}: {}", addr, e);
                continue;
            }
        };
        let (write_half, mut read_half) = ws_stream.split();
        clients.lock().await.insert(addr, write_half);
        log::info!("publisher: client {} connected", addr);

        // subscribers never send data; reading only detects the close
        let clients = clients.clone();
        tokio::spawn(async move {
            while let Some(Ok(_)) = read_half.next().await {}
            clients.lock().await.remove(&addr);
            log::info!("publisher: client {} disconnected", addr);
        });
    }
}

async fn broadcast_loop(mut receiver: mpsc::Receiver<Vec<u8>>, clients: Clients) {
    while let Some(payload) = receiver.recv().await {
        let message = Message::binary(payload);
        let mut clients = clients.lock().await;
        let mut failed = Vec::new();
        for (addr, sink) in clients.iter_mut() {
            if let Err(e) = sink.send(message.clone()).await {
                log::warn!("publisher: failed to send to {}: {}", addr, e);
                failed.push(*addr);
            }
        }
        for addr in failed {
            clients.remove(&addr);
        }
    }
}
