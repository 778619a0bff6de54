use {
    crate::{ComError, MAX_MESSAGE_SIZE},
    codec::Codec,
    futures_util::StreamExt,
    std::{marker::PhantomData, net::SocketAddr},
    tokio_websockets::{ClientBuilder, MaybeTlsStream, WebSocketStream},
};

/// Receiving end of a `Publisher`.
pub struct Subscriber<T> {
    stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Codec> Subscriber<T> {
    pub async fn connect(addr: SocketAddr) -> Result<Self, ComError> {
        let uri = format!("ws://{}", addr);
        let uri: http::Uri = uri
            .parse()
            .map_err(|e| ComError::InvalidAddress(format!("{uri}: {e}")))?;
        let (stream, _response) = ClientBuilder::from_uri(uri).connect().await?;
        Ok(Self {
            stream,
            _marker: PhantomData,
        })
    }

    /// Next binary message. Text and control frames are skipped.
    pub async fn recv(&mut self) -> Result<T, ComError> {
        loop {
            match self.stream.next().await {
                Some(Ok(msg)) if msg.is_binary() => {
                    let payload = msg.into_payload();
                    if payload.len() > MAX_MESSAGE_SIZE {
                        return Err(ComError::MessageTooLarge(payload.len()));
                    }
                    return T::from_bytes(&payload).map_err(ComError::from);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Err(ComError::ConnectionClosed),
            }
        }
    }
}
