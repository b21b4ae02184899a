//! Socket acquisition for the dispatch worker.
//!
//! The worker only ever writes, so a connection is surfaced as a boxed
//! `AsyncWrite`. Tests swap in in-memory writers through [`Connector`].

use std::io;

use async_trait::async_trait;
use shared::domain::Endpoint;
use tokio::{io::AsyncWrite, net::TcpStream};

pub type CommandWriter = Box<dyn AsyncWrite + Send + Unpin>;

#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, endpoint: &Endpoint) -> io::Result<CommandWriter>;
}

/// Plain TCP, Nagle disabled so each update leaves immediately.
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, endpoint: &Endpoint) -> io::Result<CommandWriter> {
        let stream = TcpStream::connect((endpoint.host.as_str(), endpoint.port)).await?;
        stream.set_nodelay(true)?;
        Ok(Box::new(stream))
    }
}
