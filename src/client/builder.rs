// ABOUTME: Client factory and builder patterns for easy SMPP client creation
// ABOUTME: Provides convenient constructors for SMPP clients and handles the connection + bind process

use crate::client::default::DefaultClient;
use crate::client::error::SmppResult;
use crate::client::traits::{SmppClient, SmppConnection, SmppTransceiver};
use crate::client::types::BindCredentials;
use tokio::net::ToSocketAddrs;

/// Factory for creating SMPP clients
///
/// Every session binds as a transceiver, so the factory methods below hand
/// back a client capable of both sending and receiving once bound.
pub struct ClientBuilder;

impl ClientBuilder {
    /// Create a transceiver client (can send and receive SMS)
    ///
    /// Establishes connection and binds in a single operation. Returns a
    /// trait object usable for both sending and receiving SMS messages.
    pub async fn transceiver<T: ToSocketAddrs + Send>(
        addr: T,
        credentials: BindCredentials,
    ) -> SmppResult<impl SmppTransceiver> {
        let mut client = DefaultClient::connect(addr).await?;
        client.bind(&credentials).await?;
        Ok(client)
    }

    /// Create a basic client (connection + bind only)
    ///
    /// Establishes connection and binds with specified credentials.
    /// Use this when you need a client but don't know the specific type at compile time.
    pub async fn client<T: ToSocketAddrs + Send>(
        addr: T,
        credentials: BindCredentials,
    ) -> SmppResult<impl SmppClient> {
        let mut client = DefaultClient::connect(addr).await?;
        client.bind(&credentials).await?;
        Ok(client)
    }

    /// Create a connection without binding
    ///
    /// Just establishes the TCP connection. You must call bind() separately.
    /// Useful when you need to control the binding process manually.
    pub async fn connection<T: ToSocketAddrs + Send>(addr: T) -> SmppResult<impl SmppConnection> {
        DefaultClient::connect(addr).await
    }
}

/// Convenience functions for quick client creation
impl ClientBuilder {
    /// Quick transceiver creation with minimal parameters
    ///
    /// Creates a transceiver client with default settings.
    /// Equivalent to `transceiver(addr, BindCredentials::transceiver(system_id, password))`.
    pub async fn quick_transceiver<T: ToSocketAddrs + Send>(
        addr: T,
        system_id: impl Into<String>,
        password: impl Into<String>,
    ) -> SmppResult<impl SmppTransceiver> {
        let credentials = BindCredentials::transceiver(system_id, password);
        Self::transceiver(addr, credentials).await
    }

    /// Quick client creation with minimal parameters
    ///
    /// Creates a client bound as transceiver with default settings.
    /// Use this for simple SMS sending/receiving scenarios.
    pub async fn quick_client<T: ToSocketAddrs + Send>(
        addr: T,
        system_id: impl Into<String>,
        password: impl Into<String>,
    ) -> SmppResult<impl SmppClient> {
        let credentials = BindCredentials::transceiver(system_id, password);
        Self::client(addr, credentials).await
    }
}
