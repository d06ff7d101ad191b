use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Runtime settings for the HTTP/WebSocket front of the service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Directory served for every path other than the signaling socket.
    pub static_dir: Option<PathBuf>,
    /// Capacity of the queue between sockets and the session coordinator.
    pub command_buffer: usize,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            static_dir: Some(PathBuf::from("public")),
            command_buffer: 100,
        }
    }
}
