//! Shared helpers for unit tests.

pub(crate) mod socket_guard {
    use std::net::TcpListener;

    use wiremock::MockServer;

    /// Starts a wiremock server, or returns `None` (with a notice on
    /// stderr) in sandboxes where localhost sockets cannot be bound.
    pub async fn start_mock_server_or_skip() -> Option<MockServer> {
        if TcpListener::bind("127.0.0.1:0").is_err() {
            eprintln!(
                "[socket-bound-test] cannot bind localhost socket; skipping wiremock-based test"
            );
            return None;
        }
        Some(MockServer::start().await)
    }
}
