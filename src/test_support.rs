//! Helpers for driving a `wiremock` server from synchronous tests.
//!
//! The server runs on its own thread, so the blocking client under test
//! must be used outside of `block_on`.

use std::net::TcpListener;

use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

pub struct MockApi {
    server: MockServer,
    runtime: Runtime,
}

impl MockApi {
    pub fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("A runtime should be created.");
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    /// Like [`MockApi::start`], with `GET /v1/reachable` already answering 200.
    pub fn reachable() -> Self {
        let api = Self::start();
        api.mount(
            Mock::given(matchers::method("GET"))
                .and(matchers::path("/v1/reachable"))
                .respond_with(ResponseTemplate::new(200)),
        );
        api
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    pub fn requests(&self) -> Vec<wiremock::Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }
}

/// An address nothing is listening on.
pub fn refused_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("A local port should be free.");
    let addr = listener.local_addr().expect("The port should be known.");
    drop(listener);
    format!("http://{addr}")
}
