#![allow(dead_code)]

pub mod range_server;

use bdl_core::fetch::HttpClient;
use bdl_core::transfer::TransferContext;

pub const TEST_USER_AGENT: &str = "bdl-integration/1.0";

/// Deterministic body of `len` bytes.
pub fn body(len: usize) -> Vec<u8> {
    (0u8..251).cycle().take(len).collect()
}

pub fn context() -> TransferContext {
    TransferContext::new(
        HttpClient::new(TEST_USER_AGENT).with_connect_timeout(std::time::Duration::from_secs(5)),
    )
}

/// A URL on a local port nothing listens on.
pub fn dead_url(name: &str) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/{}", port, name)
}
