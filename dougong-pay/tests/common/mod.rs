//! Shared fixtures for integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::{LazyLock, Mutex};

use dougong_pay::{
    Credentials, Params, Result,
    transport::{Transport, TransportRequest, TransportResponse},
};
use openssl::{pkey::PKey, rsa::Rsa};

/// (PKCS#8 private key, SPKI public key), generated once per test binary.
static KEY_PAIR: LazyLock<(String, String)> = LazyLock::new(|| {
    let pkey = PKey::from_rsa(Rsa::generate(2048).expect("should generate RSA key"))
        .expect("should wrap RSA key");
    let private = pkey.private_key_to_pem_pkcs8().expect("should encode private key");
    let public = pkey.public_key_to_pem().expect("should encode public key");
    (
        String::from_utf8(private).expect("PEM is ASCII"),
        String::from_utf8(public).expect("PEM is ASCII"),
    )
});

pub const SYS_ID: &str = "6666000100000000";
pub const PRODUCT_ID: &str = "PAYUN";

pub fn credentials(base_uri: &str) -> Credentials {
    let (private, public) = &*KEY_PAIR;
    Credentials::new(PRODUCT_ID, SYS_ID, private.as_str(), public.as_str())
        .and_then(|c| c.with_base_uri(base_uri))
        .expect("should build test credentials")
}

pub fn params(value: serde_json::Value) -> Params {
    value.as_object().cloned().expect("fixture must be a JSON object")
}

/// Transport that records every request and answers with a fixed response.
#[derive(Debug)]
pub struct SpyTransport {
    status: u16,
    body: Vec<u8>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl SpyTransport {
    pub fn new(status: u16, body: &str) -> Self {
        Self { status, body: body.as_bytes().to_vec(), requests: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().expect("lock poisoned").len()
    }

    pub fn last(&self) -> Option<TransportRequest> {
        self.requests.lock().expect("lock poisoned").last().cloned()
    }
}

impl Transport for SpyTransport {
    async fn send<'a>(&'a self, request: &'a TransportRequest) -> Result<TransportResponse> {
        self.requests.lock().expect("lock poisoned").push(request.clone());
        Ok(TransportResponse { status: self.status, body: self.body.clone(), headers: vec![] })
    }

    fn protocol_name(&self) -> &'static str {
        "spy"
    }
}
