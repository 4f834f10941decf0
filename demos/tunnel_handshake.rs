//! Two parties on loopback TCP, each holding a key ring, agree on a session
//! secret and print a fingerprint of a derived key.
//!
//! Run with `RUST_LOG=pqc_tunnel=debug` to watch the state transitions.

use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::SystemTime;

use tracing_subscriber::EnvFilter;

use pqc_tunnel::{CipherSuite, Error, HandshakeEngine, KeyPolicy, KeyRing, Result, Role};

#[cfg(feature = "serde-support")]
fn policy() -> Result<KeyPolicy> {
    match std::env::var("PQC_KEY_POLICY") {
        Ok(path) => KeyPolicy::load(path),
        Err(_) => Ok(KeyPolicy::default()),
    }
}

#[cfg(not(feature = "serde-support"))]
fn policy() -> Result<KeyPolicy> {
    Ok(KeyPolicy::default())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let suite = CipherSuite::default();
    println!("PQC Tunnel Handshake");
    println!("suite: {} ({} byte messages)", suite, suite.wire_message_size());

    let policy = policy()?;
    let now = SystemTime::now();
    let mut client_ring = KeyRing::new(suite, policy)?;
    let mut server_ring = KeyRing::new(suite, policy)?;
    client_ring.rotate_if_due(now)?;
    server_ring.rotate_if_due(now)?;

    let empty = || Error::Config("key ring is empty".into());
    let (client_id, client_keys) = client_ring.current().ok_or_else(empty)?;
    let (server_id, server_keys) = server_ring.current().ok_or_else(empty)?;
    println!("client key: {}", client_id);
    println!("server key: {}", server_id);

    // Identities are exchanged out of band.
    let client_sees = server_keys.public_identity();
    let server_sees = client_keys.public_identity();

    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;

    let server = thread::spawn(move || -> Result<[u8; 32]> {
        let (mut stream, peer) = listener.accept()?;
        println!("server: connection from {}", peer);
        let secret = HandshakeEngine::new(server_keys, server_sees)?
            .with_role(Role::Responder)
            .run(&mut stream)?;
        Ok(*secret.derive_key(b"demo")?)
    });

    let mut stream = TcpStream::connect(addr)?;
    let secret = HandshakeEngine::new(client_keys, client_sees)?.run(&mut stream)?;
    let client_key = secret.derive_key(b"demo")?;

    let server_key = match server.join() {
        Ok(result) => result?,
        Err(_) => return Err(Error::Config("server thread panicked".into())),
    };

    println!("client fingerprint: {}", hex::encode(&client_key[..8]));
    println!("server fingerprint: {}", hex::encode(&server_key[..8]));
    println!("keys match: {}", client_key[..] == server_key[..]);
    Ok(())
}
