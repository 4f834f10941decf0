// tests/key_ring_test.rs
mod common;

use std::thread;
use std::time::{Duration, SystemTime};

use pqc_tunnel::{CipherSuite, HandshakeEngine, KeyPolicy, KeyRing, Result, Role};

use common::tcp_pair;

#[test]
fn test_rotated_keys_still_finish_inflight_handshakes() -> Result<()> {
    let day = Duration::from_secs(86_400);
    let policy = KeyPolicy::new(day, 2 * day)?;
    let mut alice_ring = KeyRing::new(CipherSuite::lightweight(), policy)?;
    let mut bob_ring = KeyRing::new(CipherSuite::lightweight(), policy)?;

    let start = SystemTime::now();
    let alice_id = alice_ring.rotate_if_due(start)?.expect("first key");
    bob_ring.rotate_if_due(start)?;

    let (_, alice) = alice_ring.current().expect("alice key");
    let (_, bob) = bob_ring.current().expect("bob key");
    let alice_peer = bob.public_identity();
    let bob_peer = alice.public_identity();

    // Start a handshake, then rotate and expire Alice's key underneath it.
    let alice_engine = HandshakeEngine::new(alice, alice_peer)?;
    alice_ring.rotate_if_due(start + day)?;
    let expired = alice_ring.prune_expired(start + 3 * day);
    assert_eq!(expired, vec![alice_id]);
    assert_eq!(alice_ring.len(), 1);

    let (mut client, mut server) = tcp_pair();
    let responder = thread::spawn(move || {
        HandshakeEngine::new(bob, bob_peer)
            .expect("bob engine")
            .with_role(Role::Responder)
            .run(&mut server)
    });

    let mut alice_engine = alice_engine;
    let a = alice_engine.run(&mut client)?;
    let b = responder.join().expect("responder thread")?;
    assert_eq!(a, b);
    Ok(())
}

#[test]
fn test_new_key_has_new_identity() -> Result<()> {
    let mut ring = KeyRing::new(CipherSuite::lightweight(), KeyPolicy::default())?;
    let first = ring.generate()?;
    let second = ring.generate()?;

    let first_identity = ring.get(&first).expect("first").public_identity();
    let (current_id, current) = ring.current().expect("current");

    assert_eq!(current_id, second);
    assert_ne!(current.public_identity(), first_identity);
    assert_eq!(ring.ids().count(), 2);
    Ok(())
}
