// tests/known_answer_test.rs
mod common;

use std::sync::Arc;

use pqcrypto_dilithium::dilithium3;
use pqcrypto_kyber::kyber768;
use pqcrypto_traits::kem::{
    Ciphertext as _, PublicKey as _, SecretKey as _, SharedSecret as _,
};
use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _, SecretKey as _};

use pqc_tunnel::{
    CipherSuite, Handshake, HandshakeEngine, HandshakeState, KeyMaterial, Result,
};

use common::{FakeKem, FakeSigner, MemoryTransport, fake_primitives};

#[test]
fn test_wire_bytes_with_deterministic_primitives() -> Result<()> {
    // Key material with seed 1 for Alice and seed 2 for Bob.
    let primitives = fake_primitives(1);
    let alice = Arc::new(KeyMaterial::generate_with(&primitives)?);
    let bob = Arc::new(KeyMaterial::generate_with(&primitives)?);

    let bob_message = Handshake::new(Arc::clone(&bob), alice.public_identity(), primitives.clone())?
        .encapsulate()?
        .sign()?
        .message()
        .to_bytes();

    let mut engine =
        HandshakeEngine::new(Arc::clone(&alice), bob.public_identity())?.with_primitives(primitives)?;
    let mut transport = MemoryTransport::new(bob_message.clone());
    let secret = engine.run(&mut transport)?;

    // Alice encapsulates to Bob (seed 2) and signs with seed 1.
    let alice_ct = FakeKem::ciphertext_for(2);
    let mut expected = alice_ct.clone();
    expected.extend_from_slice(&FakeSigner::signature_for(1, &alice_ct));
    assert_eq!(transport.output, expected);
    assert_eq!(transport.output.len(), 1088 + 3309);

    let bob_ct = FakeKem::ciphertext_for(1);
    assert_eq!(&bob_message[..1088], bob_ct.as_slice());

    let local = FakeKem::secret_of(&alice_ct);
    let remote = FakeKem::secret_of(&bob_ct);
    let combined: Vec<u8> = local.iter().zip(remote.iter()).map(|(a, b)| a ^ b).collect();
    assert_eq!(secret.as_bytes(), combined.as_slice());
    assert_eq!(engine.state(), HandshakeState::Established);
    Ok(())
}

#[test]
fn test_wire_bytes_match_pqcrypto_directly() -> Result<()> {
    let alice = Arc::new(KeyMaterial::generate(CipherSuite::default())?);
    let bob = Arc::new(KeyMaterial::generate(CipherSuite::default())?);

    let alice_kem_pk = kyber768::PublicKey::from_bytes(alice.kem().public.as_bytes()).unwrap();
    let alice_vk = dilithium3::PublicKey::from_bytes(alice.signature().public.as_bytes()).unwrap();
    let bob_kem_sk = kyber768::SecretKey::from_bytes(bob.kem().secret.as_bytes()).unwrap();
    let bob_sk = dilithium3::SecretKey::from_bytes(bob.signature().secret.as_bytes()).unwrap();

    // Bob's message, built without the crate.
    let (bob_ss, bob_ct) = kyber768::encapsulate(&alice_kem_pk);
    let bob_sig = dilithium3::detached_sign(bob_ct.as_bytes(), &bob_sk);
    let mut incoming = bob_ct.as_bytes().to_vec();
    incoming.extend_from_slice(bob_sig.as_bytes());

    let mut engine = HandshakeEngine::new(Arc::clone(&alice), bob.public_identity())?;
    let mut transport = MemoryTransport::new(incoming);
    let secret = engine.run(&mut transport)?;

    let (ct_bytes, sig_bytes) = transport.output.split_at(kyber768::ciphertext_bytes());
    assert_eq!(sig_bytes.len(), dilithium3::signature_bytes());

    let signature = dilithium3::DetachedSignature::from_bytes(sig_bytes).unwrap();
    assert!(dilithium3::verify_detached_signature(&signature, ct_bytes, &alice_vk).is_ok());

    let alice_ct = kyber768::Ciphertext::from_bytes(ct_bytes).unwrap();
    let alice_ss = kyber768::decapsulate(&alice_ct, &bob_kem_sk);

    let expected: Vec<u8> = alice_ss
        .as_bytes()
        .iter()
        .zip(bob_ss.as_bytes())
        .map(|(a, b)| a ^ b)
        .collect();
    assert_eq!(secret.as_bytes(), expected.as_slice());
    Ok(())
}
