// Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{self, Cursor, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use pqc_tunnel::{
    AuthError, CipherSuite, Error, KemAlgorithm, KeyExchange, KeyMaterial, Primitives, Result,
    Signature, SignatureAlgorithm, Transport,
};

/// Two independent parties for `suite`
pub fn key_pair(suite: CipherSuite) -> (Arc<KeyMaterial>, Arc<KeyMaterial>) {
    (
        Arc::new(KeyMaterial::generate(suite).expect("alice keys")),
        Arc::new(KeyMaterial::generate(suite).expect("bob keys")),
    )
}

/// A connected pair of loopback TCP streams
pub fn tcp_pair() -> (TcpStream, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let client = TcpStream::connect(addr).expect("connect");
    let (server, _) = listener.accept().expect("accept");
    (client, server)
}

/// Scripted transport: reads from `input`, records writes and closing
pub struct MemoryTransport {
    pub input: Cursor<Vec<u8>>,
    pub output: Vec<u8>,
    pub closed: bool,
}

impl MemoryTransport {
    pub fn new(input: Vec<u8>) -> Self {
        Self {
            input: Cursor::new(input),
            output: Vec::new(),
            closed: false,
        }
    }
}

impl Read for MemoryTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for MemoryTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for MemoryTransport {
    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// Echoes every written byte back to the reader
#[derive(Default)]
pub struct Loopback {
    buffer: VecDeque<u8>,
    pub closed: bool,
}

impl Read for Loopback {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.buffer.read(buf)
    }
}

impl Write for Loopback {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for Loopback {
    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }
}

fn sha256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Deterministic stand-in for Kyber768.
///
/// Key pair `n` is filled with byte `n`. A ciphertext to key `n` is filled
/// with `n ^ 0x5a` and its shared secret is the SHA-256 of the ciphertext.
#[derive(Debug)]
pub struct FakeKem {
    next_seed: AtomicU8,
}

impl FakeKem {
    pub const CIPHERTEXT_MASK: u8 = 0x5a;

    pub fn new(first_seed: u8) -> Self {
        Self { next_seed: AtomicU8::new(first_seed) }
    }

    /// Ciphertext the fake produces for a public key filled with `seed`
    pub fn ciphertext_for(seed: u8) -> Vec<u8> {
        vec![seed ^ Self::CIPHERTEXT_MASK; KemAlgorithm::Kyber768.ciphertext_size()]
    }

    /// Shared secret carried by `ciphertext`
    pub fn secret_of(ciphertext: &[u8]) -> [u8; 32] {
        sha256(&[ciphertext])
    }
}

impl KeyExchange for FakeKem {
    fn generate_keypair(&self) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>)> {
        let seed = self.next_seed.fetch_add(1, Ordering::SeqCst);
        let alg = self.algorithm();
        Ok((
            vec![seed; alg.public_key_size()],
            Zeroizing::new(vec![seed; alg.secret_key_size()]),
        ))
    }

    fn encapsulate(&self, public_key: &[u8]) -> Result<(Zeroizing<Vec<u8>>, Vec<u8>)> {
        let ciphertext = Self::ciphertext_for(public_key[0]);
        let secret = Self::secret_of(&ciphertext).to_vec();
        Ok((Zeroizing::new(secret), ciphertext))
    }

    fn decapsulate(&self, ciphertext: &[u8], secret_key: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let secret = if ciphertext[0] ^ Self::CIPHERTEXT_MASK == secret_key[0] {
            Self::secret_of(ciphertext)
        } else {
            sha256(&[b"reject", ciphertext])
        };
        Ok(Zeroizing::new(secret.to_vec()))
    }

    fn algorithm(&self) -> KemAlgorithm {
        KemAlgorithm::Kyber768
    }
}

/// Deterministic stand-in for Dilithium3.
///
/// Key pair `n` is filled with byte `n`. A signature is SHA-256(n || data)
/// padded with `n` to the Dilithium3 signature size.
#[derive(Debug)]
pub struct FakeSigner {
    next_seed: AtomicU8,
}

impl FakeSigner {
    pub fn new(first_seed: u8) -> Self {
        Self { next_seed: AtomicU8::new(first_seed) }
    }

    /// Signature the fake produces over `data` with key `seed`
    pub fn signature_for(seed: u8, data: &[u8]) -> Vec<u8> {
        let mut signature = vec![seed; SignatureAlgorithm::Dilithium3.signature_size()];
        signature[..32].copy_from_slice(&sha256(&[&[seed], data]));
        signature
    }
}

impl Signature for FakeSigner {
    fn generate_keypair(&self) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>)> {
        let seed = self.next_seed.fetch_add(1, Ordering::SeqCst);
        let alg = self.algorithm();
        Ok((
            vec![seed; alg.public_key_size()],
            Zeroizing::new(vec![seed; alg.secret_key_size()]),
        ))
    }

    fn sign(&self, data: &[u8], secret_key: &[u8]) -> Result<Vec<u8>> {
        Ok(Self::signature_for(secret_key[0], data))
    }

    fn verify(&self, data: &[u8], signature: &[u8], public_key: &[u8]) -> Result<()> {
        if signature == Self::signature_for(public_key[0], data).as_slice() {
            Ok(())
        } else {
            Err(Error::Authentication(AuthError::SignatureVerificationFailed))
        }
    }

    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::Dilithium3
    }
}

/// Fake primitives whose first generated key pair uses `first_seed`
pub fn fake_primitives(first_seed: u8) -> Primitives {
    Primitives::new(
        Arc::new(FakeKem::new(first_seed)),
        Arc::new(FakeSigner::new(first_seed)),
    )
}
