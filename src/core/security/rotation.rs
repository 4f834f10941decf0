/*!
Key rotation for long-term key material.

The [`KeyRing`] keeps generated [`KeyMaterial`] under random key ids and
applies a time-based [`KeyPolicy`]: a fresh current key once the rotation
interval has passed, and revocation of keys older than the maximum age.
Handshakes hold their own `Arc` to the key they started with, so revoking a
key never disturbs an attempt in flight; its secrets are wiped once the last
reference drops.
*/

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tracing::{debug, info};

use crate::core::constants::{defaults, sizes::KEY_ID_BYTES};
use crate::core::crypto::{CipherSuite, Primitives};
use crate::core::error::{Error, Result};
use crate::core::keys::KeyMaterial;

/// Random identifier of a key in the ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyId([u8; KEY_ID_BYTES]);

impl KeyId {
    /// Draw a fresh random id
    pub fn random() -> Self {
        Self(rand::random())
    }

    pub fn from_bytes(bytes: [u8; KEY_ID_BYTES]) -> Self {
        Self(bytes)
    }

    /// Parse the lowercase hex form produced by `Display`
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| Error::Config(format!("invalid key id: {}", e)))?;
        let bytes: [u8; KEY_ID_BYTES] = bytes
            .try_into()
            .map_err(|_| Error::Config(format!("key id must be {} bytes", KEY_ID_BYTES)))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_ID_BYTES] {
        &self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// When keys are rotated and revoked.
///
/// With `serde-support` the policy (de)serializes as whole seconds under
/// `key_rotation_interval` and `max_key_age`, and is validated on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "policy_file::PolicyFile", into = "policy_file::PolicyFile")
)]
pub struct KeyPolicy {
    /// Age after which a new current key is generated
    pub rotation_interval: Duration,
    /// Age after which a key is revoked
    pub max_key_age: Duration,
}

impl Default for KeyPolicy {
    fn default() -> Self {
        Self {
            rotation_interval: Duration::from_secs(defaults::KEY_ROTATION_INTERVAL_SECONDS),
            max_key_age: Duration::from_secs(defaults::MAX_KEY_AGE_SECONDS),
        }
    }
}

impl KeyPolicy {
    pub fn new(rotation_interval: Duration, max_key_age: Duration) -> Result<Self> {
        let policy = Self { rotation_interval, max_key_age };
        policy.validate()?;
        Ok(policy)
    }

    /// Reject policies that would rotate constantly or revoke the current key
    /// before its replacement is due.
    pub fn validate(&self) -> Result<()> {
        if self.rotation_interval.is_zero() {
            return Err(Error::Config("key_rotation_interval must be greater than zero".into()));
        }
        if self.max_key_age < self.rotation_interval {
            return Err(Error::Config(
                "max_key_age must not be shorter than key_rotation_interval".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(feature = "serde-support")]
mod policy_file {
    use std::path::Path;
    use std::time::Duration;

    use serde::{Deserialize, Serialize};

    use super::KeyPolicy;
    use crate::core::constants::defaults;
    use crate::core::error::{Error, Result};

    // On-disk shape: whole seconds, unknown keys ignored.
    #[derive(Debug, Serialize, Deserialize)]
    pub(super) struct PolicyFile {
        #[serde(default = "default_rotation_interval")]
        key_rotation_interval: u64,
        #[serde(default = "default_max_key_age")]
        max_key_age: u64,
    }

    fn default_rotation_interval() -> u64 {
        defaults::KEY_ROTATION_INTERVAL_SECONDS
    }

    fn default_max_key_age() -> u64 {
        defaults::MAX_KEY_AGE_SECONDS
    }

    impl TryFrom<PolicyFile> for KeyPolicy {
        type Error = Error;

        fn try_from(file: PolicyFile) -> Result<Self> {
            KeyPolicy::new(
                Duration::from_secs(file.key_rotation_interval),
                Duration::from_secs(file.max_key_age),
            )
        }
    }

    impl From<KeyPolicy> for PolicyFile {
        fn from(policy: KeyPolicy) -> Self {
            Self {
                key_rotation_interval: policy.rotation_interval.as_secs(),
                max_key_age: policy.max_key_age.as_secs(),
            }
        }
    }

    impl KeyPolicy {
        /// Parse a policy from JSON
        pub fn from_json_str(json: &str) -> Result<Self> {
            serde_json::from_str(json).map_err(|e| Error::Config(format!("invalid key policy: {}", e)))
        }

        /// Serialize the policy to JSON
        pub fn to_json_string(&self) -> Result<String> {
            serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
        }

        /// Load a policy from a JSON file; a missing file yields the defaults
        pub fn load(path: impl AsRef<Path>) -> Result<Self> {
            let path = path.as_ref();
            if !path.exists() {
                tracing::debug!(path = %path.display(), "key policy file not found, using defaults");
                return Ok(KeyPolicy::default());
            }
            let json = std::fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
            Self::from_json_str(&json)
        }
    }
}

struct Entry {
    material: Arc<KeyMaterial>,
    created_at: SystemTime,
}

/// In-memory registry of long-term key material
pub struct KeyRing {
    primitives: Primitives,
    policy: KeyPolicy,
    keys: HashMap<KeyId, Entry>,
    current: Option<KeyId>,
}

impl KeyRing {
    /// Create an empty ring generating keys for `suite`
    pub fn new(suite: CipherSuite, policy: KeyPolicy) -> Result<Self> {
        Self::with_primitives(Primitives::for_suite(suite), policy)
    }

    /// Create an empty ring generating keys with custom primitives
    pub fn with_primitives(primitives: Primitives, policy: KeyPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            primitives,
            policy,
            keys: HashMap::new(),
            current: None,
        })
    }

    pub fn policy(&self) -> &KeyPolicy {
        &self.policy
    }

    pub fn suite(&self) -> CipherSuite {
        self.primitives.suite()
    }

    /// Generate a key created now and make it current
    pub fn generate(&mut self) -> Result<KeyId> {
        self.generate_at(SystemTime::now())
    }

    fn generate_at(&mut self, created_at: SystemTime) -> Result<KeyId> {
        let material = Arc::new(KeyMaterial::generate_with(&self.primitives)?);
        let mut id = KeyId::random();
        while self.keys.contains_key(&id) {
            id = KeyId::random();
        }

        self.keys.insert(id, Entry { material, created_at });
        self.current = Some(id);
        info!(key_id = %id, suite = %self.suite(), "generated key material");
        Ok(id)
    }

    /// The current key and its id
    pub fn current(&self) -> Option<(KeyId, Arc<KeyMaterial>)> {
        let id = self.current?;
        self.keys.get(&id).map(|e| (id, Arc::clone(&e.material)))
    }

    pub fn get(&self, id: &KeyId) -> Option<Arc<KeyMaterial>> {
        self.keys.get(id).map(|e| Arc::clone(&e.material))
    }

    /// When `id` was generated
    pub fn created_at(&self, id: &KeyId) -> Option<SystemTime> {
        self.keys.get(id).map(|e| e.created_at)
    }

    pub fn ids(&self) -> impl Iterator<Item = &KeyId> {
        self.keys.keys()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn age(created_at: SystemTime, now: SystemTime) -> Duration {
        // A clock that went backwards counts as a fresh key.
        now.duration_since(created_at).unwrap_or(Duration::ZERO)
    }

    /// Generate a new current key if there is none or it is due for rotation.
    ///
    /// Returns the id of the new key, or `None` if no rotation happened. The
    /// previous key stays available through [`KeyRing::get`] until it expires.
    pub fn rotate_if_due(&mut self, now: SystemTime) -> Result<Option<KeyId>> {
        let due = match self.current.and_then(|id| self.keys.get(&id)) {
            Some(entry) => Self::age(entry.created_at, now) >= self.policy.rotation_interval,
            None => true,
        };

        if !due {
            return Ok(None);
        }
        debug!("current key due for rotation");
        self.generate_at(now).map(Some)
    }

    /// Revoke every key older than the maximum age and return their ids
    pub fn prune_expired(&mut self, now: SystemTime) -> Vec<KeyId> {
        let expired: Vec<KeyId> = self
            .keys
            .iter()
            .filter(|(_, e)| Self::age(e.created_at, now) > self.policy.max_key_age)
            .map(|(id, _)| *id)
            .collect();

        for id in &expired {
            self.revoke(id);
        }
        expired
    }

    /// Remove a key from the ring. Returns whether it was present.
    pub fn revoke(&mut self, id: &KeyId) -> bool {
        let removed = self.keys.remove(id).is_some();
        if removed {
            if self.current == Some(*id) {
                self.current = None;
            }
            info!(key_id = %id, "revoked key material");
        }
        removed
    }
}

impl fmt::Debug for KeyRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyRing")
            .field("suite", &self.suite())
            .field("policy", &self.policy)
            .field("keys", &self.keys.len())
            .field("current", &self.current)
            .finish()
    }
}
