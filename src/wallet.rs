use crate::util::hash_bytes;
use data_encoding::BASE64URL_NOPAD;
use ed25519_dalek::{Signer, SigningKey};
use std::fmt::{Debug, Formatter, Result};

/// Ed25519 key pair of this node. The encoded public key doubles as the node identity.
pub struct Wallet {
    signing_key: SigningKey,
    public_key: String,
}

impl Wallet {
    /// Derive the key pair from a node secret
    pub fn from_secret(secret: &str) -> Self {
        let signing_key = SigningKey::from_bytes(&hash_bytes(secret.as_bytes()));
        let public_key = BASE64URL_NOPAD.encode(signing_key.verifying_key().as_bytes());
        Self {
            signing_key,
            public_key,
        }
    }

    /// Sign `data`, returning the encoded signature
    pub fn sign(&self, data: &str) -> String {
        BASE64URL_NOPAD.encode(&self.signing_key.sign(data.as_bytes()).to_bytes())
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Identity used to namespace this node's block store
    pub fn identity(&self) -> &str {
        &self.public_key
    }
}

impl Debug for Wallet {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "Wallet {{ {:?} }}", self.public_key)
    }
}
