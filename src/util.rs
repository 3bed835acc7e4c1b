//! Content hashing and signature verification shared by every component.
//!
//! Hashes are BLAKE2b-256 digests, public keys and signatures are Ed25519,
//! all of them encoded as unpadded base64url.

use blake2::{digest::consts::U32, Blake2b, Digest};
use data_encoding::BASE64URL_NOPAD;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

type Blake2b256 = Blake2b<U32>;

/// Hash `input` and return the base64url encoded digest
pub fn hash(input: &str) -> String {
    BASE64URL_NOPAD.encode(&hash_bytes(input.as_bytes()))
}

pub(crate) fn hash_bytes(input: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Blake2b256::digest(input));
    out
}

/// Verify `sig` over `data` under the given public key.
///
/// Anything that does not decode to a key or a signature is simply invalid.
pub fn verify_signature(public_key: &str, sig: &str, data: &str) -> bool {
    let Ok(key_bytes) = BASE64URL_NOPAD.decode(public_key.as_bytes()) else {
        return false;
    };
    let Ok(sig_bytes) = BASE64URL_NOPAD.decode(sig.as_bytes()) else {
        return false;
    };
    let Ok(key) = VerifyingKey::try_from(key_bytes.as_slice()) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(&sig_bytes) else {
        return false;
    };
    key.verify(data.as_bytes(), &signature).is_ok()
}
