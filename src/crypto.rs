use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub fn get_digest(secret: &[u8], val: &[u8]) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(secret).expect("hmac accepts any key size");
    mac.update(val);

    mac.finalize().into_bytes().to_vec()
}

/// Constant-time comparison of `digest` against the HMAC of `val`.
pub fn is_valid(secret: &[u8], val: &[u8], digest: &[u8]) -> bool {
    let mut mac =
        HmacSha256::new_from_slice(secret).expect("hmac accepts any key size");
    mac.update(val);

    mac.verify_slice(digest).is_ok()
}
