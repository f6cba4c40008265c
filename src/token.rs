use rand::Rng;

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const KEY_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

const ID_LEN: usize = 12;
const KEY_LEN: usize = 32;

fn random_chars(alphabet: &[u8], len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}

/// Opaque entity id: `prefix` + `_` + 12 chars of `[a-z0-9]`.
pub fn generate_id(prefix: &str) -> String {
    format!("{prefix}_{}", random_chars(ID_ALPHABET, ID_LEN))
}

/// Bearer-shaped invite key: `ak_` + 32 chars of `[A-Za-z0-9]`.
pub fn generate_key() -> String {
    format!("ak_{}", random_chars(KEY_ALPHABET, KEY_LEN))
}
