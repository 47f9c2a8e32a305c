//! Random token, password and key-code generation.

use rand::Rng;

/// Number of random bytes in a generated token (hex-encoded to twice as many chars).
pub const TOKEN_BYTES: usize = 20;

/// Length used when a requested password length is too short.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Requested lengths below this are raised to [`MIN_PASSWORD_LENGTH`].
const PASSWORD_LENGTH_FLOOR: usize = 6;

/// Generate a random hex token from [`TOKEN_BYTES`] random bytes.
pub fn gen_random_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill(&mut bytes[..]);
    hex::encode(bytes)
}

/// Generate a random alphanumeric password of `length` characters.
///
/// Lengths below 6 are raised to [`MIN_PASSWORD_LENGTH`] with a warning.
pub fn gen_random_password(length: usize) -> String {
    let length = if length < PASSWORD_LENGTH_FLOOR {
        tracing::warn!(
            source = "KeysGenerator",
            requested = length,
            "The password length has been increased to {MIN_PASSWORD_LENGTH}"
        );
        MIN_PASSWORD_LENGTH
    } else {
        length
    };

    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Generate a random six-digit numeric code (`100000..=999999`).
pub fn gen_random_6_digits_key_code() -> String {
    rand::rng().random_range(100_000..=999_999u32).to_string()
}
