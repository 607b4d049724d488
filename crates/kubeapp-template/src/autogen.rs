//! Random tokens for `default:autogen` fields.

use kubeapp_common::constants::AUTOGEN_TOKEN_LENGTH;
use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// First character is a letter in `b..=z`.
const FIRST_CHAR_RANGE: std::ops::Range<usize> = 11..36;

/// Generates an autogen token: one letter in `b..=z` followed by seven
/// base-36 characters.
pub fn generate_token<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut token = String::with_capacity(AUTOGEN_TOKEN_LENGTH);
    token.push(char::from(BASE36[rng.gen_range(FIRST_CHAR_RANGE)]));
    for _ in 1..AUTOGEN_TOKEN_LENGTH {
        token.push(char::from(BASE36[rng.gen_range(0..BASE36.len())]));
    }
    token
}
