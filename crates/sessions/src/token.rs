use rand::RngCore;

const TOKEN_BYTES: usize = 16;

/// Opaque login token, 128 random bits hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Generate a fresh unguessable session token.
pub fn generate_token() -> SessionToken {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    SessionToken(hex::encode(bytes))
}
