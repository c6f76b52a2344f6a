use std::sync::LazyLock;

use crate::errors::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};

static JWT_SECRET: LazyLock<String> =
    LazyLock::new(|| std::env::var("ECHOLOG_JWT_SECRET").unwrap_or_else(|_| "secret".to_string()));

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub id: String,
    pub exp: usize,
    pub iat: usize,
    pub iss: String,
}

pub fn encode_jwt(claim: &Claims) -> Result<String> {
    let token = encode(
        &Header::default(),
        claim,
        &EncodingKey::from_secret(JWT_SECRET.as_ref()),
    )?;
    Ok(token)
}

pub fn decode_jwt(token: &str) -> Result<TokenData<Claims>> {
    let token = decode::<Claims>(
        token,
        &DecodingKey::from_secret(JWT_SECRET.as_ref()),
        &Validation::default(),
    )?;

    Ok(token)
}
