use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub session_id: String,
    pub exp: usize,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Invalid session token: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Token lifetime of {0} hours is out of range")]
    Lifetime(i64),
}

pub fn generate_token(session_id: &str, secret: &str, ttl_hours: i64) -> Result<String, TokenError> {
    let expiration = Duration::try_hours(ttl_hours)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .and_then(|expires_at| usize::try_from(expires_at.timestamp()).ok())
        .ok_or(TokenError::Lifetime(ttl_hours))?;

    let new_claims = Claims {
        session_id: session_id.to_string(),
        exp: expiration,
    };
    Ok(encode(
        &Header::default(),
        &new_claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

pub fn decode_token(token: &str, secret: &str) -> Result<TokenData<Claims>, TokenError> {
    Ok(decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )?)
}
