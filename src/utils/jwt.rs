use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use lazy_static::lazy_static;
use serde::{de::DeserializeOwned, Serialize};

lazy_static! {
    static ref HEADER: Header = Header::new(Algorithm::HS256);
    // only HS256 is accepted; exp is checked
    static ref VALIDATION: Validation = Validation::new(Algorithm::HS256);
}

/// Symmetric signing keys derived from the shared secret.
pub struct JwtKeys {
    ek: EncodingKey,
    dk: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            ek: EncodingKey::from_secret(secret),
            dk: DecodingKey::from_secret(secret),
        }
    }

    pub fn encode<T: Serialize>(&self, claims: &T) -> anyhow::Result<String> {
        Ok(jsonwebtoken::encode(&*HEADER, claims, &self.ek)?)
    }

    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, ErrorKind> {
        match jsonwebtoken::decode::<T>(token, &self.dk, &*VALIDATION) {
            Ok(res) => Ok(res.claims),
            Err(e) => Err(e.into_kind()),
        }
    }
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JwtKeys(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Claims {
        sub: String,
        exp: i64,
    }

    fn claims(offset: i64) -> Claims {
        Claims {
            sub: "u1".into(),
            exp: chrono::Utc::now().timestamp() + offset,
        }
    }

    #[test]
    fn round_trip_with_same_secret() {
        let keys = JwtKeys::from_secret(b"s3cret");
        let token = keys.encode(&claims(600)).unwrap();
        let back: Claims = keys.decode(&token).unwrap();
        assert_eq!(back.sub, "u1");
    }

    #[test]
    fn foreign_secret_is_rejected() {
        let token = JwtKeys::from_secret(b"other").encode(&claims(600)).unwrap();
        let err = JwtKeys::from_secret(b"s3cret").decode::<Claims>(&token).unwrap_err();
        assert!(matches!(err, ErrorKind::InvalidSignature));
    }

    #[test]
    fn other_algorithms_are_rejected() {
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims(600),
            &EncodingKey::from_secret(b"s3cret"),
        )
        .unwrap();
        let err = JwtKeys::from_secret(b"s3cret").decode::<Claims>(&token).unwrap_err();
        assert!(matches!(err, ErrorKind::InvalidAlgorithm));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let keys = JwtKeys::from_secret(b"s3cret");
        let token = keys.encode(&claims(-3600)).unwrap();
        assert!(matches!(keys.decode::<Claims>(&token), Err(ErrorKind::ExpiredSignature)));
    }
}
