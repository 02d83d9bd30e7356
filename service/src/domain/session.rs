//! [`Session`] definitions.

use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::User;

/// Authenticated employee context held between a login and a logout.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Session {
    /// Access [`Token`] of this [`Session`].
    pub token: Token,

    /// [`User`] this [`Session`] belongs to.
    pub user: User,
}

/// Opaque access token of a [`Session`].
///
/// Never empty.
#[derive(Clone, Eq, PartialEq)]
pub struct Token(String);

impl Token {
    /// Creates a new [`Token`] if the given `token` is not blank.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        (!token.trim().is_empty() && !token.contains(char::is_whitespace))
            .then_some(Self(token))
    }

    /// Exposes the raw value of this [`Token`].
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

impl FromStr for Token {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Token`")
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        String::deserialize(d)?.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod spec {
    use super::Token;

    #[test]
    fn rejects_blank_tokens() {
        assert!(Token::new("mock-jwt-token").is_some());
        assert!(Token::new("").is_none());
        assert!(Token::new("   ").is_none());
        assert!(Token::new("two parts").is_none());
    }

    #[test]
    fn hides_token_in_debug() {
        let token = Token::new("secret").unwrap();
        assert_eq!(format!("{token:?}"), "Token(***)");
        assert_eq!(token.expose(), "secret");
    }
}
