//! [`User`] definitions.

use std::{str::FromStr, sync::LazyLock};

use derive_more::{AsRef, Display};
use regex::Regex;
use secrecy::{zeroize::Zeroize, CloneableSecret};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Identity of an authenticated employee.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct User {
    /// [`Name`] of this [`User`].
    pub name: Name,

    /// [`Username`] of this [`User`].
    pub username: Username,
}

/// Display name of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq, Serialize)]
#[as_ref(str)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        String::deserialize(d)?.parse().map_err(de::Error::custom)
    }
}

/// Username a [`User`] signs in with.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq, Serialize)]
#[as_ref(str)]
pub struct Username(String);

impl Username {
    /// Creates a new [`Username`] if the given `username` is valid.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Option<Self> {
        let username = username.into();
        Self::check(&username).then_some(Self(username))
    }

    /// Checks whether the given `username` is a valid [`Username`].
    fn check(username: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Username`] invariants:
        /// - Must not be empty;
        /// - Must not contain whitespace or control characters;
        /// - Must be at most 64 characters long.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^\s\p{Cc}]{1,64}$").expect("valid regex")
        });

        REGEX.is_match(username.as_ref())
    }
}

impl FromStr for Username {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Username`")
    }
}

impl<'de> Deserialize<'de> for Username {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        String::deserialize(d)?.parse().map_err(de::Error::custom)
    }
}

/// Password of a [`User`].
#[derive(Clone, Eq, PartialEq)]
pub struct Password(String);

impl Password {
    /// Creates a new [`Password`] if the given `password` is valid.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Returns the raw value of this [`Password`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks whether the given `password` is a valid [`Password`].
    fn check(password: impl AsRef<str>) -> bool {
        let password = password.as_ref();
        !password.is_empty() && password.len() <= 128
    }
}

impl FromStr for Password {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Password`")
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(test)]
mod spec {
    use super::{Name, Password, User, Username};

    #[test]
    fn validates_username() {
        assert!(Username::new("superadmin").is_some());
        assert!(Username::new("akhmad.maariz@company.com").is_some());

        assert!(Username::new("").is_none());
        assert!(Username::new("super admin").is_none());
        assert!(Username::new(" superadmin").is_none());
        assert!(Username::new("a".repeat(65)).is_none());
    }

    #[test]
    fn validates_name() {
        assert!(Name::new("Akhmad Maariz").is_some());
        assert!(Name::new(" Akhmad").is_none());
        assert!(Name::new("").is_none());
    }

    #[test]
    fn hides_password_in_debug() {
        let password = Password::new("aA@123").unwrap();
        assert_eq!(format!("{password:?}"), "Password(***)");
        assert!(Password::new("").is_none());
    }

    #[test]
    fn deserializes_identity() {
        let user: User = serde_json::from_str(
            r#"{"token":"t","name":"Akhmad Maariz","username":"superadmin"}"#,
        )
        .unwrap();
        assert_eq!(user.name.as_ref(), "Akhmad Maariz");
        assert_eq!(user.username.as_ref(), "superadmin");

        assert!(serde_json::from_str::<User>(
            r#"{"name":"","username":"superadmin"}"#,
        )
        .is_err());
    }
}
