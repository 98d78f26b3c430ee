//! Visibility and ownership policy for shaders.
//!
//! Decided in code, before any content is returned or mutation applied; the
//! storage layer fetches rows without filtering on visibility.

use crate::wgsltoy::{error::Error, identity::CallerIdentity};

pub const VISIBILITY_PRIVATE: &str = "private";
pub const VISIBILITY_UNLISTED: &str = "unlisted";
pub const VISIBILITY_PUBLIC: &str = "public";

/// Access tier of a shader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Private,
    Unlisted,
    Public,
}

impl Visibility {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            VISIBILITY_PRIVATE => Some(Self::Private),
            VISIBILITY_UNLISTED => Some(Self::Unlisted),
            VISIBILITY_PUBLIC => Some(Self::Public),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => VISIBILITY_PRIVATE,
            Self::Unlisted => VISIBILITY_UNLISTED,
            Self::Public => VISIBILITY_PUBLIC,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// Decide whether `caller` may perform `access` on a shader owned by `owner`.
///
/// The owner may do anything. For everyone else a private shader must be
/// indistinguishable from a non-existent one, so the denial is `NotFound`,
/// never a forbidden-style answer that confirms existence. Unlisted and
/// public shaders are readable by anyone; writes by a non-owner are
/// `Unauthorized`.
pub fn authorize(
    caller: &CallerIdentity,
    owner: &str,
    visibility: Visibility,
    access: Access,
) -> Result<(), Error> {
    let is_owner = caller.user().is_some_and(|user| user.id == owner);
    if is_owner {
        return Ok(());
    }

    match (visibility, access) {
        (Visibility::Private, _) => Err(Error::NotFound),
        (_, Access::Read) => Ok(()),
        (_, Access::Write) => Err(Error::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wgsltoy::identity::UserInfo;

    fn alice() -> CallerIdentity {
        CallerIdentity::authenticated(UserInfo {
            id: "alice".to_string(),
        })
    }

    fn bob() -> CallerIdentity {
        CallerIdentity::authenticated(UserInfo {
            id: "bob".to_string(),
        })
    }

    #[test]
    fn test_private_shader_hidden_from_non_owners() {
        for caller in [CallerIdentity::anonymous(), bob()] {
            assert!(matches!(
                authorize(&caller, "alice", Visibility::Private, Access::Read),
                Err(Error::NotFound)
            ));
            assert!(matches!(
                authorize(&caller, "alice", Visibility::Private, Access::Write),
                Err(Error::NotFound)
            ));
        }
    }

    #[test]
    fn test_owner_has_full_access() {
        for visibility in [Visibility::Private, Visibility::Unlisted, Visibility::Public] {
            assert!(authorize(&alice(), "alice", visibility, Access::Read).is_ok());
            assert!(authorize(&alice(), "alice", visibility, Access::Write).is_ok());
        }
    }

    #[test]
    fn test_public_and_unlisted_readable_by_anyone() {
        for visibility in [Visibility::Unlisted, Visibility::Public] {
            for caller in [CallerIdentity::anonymous(), bob()] {
                assert!(authorize(&caller, "alice", visibility, Access::Read).is_ok());
            }
        }
    }

    #[test]
    fn test_non_owner_write_is_unauthorized() {
        for visibility in [Visibility::Unlisted, Visibility::Public] {
            for caller in [CallerIdentity::anonymous(), bob()] {
                assert!(matches!(
                    authorize(&caller, "alice", visibility, Access::Write),
                    Err(Error::Unauthorized)
                ));
            }
        }
    }

    #[test]
    fn test_visibility_parse_roundtrip() {
        for visibility in [Visibility::Private, Visibility::Unlisted, Visibility::Public] {
            assert_eq!(Visibility::parse(visibility.as_str()), Some(visibility));
        }
        assert_eq!(Visibility::parse("hidden"), None);
        assert_eq!(Visibility::parse(""), None);
    }
}
