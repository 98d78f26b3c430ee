//! Input validation for registration and shader payloads.

use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

use crate::wgsltoy::{authz::Visibility, error::Error, guid};

// 5 to 15 chars, first one is a letter, rest are alphanumeric, -, _, .
static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[[:alpha:]][[:alnum:]\-_.]{4,14}$").expect("valid regex"));

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[[:alnum:]]+$").expect("valid regex"));

// Displayable single-line and multi-line text: letters, marks, numbers,
// punctuation, symbols plus the allowed whitespace.
static DISPLAY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\pL\pM\pN\pP\pS ]+$").expect("valid regex"));

static DISPLAY_MULTILINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\pL\pM\pN\pP\pS\s]+$").expect("valid regex"));

/// Potentially abusive usernames that may never be registered.
const USERNAME_BLACKLIST: &[&str] = &[
    "about",
    "access",
    "account",
    "accounts",
    "address",
    "admin",
    "administration",
    "advertising",
    "affiliate",
    "affiliates",
    "analytics",
    "anonymous",
    "archive",
    "authentication",
    "backup",
    "banner",
    "banners",
    "billing",
    "business",
    "careers",
    "contact",
    "contest",
    "dashboard",
    "delete",
    "deleteme",
    "deleted",
    "download",
    "downloads",
    "favorite",
    "feedback",
    "guest",
    "information",
    "mailer",
    "mailing",
    "manager",
    "marketing",
    "newsletter",
    "operator",
    "password",
    "postmaster",
    "project",
    "projects",
    "random",
    "register",
    "registration",
    "settings",
    "subscribe",
    "support",
    "supportsystem",
    "username",
    "website",
    "websites",
    "webmaster",
    "webmail",
    "yourname",
    "yourusername",
    "yoursite",
    "yourdomain",
];

const PASSWORD_MIN_CHARS: usize = 10;
const NAME_MAX_CHARS: usize = 160;
const DESCRIPTION_MAX_CHARS: usize = 480;
const CONTENT_MAX_CHARS: usize = 5250;
const TAG_MIN_CHARS: usize = 3;
const TAG_MAX_CHARS: usize = 10;

pub fn validate_username(username: &str) -> Result<(), Error> {
    if username.is_empty() {
        return Err(Error::Validation("Field 'username' is required!".to_string()));
    }

    if !USERNAME_REGEX.is_match(username) {
        return Err(Error::Validation("Supplied username is not valid!".to_string()));
    }

    for banned in USERNAME_BLACKLIST {
        if username.eq_ignore_ascii_case(banned) {
            warn!("Banned username attempted: {banned}");
            return Err(Error::Validation(
                "Supplied username is not permitted!".to_string(),
            ));
        }
    }

    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), Error> {
    if email.is_empty() {
        return Err(Error::Validation("Field 'email' is required!".to_string()));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(Error::Validation("Supplied email is not valid!".to_string()));
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), Error> {
    if password.is_empty() {
        return Err(Error::Validation("Field 'password' is required!".to_string()));
    }

    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(Error::Validation("Supplied password is too short!".to_string()));
    }

    Ok(())
}

pub fn validate_shader_name(name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::Validation("Field 'name' is required!".to_string()));
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(Error::Validation("Field 'name' is too long!".to_string()));
    }
    if !DISPLAY_REGEX.is_match(name) {
        return Err(Error::Validation(
            "Field 'name' contains invalid characters!".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_shader_visibility(visibility: &str) -> Result<(), Error> {
    if visibility.is_empty() {
        return Err(Error::Validation("Field 'visibility' is required!".to_string()));
    }
    if Visibility::parse(visibility).is_none() {
        return Err(Error::Validation(
            "Field 'visibility' must be one of 'private', 'unlisted' or 'public'!".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_shader_description(description: &str) -> Result<(), Error> {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(Error::Validation("Field 'description' is too long!".to_string()));
    }
    if !description.is_empty() && !DISPLAY_MULTILINE_REGEX.is_match(description) {
        return Err(Error::Validation(
            "Field 'description' contains invalid characters!".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_shader_content(content: &str) -> Result<(), Error> {
    if content.chars().count() > CONTENT_MAX_CHARS {
        return Err(Error::Validation("Field 'content' is too long!".to_string()));
    }
    if !content.is_empty() && !DISPLAY_MULTILINE_REGEX.is_match(content) {
        return Err(Error::Validation(
            "Field 'content' contains invalid characters!".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_shader_tags(tags: &[String]) -> Result<(), Error> {
    for (idx, tag) in tags.iter().enumerate() {
        if tag.is_empty() {
            return Err(Error::Validation(format!("Field 'tags[{idx}]' is empty!")));
        }
        let chars = tag.chars().count();
        if chars < TAG_MIN_CHARS {
            return Err(Error::Validation(format!("Field 'tags[{idx}]' is too short!")));
        }
        if chars > TAG_MAX_CHARS {
            return Err(Error::Validation(format!("Field 'tags[{idx}]' is too long!")));
        }
        if !TAG_REGEX.is_match(tag) {
            return Err(Error::Validation(format!(
                "Field 'tags[{idx}]' contains invalid characters!"
            )));
        }
    }
    Ok(())
}

/// Sanitize an externally supplied fork reference before it is trusted in a
/// query. Empty means "not a fork" and is fine.
pub fn validate_forked_from(forked_from: &str) -> Result<(), Error> {
    if !forked_from.is_empty() && !guid::validate(forked_from) {
        return Err(Error::Validation("Field 'forkedFrom' is invalid!".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("shadertoyfan").is_ok());
        assert!(validate_username("a-b_c.dd").is_ok());

        assert!(validate_username("").is_err());
        assert!(validate_username("abcd").is_err()); // too short
        assert!(validate_username("abcdefghijklmnop").is_err()); // too long
        assert!(validate_username("1leading").is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn test_banned_usernames_rejected_case_insensitively() {
        assert!(validate_username("admin").is_err());
        assert!(validate_username("Admin").is_err());
        assert!(validate_username("WEBMASTER").is_err());
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(validate_password("").is_err());
        assert!(validate_password("short").is_err());
        assert!(validate_password("123456789").is_err());
        assert!(validate_password("1234567890").is_ok());
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a b@example.com").is_err());
    }

    #[test]
    fn test_shader_name_rules() {
        assert!(validate_shader_name("Plasma Vortex ✨").is_ok());
        assert!(validate_shader_name("").is_err());
        assert!(validate_shader_name(&"x".repeat(161)).is_err());
        assert!(validate_shader_name("line\nbreak").is_err());
    }

    #[test]
    fn test_shader_visibility_rules() {
        assert!(validate_shader_visibility("private").is_ok());
        assert!(validate_shader_visibility("unlisted").is_ok());
        assert!(validate_shader_visibility("public").is_ok());
        assert!(validate_shader_visibility("").is_err());
        assert!(validate_shader_visibility("hidden").is_err());
    }

    #[test]
    fn test_shader_content_allows_multiline() {
        assert!(validate_shader_content("fn main() {\n    return;\n}").is_ok());
        assert!(validate_shader_content("").is_ok());
        assert!(validate_shader_content(&"x".repeat(5251)).is_err());
    }

    #[test]
    fn test_tag_rules() {
        assert!(validate_shader_tags(&["raymarch".to_string(), "sdf3d".to_string()]).is_ok());
        assert!(validate_shader_tags(&[]).is_ok());
        assert!(validate_shader_tags(&[String::new()]).is_err());
        assert!(validate_shader_tags(&["ab".to_string()]).is_err());
        assert!(validate_shader_tags(&["elevenchars".to_string()]).is_err());
        assert!(validate_shader_tags(&["with-dash".to_string()]).is_err());
        assert!(validate_shader_tags(&["with space".to_string()]).is_err());
    }

    #[test]
    fn test_tags_accept_any_alphanumeric() {
        // Case and a leading digit are both fine.
        assert!(validate_shader_tags(&["GLSL".to_string()]).is_ok());
        assert!(validate_shader_tags(&["3d1".to_string()]).is_ok());
        assert!(validate_shader_tags(&["RayMarch".to_string()]).is_ok());
    }

    #[test]
    fn test_forked_from_must_be_guid() {
        assert!(validate_forked_from("").is_ok());
        assert!(validate_forked_from(&guid::new()).is_ok());
        assert!(validate_forked_from("not-a-guid").is_err());
    }
}
