//! Semantic version syntax check.
//!
//! Follows the rules Go modules apply to version strings:
//! - `vMAJOR.MINOR.PATCH` with optional `-prerelease` and `+build`
//! - shorthand `vMAJOR` and `vMAJOR.MINOR` (no suffixes allowed)
//! - numeric parts carry no leading zeros
//!
//! The leading `v` is optional.

/// Returns true if `version` is a syntactically valid semantic version.
pub fn is_valid_semver(version: &str) -> bool {
    let rest = version.strip_prefix('v').unwrap_or(version);

    let Some(rest) = take_number(rest) else {
        return false;
    };
    if rest.is_empty() {
        return true;
    }
    let Some(rest) = rest.strip_prefix('.').and_then(take_number) else {
        return false;
    };
    if rest.is_empty() {
        return true;
    }
    let Some(mut rest) = rest.strip_prefix('.').and_then(take_number) else {
        return false;
    };

    if let Some(pre) = rest.strip_prefix('-') {
        let (ids, tail) = split_suffix(pre);
        if !ids.split('.').all(is_prerelease_ident) {
            return false;
        }
        rest = tail;
    }
    if let Some(build) = rest.strip_prefix('+') {
        if !build.split('.').all(is_build_ident) {
            return false;
        }
        rest = "";
    }
    rest.is_empty()
}

/// Consume a numeric component, returning the remainder.
fn take_number(s: &str) -> Option<&str> {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || (digits > 1 && s.starts_with('0')) {
        return None;
    }
    Some(&s[digits..])
}

/// Split a pre-release section from a trailing `+build` section.
fn split_suffix(s: &str) -> (&str, &str) {
    match s.find('+') {
        Some(idx) => (&s[..idx], &s[idx..]),
        None => (s, ""),
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

fn is_prerelease_ident(id: &str) -> bool {
    if id.is_empty() || !id.chars().all(is_ident_char) {
        return false;
    }
    let numeric = id.bytes().all(|b| b.is_ascii_digit());
    !(numeric && id.len() > 1 && id.starts_with('0'))
}

fn is_build_ident(id: &str) -> bool {
    !id.is_empty() && id.chars().all(is_ident_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_versions() {
        for v in [
            "v0.0.1",
            "v1.2.3",
            "1.2.3",
            "v1",
            "v1.2",
            "v10.20.30",
            "v1.0.0-alpha",
            "v1.0.0-alpha.1",
            "v1.0.0-0.3.7",
            "v1.0.0-x.7.z.92",
            "v1.0.0+20130313144700",
            "v1.0.0-beta+exp.sha.5114f85",
            "v0.0.0-20190102223222-abcdef123456",
            "v2.0.0+incompatible",
        ] {
            assert!(is_valid_semver(v), "{v} should be valid");
        }
    }

    #[test]
    fn test_invalid_versions() {
        for v in [
            "",
            "v",
            "latest",
            "list",
            "v01.2.3",
            "v1.02.3",
            "v1.2.03",
            "v1.2.3.4",
            "v1.2-pre",
            "v1-pre",
            "v1.2.3-",
            "v1.2.3-01",
            "v1.2.3-a..b",
            "v1.2.3+",
            "v1.2.3+a..b",
            "v1.2.3-a_b",
            "vv1.2.3",
            "v1.2.3 ",
        ] {
            assert!(!is_valid_semver(v), "{v:?} should be invalid");
        }
    }
}
