//! Contact block lines

use crate::model::Identity;

/// Shorten a social profile URL to `@handle`
///
/// One trailing slash is stripped and the last path segment is used.
/// `https://linkedin.com/in/janedoe/` becomes `@janedoe`.
pub fn social_handle(url: &str) -> String {
    let url = url.strip_suffix('/').unwrap_or(url);
    let handle = match url.rfind('/') {
        Some(idx) => &url[idx + 1..],
        None => url,
    };
    format!("@{}", handle)
}

/// Contact rows in display order; absent fields produce no row
pub fn contact_lines(identity: &Identity) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(email) = &identity.email {
        lines.push(format!("Email: {}", email));
    }
    if let Some(phone) = &identity.phone {
        lines.push(format!("Phone: {}", phone));
    }
    if let Some(website) = &identity.website {
        lines.push(format!("Website: {}", website));
    }
    if let Some(linkedin) = &identity.linkedin_url {
        lines.push(format!("LinkedIn: {}", social_handle(linkedin)));
    }
    if let Some(github) = &identity.github_url {
        lines.push(format!("GitHub: {}", social_handle(github)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_social_handle() {
        assert_eq!(social_handle("https://linkedin.com/in/janedoe/"), "@janedoe");
        assert_eq!(social_handle("https://github.com/jdoe"), "@jdoe");
        assert_eq!(social_handle("jdoe"), "@jdoe");
        // only one slash is stripped
        assert_eq!(social_handle("https://github.com/jdoe//"), "@");
    }

    #[test]
    fn test_contact_lines_order_and_presence() {
        let identity = Identity {
            email: Some("jane@example.com".into()),
            github_url: Some("https://github.com/jdoe/".into()),
            linkedin_url: Some("https://linkedin.com/in/janedoe/".into()),
            ..Default::default()
        };
        assert_eq!(
            contact_lines(&identity),
            vec![
                "Email: jane@example.com",
                "LinkedIn: @janedoe",
                "GitHub: @jdoe",
            ]
        );
        assert!(contact_lines(&Identity::default()).is_empty());
    }
}
