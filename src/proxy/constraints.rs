use hyper::http::request::Parts;

pub const REQUIRE_USERS_HEADER: &str = "AuthProxy-Require-Users";
pub const REQUIRE_GROUPS_HEADER: &str = "AuthProxy-Require-Groups";

/// Per-request restrictions layered on top of credential validity.
///
/// `None` means the request carried no such constraint; `Some(vec![])` is a
/// constraint that nothing satisfies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Constraints {
    pub require_users: Option<Vec<String>>,
    pub require_groups: Option<Vec<String>>,
}

impl Constraints {
    pub fn from_headers(parts: &Parts) -> Self {
        Self {
            require_users: header_list(parts, REQUIRE_USERS_HEADER),
            require_groups: header_list(parts, REQUIRE_GROUPS_HEADER),
        }
    }

    /// Whether an authenticated user belonging to `groups` satisfies these constraints.
    pub fn permits<S: AsRef<str>>(&self, username: &str, groups: &[S]) -> bool {
        if let Some(users) = &self.require_users {
            if !users.iter().any(|user| user == username) {
                return false;
            }
        }

        if let Some(required) = &self.require_groups {
            return groups
                .iter()
                .any(|group| required.iter().any(|r| r == group.as_ref()));
        }

        true
    }
}

// Non-ASCII bytes are kept lossily so that an unreadable value still
// constrains the request instead of disappearing.
fn header_list(parts: &Parts, name: &str) -> Option<Vec<String>> {
    parts
        .headers
        .get(name)
        .map(|value| parse_comma_list(&String::from_utf8_lossy(value.as_bytes())))
}

pub fn parse_comma_list(text: &str) -> Vec<String> {
    text.split(',').map(|s| s.trim().to_string()).collect()
}
