/// Answer of the identity service for a single credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub username: String,
    pub authorized: bool,
}

impl AuthenticatedIdentity {
    pub fn new(username: String, authorized: bool) -> Self {
        AuthenticatedIdentity {
            username,
            authorized,
        }
    }
}
