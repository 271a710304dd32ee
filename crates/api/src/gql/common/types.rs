#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Role {
    Admin,
    Moderator,
    Member,
}

impl Role {
    /// Moderators may see the identity behind anonymous requests and act on
    /// requests they do not own.
    pub fn is_moderator(&self) -> bool {
        matches!(self, Role::Admin | Role::Moderator)
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        match role.as_str() {
            "admin" => Role::Admin,
            "moderator" => Role::Moderator,
            _ => Role::Member, // Unknown roles get the least privilege
        }
    }
}
