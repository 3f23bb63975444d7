#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    SuperAdmin = 1,
    Admin = 2,
    Employee = 3,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::SuperAdmin),
            2 => Some(Role::Admin),
            3 => Some(Role::Employee),
            _ => None,
        }
    }

    /// Admins and super-admins review requests.
    pub fn is_reviewer(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}
