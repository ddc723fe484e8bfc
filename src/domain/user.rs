use serde::{Deserialize, Serialize};

/// The five actor roles of the marketplace. Closed set: a user carries exactly
/// one role, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Consumer,
    Restaurant,
    Grocery,
    Ngo,
    Admin,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Consumer,
        Role::Restaurant,
        Role::Grocery,
        Role::Ngo,
        Role::Admin,
    ];

    /// Restaurants and groceries list food; they are the redeeming side of an
    /// order.
    pub fn is_seller(self) -> bool {
        matches!(self, Role::Restaurant | Role::Grocery)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Consumer => "consumer",
            Role::Restaurant => "restaurant",
            Role::Grocery => "grocery",
            Role::Ngo => "ngo",
            Role::Admin => "admin",
        };
        f.write_str(name)
    }
}

/// Display and contact fields. The shape is the same for every role; nothing
/// in the core branches on profile contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub display_name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// A registered account, whichever side of the marketplace it is on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub role: Role,
    pub profile: UserProfile,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        role: Role,
        display_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            profile: UserProfile {
                display_name: display_name.into(),
                email: email.into(),
                phone: None,
            },
        }
    }
}
