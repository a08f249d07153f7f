use crate::AuthzError;
use serde::{Deserialize, Serialize};

/// Closed set of principal roles.
///
/// Roles are mutually exclusive per principal and fixed when the credential is
/// issued. The wire names are the strings carried in the credential's `role`
/// claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Tenant owner (an agent) with every owner-grantable right.
    #[serde(rename = "agent")]
    PrimaryOwner,
    /// Staff member acting under an owner with an individually granted list.
    #[serde(rename = "agent_member")]
    Delegate,
    /// Traveller with fixed, minimal rights.
    #[serde(rename = "traveller")]
    EndUser,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::PrimaryOwner, Role::Delegate, Role::EndUser];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::PrimaryOwner => "agent",
            Role::Delegate => "agent_member",
            Role::EndUser => "traveller",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "agent" => Ok(Role::PrimaryOwner),
            "agent_member" => Ok(Role::Delegate),
            "traveller" => Ok(Role::EndUser),
            _ => Err(AuthzError::UnknownRole(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Role;

    #[test]
    fn role_string_roundtrip() {
        for role in Role::ALL {
            let as_str = role.as_str();
            assert_eq!(as_str.parse::<Role>().ok(), Some(role));
            assert_eq!(role.to_string(), as_str);
        }
    }

    #[test]
    fn role_from_str_rejects_unknown() {
        assert!("admin".parse::<Role>().is_err());
        assert!("AGENT".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn role_serde_uses_wire_names() {
        let json = serde_json::to_string(&Role::Delegate).expect("serialize");
        assert_eq!(json, "\"agent_member\"");
        let parsed: Role = serde_json::from_str("\"traveller\"").expect("deserialize");
        assert_eq!(parsed, Role::EndUser);
    }
}
