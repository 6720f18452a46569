use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered principals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalId(pub String);

/// Capabilities a principal may hold. Not mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employer,
    Candidate,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Employer => "employer",
            Self::Candidate => "candidate",
        }
    }
}

/// Set-valued role capability. A principal may hold both roles, one, or
/// neither; a zero-role principal can authenticate but performs no catalog
/// or ledger writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Role>", into = "Vec<Role>")]
pub struct RoleSet {
    employer: bool,
    candidate: bool,
}

impl RoleSet {
    pub const fn empty() -> Self {
        Self {
            employer: false,
            candidate: false,
        }
    }

    pub const fn contains(self, role: Role) -> bool {
        match role {
            Role::Employer => self.employer,
            Role::Candidate => self.candidate,
        }
    }

    pub const fn is_empty(self) -> bool {
        !self.employer && !self.candidate
    }

    pub fn insert(&mut self, role: Role) {
        match role {
            Role::Employer => self.employer = true,
            Role::Candidate => self.candidate = true,
        }
    }
}

impl From<Vec<Role>> for RoleSet {
    fn from(roles: Vec<Role>) -> Self {
        let mut set = Self::empty();
        for role in roles {
            set.insert(role);
        }
        set
    }
}

impl From<RoleSet> for Vec<Role> {
    fn from(set: RoleSet) -> Self {
        let mut roles = Vec::new();
        if set.employer {
            roles.push(Role::Employer);
        }
        if set.candidate {
            roles.push(Role::Candidate);
        }
        roles
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = Self::empty();
        for role in iter {
            set.insert(role);
        }
        set
    }
}

/// Company details attached to a principal holding the employer role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerProfile {
    pub company_name: String,
}

/// An authenticated actor with zero or more role capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub email: String,
    pub credential_hash: String,
    pub roles: RoleSet,
    pub employer_profile: Option<EmployerProfile>,
}

impl Principal {
    /// Pure role predicate consumed by the catalog, ledger, and query layer.
    pub const fn has_role(&self, role: Role) -> bool {
        self.roles.contains(role)
    }

    pub fn public_view(&self) -> PrincipalView {
        PrincipalView {
            id: self.id.clone(),
            email: self.email.clone(),
            roles: self.roles,
            employer_profile: self.employer_profile.clone(),
        }
    }
}

/// Public fields of a principal, safe to cross the system boundary.
#[derive(Debug, Clone, Serialize)]
pub struct PrincipalView {
    pub id: PrincipalId,
    pub email: String,
    pub roles: RoleSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_profile: Option<EmployerProfile>,
}
