//! Static role policy.
//!
//! Every role maps to a fixed list of `(module, actions)` grants. The table
//! below is the only place permissions are decided; nothing is persisted.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use utoipa::ToSchema;

use crate::models::Role;

/// Area of the application a permission applies to
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Module {
    Users,
    Cases,
    Documents,
    Reports,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

/// Actions a role may perform on one module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Permission {
    pub module: Module,
    pub actions: &'static [Action],
}

impl Permission {
    const fn new(module: Module, actions: &'static [Action]) -> Self {
        Self { module, actions }
    }

    pub fn allows(&self, module: Module, action: Action) -> bool {
        self.module == module && self.actions.contains(&action)
    }
}

const CRUD: &[Action] = &[Action::Create, Action::Read, Action::Update, Action::Delete];
const CRU: &[Action] = &[Action::Create, Action::Read, Action::Update];
const CR: &[Action] = &[Action::Create, Action::Read];
const R: &[Action] = &[Action::Read];

static ADMIN: &[Permission] = &[
    Permission::new(Module::Users, CRUD),
    Permission::new(Module::Cases, CRUD),
    Permission::new(Module::Documents, CRUD),
    Permission::new(Module::Reports, CRUD),
];

static LAWYER: &[Permission] = &[
    Permission::new(Module::Cases, CRU),
    Permission::new(Module::Documents, CRU),
];

static INTERN: &[Permission] = &[
    Permission::new(Module::Cases, R),
    Permission::new(Module::Documents, CR),
];

static SECRETARY: &[Permission] = &[
    Permission::new(Module::Cases, R),
    Permission::new(Module::Documents, R),
];

impl Role {
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::Admin => ADMIN,
            Role::Lawyer => LAWYER,
            Role::Intern => INTERN,
            Role::Secretary => SECRETARY,
        }
    }

    pub fn can(&self, module: Module, action: Action) -> bool {
        self.permissions().iter().any(|p| p.allows(module, action))
    }
}

/// One row of the policy as exposed over HTTP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ModuleGrant {
    pub module: Module,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RolePermissions {
    pub role: Role,
    pub description: String,
    pub permissions: Vec<ModuleGrant>,
}

impl From<Role> for RolePermissions {
    fn from(role: Role) -> Self {
        Self {
            role,
            description: role.description().to_string(),
            permissions: role
                .permissions()
                .iter()
                .map(|p| ModuleGrant {
                    module: p.module,
                    actions: p.actions.to_vec(),
                })
                .collect(),
        }
    }
}

/// The whole table, one entry per role
pub fn all_role_permissions() -> Vec<RolePermissions> {
    Role::iter().map(RolePermissions::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_can_do_everything() {
        for module in Module::iter() {
            for action in Action::iter() {
                assert!(Role::Admin.can(module, action), "admin {module} {action}");
            }
        }
    }

    #[test]
    fn test_intern_reads_cases_only() {
        assert!(Role::Intern.can(Module::Cases, Action::Read));
        assert!(!Role::Intern.can(Module::Cases, Action::Create));
        assert!(!Role::Intern.can(Module::Cases, Action::Delete));
        assert!(Role::Intern.can(Module::Documents, Action::Create));
    }

    #[test]
    fn test_lawyer_cannot_delete_or_touch_users() {
        assert!(Role::Lawyer.can(Module::Cases, Action::Update));
        assert!(Role::Lawyer.can(Module::Documents, Action::Create));
        assert!(!Role::Lawyer.can(Module::Cases, Action::Delete));
        assert!(!Role::Lawyer.can(Module::Users, Action::Read));
        assert!(!Role::Lawyer.can(Module::Reports, Action::Read));
    }

    #[test]
    fn test_secretary_is_read_only() {
        assert!(Role::Secretary.can(Module::Cases, Action::Read));
        assert!(Role::Secretary.can(Module::Documents, Action::Read));
        assert!(!Role::Secretary.can(Module::Documents, Action::Update));
        assert!(!Role::Secretary.can(Module::Users, Action::Read));
    }

    #[test]
    fn test_unknown_role_name_has_no_policy() {
        assert!("partner".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_module_and_action_parse_lowercase() {
        assert_eq!("documents".parse::<Module>().unwrap(), Module::Documents);
        assert_eq!("delete".parse::<Action>().unwrap(), Action::Delete);
        assert!("billing".parse::<Module>().is_err());
    }

    #[test]
    fn test_exposed_table_matches_policy() {
        let table = all_role_permissions();
        assert_eq!(table.len(), 4);

        let intern = table.iter().find(|r| r.role == Role::Intern).unwrap();
        assert_eq!(intern.permissions.len(), 2);
        assert_eq!(intern.permissions[0].module, Module::Cases);
        assert_eq!(intern.permissions[0].actions, vec![Action::Read]);
    }
}
