use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Staff role, which fixes the permission set (see [`crate::permission`])
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
pub enum Role {
    Admin,
    Lawyer,
    Intern,
    Secretary,
}

impl Role {
    pub fn description(&self) -> &'static str {
        match self {
            Role::Admin => "System administrator",
            Role::Lawyer => "Lawyer",
            Role::Intern => "Intern",
            Role::Secretary => "Secretary",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct PersonalInfo {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Unique, stored trimmed and lowercased
    #[validate(email, length(max = 255))]
    pub email: String,
    /// Digits plus any punctuation; 10 or 11 digits once stripped
    pub phone: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub rg: String,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProfessionalInfo {
    /// Bar registration number, required to be unique for lawyers only
    #[serde(default)]
    #[validate(length(max = 20))]
    pub oab_number: String,
    /// Issuing state of the bar registration, e.g. `SP`
    #[serde(default)]
    #[validate(length(max = 2))]
    pub oab_state: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    pub hire_date: NaiveDate,
    #[serde(default)]
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supervisor_id: Option<Uuid>,
}

/// User entity as stored in the `users` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub personal_info: PersonalInfo,
    pub professional_info: ProfessionalInfo,
    pub role: Role,
    /// Argon2id PHC string
    pub password_hash: String,
    pub is_active: bool,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_lawyer(&self) -> bool {
        self.role == Role::Lawyer
    }

    /// Bar registration as `(number, state)`
    pub fn bar_registration(&self) -> (&str, &str) {
        (
            &self.professional_info.oab_number,
            &self.professional_info.oab_state,
        )
    }

    /// Merge the supplied fields of `update` onto this record.
    ///
    /// Password and timestamps are left to the service. Empty strings and
    /// empty lists never reach here as "supplied" values, see
    /// [`UpdateUser`].
    pub fn apply_update(&mut self, update: UpdateUser) {
        if let Some(personal) = update.personal_info {
            let info = &mut self.personal_info;
            if let Some(name) = personal.name {
                info.name = name;
            }
            if let Some(email) = personal.email {
                info.email = email;
            }
            if let Some(phone) = personal.phone {
                info.phone = phone;
            }
            if let Some(cpf) = personal.cpf {
                info.cpf = cpf;
            }
            if let Some(rg) = personal.rg {
                info.rg = rg;
            }
            if let Some(birth_date) = personal.birth_date {
                info.birth_date = birth_date;
            }
            if let Some(address) = personal.address {
                info.address = address;
            }
        }

        if let Some(professional) = update.professional_info {
            let info = &mut self.professional_info;
            if let Some(number) = professional.oab_number {
                info.oab_number = number;
            }
            if let Some(state) = professional.oab_state {
                info.oab_state = state;
            }
            if let Some(specialties) = professional.specialties.filter(|s| !s.is_empty()) {
                info.specialties = specialties;
            }
            if let Some(hire_date) = professional.hire_date {
                info.hire_date = hire_date;
            }
            if let Some(department) = professional.department {
                info.department = department;
            }
            if let Some(supervisor_id) = professional.supervisor_id {
                info.supervisor_id = Some(supervisor_id);
            }
        }

        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
    }
}

/// User as returned by the API, without the password hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub personal_info: PersonalInfo,
    pub professional_info: ProfessionalInfo,
    pub role: Role,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            personal_info: user.personal_info,
            professional_info: user.professional_info,
            role: user.role,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for creating a new user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(nested)]
    pub personal_info: PersonalInfo,
    #[validate(nested)]
    pub professional_info: ProfessionalInfo,
    pub role: Role,
    /// Plaintext; checked for strength and hashed before storage
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePersonalInfo {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(max = 200))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub cpf: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub rg: Option<String>,
    pub birth_date: Option<NaiveDate>,
    /// Replaces the whole address when supplied
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfessionalInfo {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(max = 20))]
    pub oab_number: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(max = 2))]
    pub oab_state: Option<String>,
    /// An empty list leaves the stored specialties untouched
    pub specialties: Option<Vec<String>>,
    pub hire_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub department: Option<String>,
    pub supervisor_id: Option<Uuid>,
}

/// Partial update: only supplied, non-empty fields overwrite the stored record
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(nested)]
    pub personal_info: Option<UpdatePersonalInfo>,
    #[validate(nested)]
    pub professional_info: Option<UpdateProfessionalInfo>,
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

/// Treat `""` (and whitespace-only strings) as an absent field
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Identity returned by a successful login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.personal_info.name.clone(),
            email: user.personal_info.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserSummary,
}

/// Query string of the permission check endpoint
#[derive(Debug, Clone, Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PermissionQuery {
    /// `users`, `cases`, `documents` or `reports`
    pub module: String,
    /// `create`, `read`, `update` or `delete`
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PermissionCheck {
    pub user_id: Uuid,
    pub module: String,
    pub action: String,
    pub allowed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_user;
    use serde_json::json;

    #[test]
    fn test_role_string_forms_agree() {
        assert_eq!(Role::Secretary.to_string(), "secretary");
        assert_eq!("lawyer".parse::<Role>().unwrap(), Role::Lawyer);
        assert!("partner".parse::<Role>().is_err());
        assert_eq!(serde_json::to_value(Role::Intern).unwrap(), json!("intern"));
    }

    #[test]
    fn test_unknown_role_is_rejected_on_deserialize() {
        let result: Result<Role, _> = serde_json::from_value(json!("partner"));
        assert!(result.is_err());
    }

    #[test]
    fn test_response_omits_password_hash() {
        let response = UserResponse::from(sample_user());
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["personal_info"]["email"], "ana@example.com");
    }

    #[test]
    fn test_stored_user_uses_mongo_id() {
        let user = sample_user();
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["_id"], json!(user.id));
        assert!(value.get("password_hash").is_some());
    }

    #[test]
    fn test_update_treats_empty_strings_as_absent() {
        let update: UpdateUser = serde_json::from_value(json!({
            "personal_info": { "name": "", "email": "  ", "phone": "11987654321" },
            "password": ""
        }))
        .unwrap();

        let personal = update.personal_info.as_ref().unwrap();
        assert!(personal.name.is_none());
        assert!(personal.email.is_none());
        assert_eq!(personal.phone.as_deref(), Some("11987654321"));
        assert!(update.password.is_none());
    }

    #[test]
    fn test_apply_update_merges_supplied_fields_only() {
        let mut user = sample_user();
        let original = user.clone();

        user.apply_update(UpdateUser {
            personal_info: Some(UpdatePersonalInfo {
                name: Some("Ana Lima".to_string()),
                ..Default::default()
            }),
            professional_info: Some(UpdateProfessionalInfo {
                specialties: Some(vec![]),
                department: Some("tax".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });

        assert_eq!(user.personal_info.name, "Ana Lima");
        assert_eq!(user.personal_info.email, original.personal_info.email);
        assert_eq!(user.professional_info.department, "tax");
        assert_eq!(
            user.professional_info.specialties,
            original.professional_info.specialties
        );
        assert_eq!(user.password_hash, original.password_hash);
        assert_eq!(user.created_at, original.created_at);
    }

    #[test]
    fn test_create_user_validation_is_nested() {
        let input: CreateUser = serde_json::from_value(json!({
            "personal_info": {
                "name": "Ana",
                "email": "not-an-email",
                "phone": "11987654321",
                "birth_date": "1990-04-12"
            },
            "professional_info": { "hire_date": "2020-02-01" },
            "role": "secretary",
            "password": "Secret#123"
        }))
        .unwrap();

        let errors = input.validate().unwrap_err();
        assert!(errors.to_string().contains("email"));
    }

    #[test]
    fn test_summary_from_user() {
        let user = sample_user();
        let summary = UserSummary::from(&user);
        assert_eq!(summary.id, user.id);
        assert_eq!(summary.role, Role::Lawyer);
    }
}
