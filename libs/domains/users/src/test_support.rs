//! Fixtures shared by the unit tests of this crate

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{Address, CreateUser, PersonalInfo, ProfessionalInfo, Role, User};

pub(crate) const STRONG_PASSWORD: &str = "Secret#123";

pub(crate) fn personal_info(email: &str) -> PersonalInfo {
    PersonalInfo {
        name: "Ana Souza".to_string(),
        email: email.to_string(),
        phone: "(11) 98765-4321".to_string(),
        cpf: "123.456.789-09".to_string(),
        rg: "12.345.678-9".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
        address: Address {
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            ..Default::default()
        },
    }
}

pub(crate) fn professional_info(oab_number: &str, oab_state: &str) -> ProfessionalInfo {
    ProfessionalInfo {
        oab_number: oab_number.to_string(),
        oab_state: oab_state.to_string(),
        specialties: vec!["civil".to_string()],
        hire_date: NaiveDate::from_ymd_opt(2020, 2, 1).unwrap(),
        department: "litigation".to_string(),
        supervisor_id: None,
    }
}

pub(crate) fn create_input(email: &str, role: Role) -> CreateUser {
    CreateUser {
        personal_info: personal_info(email),
        professional_info: professional_info("123456", "SP"),
        role,
        password: STRONG_PASSWORD.to_string(),
    }
}

/// A stored lawyer with a placeholder hash
pub(crate) fn sample_user() -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        personal_info: personal_info("ana@example.com"),
        professional_info: professional_info("123456", "SP"),
        role: Role::Lawyer,
        password_hash: "$argon2id$stub".to_string(),
        is_active: true,
        last_login_at: None,
        created_at: now,
        updated_at: now,
    }
}
