use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Case status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CaseStatus {
    #[default]
    Open,
    InProgress,
    Suspended,
    Closed,
}

/// Legal case handled by the office, stored in the `cases` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Case {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: CaseStatus,
    /// Client the case is handled for
    pub client_id: Uuid,
    /// Responsible lawyer
    pub lawyer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewCase {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: CaseStatus,
    pub client_id: Uuid,
    pub lawyer_id: Uuid,
}

impl Case {
    pub fn new(input: NewCase) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: input.title,
            description: input.description,
            status: input.status,
            client_id: input.client_id,
            lawyer_id: input.lawyer_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// File attached to a case, stored in the `documents` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Document {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Where the file content lives
    pub url: String,
    pub case_id: Uuid,
    /// User who uploaded the document
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewDocument {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(url)]
    pub url: String,
    pub case_id: Uuid,
    pub created_by: Uuid,
}

impl Document {
    pub fn new(input: NewDocument) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: input.title,
            description: input.description,
            url: input.url,
            case_id: input.case_id,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_case_defaults_to_open() {
        let input: NewCase = serde_json::from_value(json!({
            "title": "Silva v. Banco Central",
            "client_id": Uuid::now_v7(),
            "lawyer_id": Uuid::now_v7()
        }))
        .unwrap();

        let case = Case::new(input);
        assert_eq!(case.status, CaseStatus::Open);
        assert_eq!(case.created_at, case.updated_at);
        assert!(case.description.is_empty());
    }

    #[test]
    fn test_case_status_wire_format() {
        assert_eq!(
            serde_json::to_value(CaseStatus::InProgress).unwrap(),
            json!("in_progress")
        );
        assert_eq!("suspended".parse::<CaseStatus>().unwrap(), CaseStatus::Suspended);
    }

    #[test]
    fn test_stored_case_uses_mongo_id() {
        let case = Case::new(NewCase {
            title: "Inventário".to_string(),
            description: String::new(),
            status: CaseStatus::Open,
            client_id: Uuid::now_v7(),
            lawyer_id: Uuid::now_v7(),
        });

        let value = serde_json::to_value(&case).unwrap();
        assert_eq!(value["_id"], json!(case.id));

        let back: Case = serde_json::from_value(value).unwrap();
        assert_eq!(back, case);
    }

    #[test]
    fn test_new_document_validation() {
        let input = NewDocument {
            title: String::new(),
            description: String::new(),
            url: "not a url".to_string(),
            case_id: Uuid::now_v7(),
            created_by: Uuid::now_v7(),
        };

        let errors = input.validate().unwrap_err().to_string();
        assert!(errors.contains("title"));
        assert!(errors.contains("url"));
    }
}
