use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoverLetterRequest {
    pub job_title: String,
    pub company_name: String,
    pub job_description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetter {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    pub job_title: String,
    pub company_name: String,
    #[serde(default)]
    pub job_description: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
