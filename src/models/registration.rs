use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationSource {
    Manual,
    Scan,
}

impl RegistrationSource {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RegistrationSource::Manual => "manual",
            RegistrationSource::Scan => "scan",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "manual" => Some(RegistrationSource::Manual),
            "scan" => Some(RegistrationSource::Scan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub id: i64,
    pub student_id: i64,
    pub event_id: i64,
    pub source: RegistrationSource,
    pub created_at: String,
}
