use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Student {
    pub id: i64,
    pub number: String, // encoded in the student's QR badge
    pub name: String,
}
