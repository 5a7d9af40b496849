use serde::{Deserialize, Serialize};
use skywatch::assistant::ChatMessage;
use skywatch::forecast::ForecastPoint;
use skywatch::shell::LocationCard;

#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub id: Option<String>,
}

impl SelectionRequest {
    pub fn into_id(self) -> Result<String, String> {
        let id = self.id.unwrap_or_default().trim().to_string();
        if id.is_empty() {
            return Err("id is required".to_string());
        }
        Ok(id)
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: Option<String>,
    pub location_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ItineraryRequest {
    pub location_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LocationsResponse {
    pub filter: String,
    pub locations: Vec<LocationCard>,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub id: String,
    pub name: String,
    pub points: Vec<ForecastPoint>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub history: Vec<ChatMessage>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ItineraryResponse {
    pub location_id: String,
    pub plan: String,
    pub warnings: Vec<String>,
}

pub fn assistant_warnings(ai_configured: bool) -> Vec<String> {
    if ai_configured {
        Vec::new()
    } else {
        vec!["AI assistant not configured: set GEMINI_API_KEY".to_string()]
    }
}
