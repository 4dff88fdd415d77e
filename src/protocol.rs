//! Request/response DTOs of the retos REST API (serde ready), plus the raw
//! creation form the user fills in before anything is sent.

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Notice shown when any creation field is empty.
pub const MISSING_FIELDS_NOTICE: &str = "Por favor completa todos los campos";

//
// HTTP request/response DTOs
//

#[derive(Debug, Serialize)]
pub struct NewChallengeIn {
    pub titulo: String,
    pub descripcion: String,
    pub id_categoria: i64,
    pub id_dificultad: i64,
    pub id_estado: i64,
}

#[derive(Debug, Serialize)]
pub struct NewCategoryIn {
    pub nombre: String,
}

#[derive(Debug, Serialize)]
pub struct StateUpdateIn {
    pub id_estado: i64,
}

/// Error body the backend sends with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorOut {
    pub error: String,
}

/// `{mensaje}` body of `GET /` and `DELETE /retos/:id`.
#[derive(Debug, Deserialize)]
pub struct MessageOut {
    pub mensaje: String,
}

/// Server-side filter for `GET /retos`. `None` fields are omitted from the query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RemoteFilter {
    #[serde(rename = "categoria", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(rename = "dificultad", skip_serializing_if = "Option::is_none")]
    pub difficulty_id: Option<i64>,
}

impl RemoteFilter {
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none() && self.difficulty_id.is_none()
    }
}

/// Creation form as typed by the user: five raw text fields.
#[derive(Clone, Debug, Default)]
pub struct ChallengeForm {
    pub title: String,
    pub description: String,
    pub category_name: String,
    pub difficulty_id: String,
    pub state_id: String,
}

/// A form that passed client-side validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidChallengeForm {
    pub title: String,
    pub description: String,
    pub category_name: String,
    pub difficulty_id: i64,
    pub state_id: i64,
}

impl ChallengeForm {
    /// Trim every field and require all five to be present. Ids must be integers
    /// since they echo values the server issued.
    pub fn validate(&self) -> Result<ValidChallengeForm> {
        let title = self.title.trim();
        let description = self.description.trim();
        let category_name = self.category_name.trim();
        let difficulty = self.difficulty_id.trim();
        let state = self.state_id.trim();

        if [title, description, category_name, difficulty, state].iter().any(|f| f.is_empty()) {
            return Err(ClientError::Validation(MISSING_FIELDS_NOTICE.into()));
        }

        let difficulty_id = parse_id(difficulty, "dificultad")?;
        let state_id = parse_id(state, "estado")?;

        Ok(ValidChallengeForm {
            title: title.to_string(),
            description: description.to_string(),
            category_name: category_name.to_string(),
            difficulty_id,
            state_id,
        })
    }
}

fn parse_id(raw: &str, field: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|_| ClientError::Validation(format!("Valor inválido para {field}: {raw}")))
}
