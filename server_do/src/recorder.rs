use game_core::MatchResult;
use proto::MatchRecord;
use serde::Serialize;
use wasm_bindgen::JsValue;
use worker::*;

/// Request body for the match API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMatch {
    pub p1_id: u64,
    pub p2_id: u64,
    pub winner_id: u64,
    pub p1_score: u8,
    pub p2_score: u8,
    pub p1_class_id: u8,
    pub p2_class_id: u8,
}

impl From<&MatchResult> for NewMatch {
    fn from(result: &MatchResult) -> Self {
        Self {
            p1_id: result.p1_id,
            p2_id: result.p2_id,
            winner_id: result.winner_id,
            p1_score: result.p1_score,
            p2_score: result.p2_score,
            p1_class_id: result.p1_class_id,
            p2_class_id: result.p2_class_id,
        }
    }
}

/// Record built locally when the match API could not persist the result
pub fn unrecorded(result: &MatchResult) -> MatchRecord {
    MatchRecord {
        id: None,
        p1_id: result.p1_id,
        p2_id: result.p2_id,
        winner_id: result.winner_id,
        p1_score: result.p1_score,
        p2_score: result.p2_score,
        p1_class_id: result.p1_class_id,
        p2_class_id: result.p2_class_id,
    }
}

/// Persists finished matches through the match API
pub struct HttpRecorder {
    endpoint: String,
}

impl HttpRecorder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub async fn record(&self, result: &MatchResult) -> Result<MatchRecord> {
        let body = serde_json::to_string(&NewMatch::from(result))
            .map_err(|e| Error::RustError(format!("Failed to encode match: {e}")))?;

        let headers = Headers::new();
        headers.set("content-type", "application/json")?;

        let mut init = RequestInit::new();
        init.with_method(Method::Post);
        init.with_headers(headers);
        init.with_body(Some(JsValue::from_str(&body)));

        let request = Request::new_with_init(&self.endpoint, &init)?;
        let mut response = Fetch::Request(request).send().await?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(Error::RustError(format!(
                "Match API returned status {status}"
            )));
        }

        response.json::<MatchRecord>().await
    }
}
