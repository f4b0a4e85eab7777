use serde::Deserialize;

/// Error payload returned by the REST gateway on non-2xx responses.
#[derive(Deserialize, Debug, Default)]
pub struct StoreErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl StoreErrorBody {
    /// Human-readable summary of a raw error body; falls back to the body itself.
    pub fn describe(raw: &str) -> String {
        match serde_json::from_str::<StoreErrorBody>(raw) {
            Ok(body) if body.message.is_some() => {
                let mut out = body.message.unwrap_or_default();
                if let Some(code) = body.code {
                    out = format!("{} ({})", out, code);
                }
                if let Some(details) = body.details.filter(|d| !d.is_empty()) {
                    out.push_str(": ");
                    out.push_str(&details);
                }
                out
            }
            _ => raw.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_gateway_error() {
        let raw = r#"{"message":"relation \"public.nope\" does not exist","code":"42P01","details":null,"hint":null}"#;
        assert_eq!(
            StoreErrorBody::describe(raw),
            "relation \"public.nope\" does not exist (42P01)"
        );
    }

    #[test]
    fn falls_back_to_raw_text() {
        assert_eq!(StoreErrorBody::describe(" upstream timeout \n"), "upstream timeout");
    }
}
