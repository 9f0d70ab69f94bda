use fraud_engine::AnalyzerError;
use serde::de::DeserializeOwned;

/// Strip code fences and surrounding prose from an LLM reply, keeping the outermost JSON object.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let unfenced = unfenced.strip_suffix("```").unwrap_or(unfenced).trim();

    let start = unfenced.find('{')?;
    let end = unfenced.rfind('}')?;
    (start < end).then(|| &unfenced[start..=end])
}

pub fn parse_json_reply<T: DeserializeOwned>(raw: &str) -> Result<T, AnalyzerError> {
    let json = extract_json_object(raw)
        .ok_or_else(|| AnalyzerError::InvalidResponse(format!("No JSON object in reply: {}", raw)))?;
    serde_json::from_str(json).map_err(|e| {
        AnalyzerError::InvalidResponse(format!("Could not parse reply: {}. Raw response: {}", e, raw))
    })
}
