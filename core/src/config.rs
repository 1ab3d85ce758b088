use serde::{Deserialize, Serialize};
use std::path::Path;

/// Query-time tunables. Defaults reproduce the reference ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Weight of the query title matched against document titles.
    pub title_weight: f64,
    /// Weight of the query description matched against document abstracts.
    pub description_weight: f64,
    /// Number of top-ranked documents whose classification codes seed expansion.
    pub expansion_depth: usize,
    /// Stripped from document ids when writing results.
    pub doc_id_suffix: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            title_weight: 0.05,
            description_weight: 0.95,
            expansion_depth: 20,
            doc_id_suffix: ".xml".to_string(),
        }
    }
}

impl SearchConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: SearchConfig = serde_json::from_str(r#"{"expansion_depth": 5}"#).unwrap();
        assert_eq!(cfg.expansion_depth, 5);
        assert_eq!(cfg.title_weight, 0.05);
        assert_eq!(cfg.doc_id_suffix, ".xml");
    }
}
