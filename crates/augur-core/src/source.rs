use serde::{Deserialize, Serialize};

/// One piece of fetched research text about the forecasting question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_recent: Option<bool>,
    /// Search provider that returned this record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
}

impl SourceRecord {
    #[must_use]
    pub fn new(title: impl Into<String>, url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_relevance(mut self, relevance: f64) -> Self {
        self.relevance_score = Some(relevance);
        self
    }

    #[must_use]
    pub fn with_recent(mut self, recent: bool) -> Self {
        self.is_recent = Some(recent);
        self
    }

    #[must_use]
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.source = Some(provider.into());
        self
    }

    /// Title used in labels and attribution, `"Source N"` (1-based) when blank.
    #[must_use]
    pub fn display_title(&self, idx: usize) -> String {
        if self.title.trim().is_empty() {
            format!("Source {}", idx + 1)
        } else {
            self.title.clone()
        }
    }

    #[must_use]
    pub fn provider(&self) -> &str {
        self.source.as_deref().unwrap_or("Unknown")
    }
}

/// The forecasting question the graph is built around.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_date: Option<String>,
}

impl EventDescriptor {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Graph node id of the event, `"event"` when the descriptor carries none.
    #[must_use]
    pub fn node_id(&self) -> String {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => "event".to_string(),
        }
    }
}

/// Input bundle accepted by the command-line host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub event: EventDescriptor,
    #[serde(default)]
    pub sources: Vec<SourceRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_record_camel_case() {
        let json = r#"{"title":"T","url":"u","text":"x","relevanceScore":0.8,"isRecent":true,"source":"Exa AI"}"#;
        let record: SourceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.relevance_score, Some(0.8));
        assert_eq!(record.is_recent, Some(true));
        assert_eq!(record.provider(), "Exa AI");
    }

    #[test]
    fn test_display_title_fallback() {
        let record = SourceRecord::new("", "https://example.com", "text");
        assert_eq!(record.display_title(2), "Source 3");
        assert_eq!(SourceRecord::default().provider(), "Unknown");
    }

    #[test]
    fn test_event_node_id() {
        assert_eq!(EventDescriptor::new("Q").node_id(), "event");
        assert_eq!(EventDescriptor::new("Q").with_id("e1").node_id(), "e1");
        assert_eq!(EventDescriptor::new("Q").with_id("").node_id(), "event");
    }

    #[test]
    fn test_request_parses_without_sources() {
        let request: AnalysisRequest =
            serde_json::from_str(r#"{"event":{"id":"e1","title":"Will it rain?"}}"#).unwrap();
        assert!(request.sources.is_empty());
        assert_eq!(request.event.title, "Will it rain?");
    }
}
