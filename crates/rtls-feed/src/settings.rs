use serde::{Deserialize, Serialize};

/// Connection settings handed to the external feed client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSettings {
    /// Endpoint of the server's web-data stream.
    #[serde(default = "default_url")]
    pub url: String,
    /// Free-form text sent once the connection opens. The server does not interpret it.
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

fn default_url() -> String {
    "ws://localhost:2794/web_data".to_string()
}

fn default_greeting() -> String {
    "rtls-viewer".to_string()
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            greeting: default_greeting(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: FeedSettings = serde_json::from_str(r#"{"greeting": "hi"}"#).unwrap();
        assert_eq!(settings.url, "ws://localhost:2794/web_data");
        assert_eq!(settings.greeting, "hi");
    }
}
