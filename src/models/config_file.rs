use serde::{Deserialize, Serialize};
use std::fmt;

/// A shell configuration file tracked by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Absolute path of the file.
    pub path: String,

    /// Service-assigned identifier, 0–255.
    pub id: u8,
}

impl fmt::Display for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.path)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn fields_serialize_path_first() {
        let file = ConfigFile {
            path: "/home/me/.zshrc".to_string(),
            id: 3,
        };
        assert_eq!(
            serde_json::to_string(&file).unwrap(),
            r#"{"path":"/home/me/.zshrc","id":3}"#
        );
        assert_eq!(file.to_string(), "#3 /home/me/.zshrc");
    }

    #[test]
    fn id_is_limited_to_a_byte() {
        let ok: ConfigFile = serde_json::from_value(json!({ "path": "/a", "id": 255 })).unwrap();
        assert_eq!(ok.id, 255);

        assert!(serde_json::from_value::<ConfigFile>(json!({ "path": "/a", "id": 256 })).is_err());
        assert!(serde_json::from_value::<ConfigFile>(json!({ "path": "/a", "id": -1 })).is_err());
        assert!(serde_json::from_value::<ConfigFile>(json!({ "id": 1 })).is_err());
    }
}
