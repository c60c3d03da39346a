use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "selfquiz";
const CONFIG_FILE: &str = "config.json";
const HISTORY_LIMIT: usize = 10;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserConfig {
    pub bank_file: Option<PathBuf>,
    pub file_history: Vec<(String, i64)>,
}

impl UserConfig {
    fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::path().ok_or("no config directory on this platform")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn remember_bank(&mut self, path: PathBuf) {
        let name = path.display().to_string();
        let timestamp = chrono::Utc::now().timestamp();
        self.file_history.retain(|(f, _)| f != &name);
        self.file_history.insert(0, (name, timestamp));
        if self.file_history.len() > HISTORY_LIMIT {
            self.file_history.truncate(HISTORY_LIMIT);
        }
        self.bank_file = Some(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remember_bank_moves_repeats_to_the_front() {
        let mut config = UserConfig::default();
        config.remember_bank(PathBuf::from("a.json"));
        config.remember_bank(PathBuf::from("b.json"));
        config.remember_bank(PathBuf::from("a.json"));

        assert_eq!(config.bank_file, Some(PathBuf::from("a.json")));
        let names: Vec<&str> = config.file_history.iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn history_is_capped() {
        let mut config = UserConfig::default();
        for i in 0..15 {
            config.remember_bank(PathBuf::from(format!("bank-{}.json", i)));
        }
        assert_eq!(config.file_history.len(), HISTORY_LIMIT);
        assert_eq!(config.file_history[0].0, "bank-14.json");
    }
}
