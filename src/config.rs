use std::{fs, path::PathBuf};

/// Interpreter configuration loaded from `~/.config/minibash/config`.
/// `prompt = "..."` overrides the prompt text; every other non-comment line
/// is a startup command dispatched once at boot.
pub struct Config {
    pub prompt: Option<String>,
    pub startup: Vec<String>,
}

fn config_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_default().join(".config/minibash")
}

pub fn config_file_path() -> PathBuf {
    config_dir().join("config")
}

pub fn history_file_path() -> PathBuf {
    config_dir().join("history")
}

pub fn init() -> Config {
    let path = config_file_path();
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if !path.exists() {
        let default = "# minibash configuration\n# prompt = \"minibash$ \"\n";
        let _ = fs::write(&path, default);
    }
    parse_config(&fs::read_to_string(&path).unwrap_or_default())
}

fn parse_config(content: &str) -> Config {
    let mut config = Config {
        prompt: None,
        startup: Vec::new(),
    };
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with('#') {
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) if key.trim() == "prompt" => {
                config.prompt = Some(value.trim().trim_matches('"').to_string());
            }
            _ => config.startup.push(line.to_string()),
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prompt_and_startup_lines() {
        let config = parse_config(
            "# comment\nprompt = \"mb> \"\n\necho ready\n",
        );
        assert_eq!(config.prompt.as_deref(), Some("mb> "));
        assert_eq!(config.startup, vec!["echo ready"]);
    }

    #[test]
    fn empty_config_has_defaults() {
        let config = parse_config("");
        assert!(config.prompt.is_none());
        assert!(config.startup.is_empty());
    }
}
