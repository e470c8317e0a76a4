use crate::config::Config;
use crate::err::Result;

/// Runtime values resolved once from the loaded config.
#[derive(Debug)]
pub struct EnvVar {
    working_dir: String,
    api_port: u16,
}

impl EnvVar {
    pub fn from_config(config: &Config) -> Result<Self> {
        let working_dir = expand_tilde(&config.app_config.working_dir);
        if working_dir.is_empty() {
            return Err("working_dir must not be empty".into());
        }
        Ok(Self {
            working_dir,
            api_port: config.app_config.api_port,
        })
    }

    pub fn get_working_dir(&self) -> &str {
        &self.working_dir
    }

    pub fn get_api_port(&self) -> u16 {
        self.api_port
    }
}

fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        match std::env::var("HOME") {
            Ok(home) => format!("{}/{}", home, rest),
            Err(_) => path.to_string(),
        }
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_keeps_plain_paths() {
        let mut cfg = Config::new();
        cfg.app_config.working_dir = "/srv/graphs".into();
        cfg.app_config.api_port = 9000;
        let ev = EnvVar::from_config(&cfg).expect("resolve");
        assert_eq!(ev.get_working_dir(), "/srv/graphs");
        assert_eq!(ev.get_api_port(), 9000);
    }

    #[test]
    fn from_config_rejects_empty_working_dir() {
        let cfg = Config::new();
        assert!(EnvVar::from_config(&cfg).is_err());
    }

    #[test]
    fn expand_tilde_uses_home() {
        if let Ok(home) = std::env::var("HOME") {
            assert_eq!(expand_tilde("~/graphs"), format!("{}/graphs", home));
        }
        assert_eq!(expand_tilde("/abs/graphs"), "/abs/graphs");
    }
}
