use std::path::PathBuf;

use crate::error::{Error, Result};

pub const DEFAULT_PROMPT: &str = ">>> ";

/// What the shell does with each line.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum Mode {
    #[default]
    Eval,
    /// Print the token stream.
    Tokens,
    /// Print the canonical form of the parsed program.
    Ast,
}

impl Mode {
    fn from_flag(value: &str) -> Result<Self> {
        match value {
            "eval" => Ok(Mode::Eval),
            "tokens" => Ok(Mode::Tokens),
            "ast" => Ok(Mode::Ast),
            _ => Err(Error::Config(format!("unknown mode `{}`, expected eval, tokens or ast", value))),
        }
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Config {
    pub mode: Mode,
    pub prompt: String,
    pub history: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            prompt: DEFAULT_PROMPT.to_string(),
            history: None,
        }
    }
}

impl Config {
    /// Reads `--mode=`, `--prompt=` and `--history=` flags. The program name
    /// must already be stripped.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();

        for arg in args {
            let arg = arg.as_ref();

            if let Some(mode) = arg.strip_prefix("--mode=") {
                config.mode = Mode::from_flag(mode)?;
            } else if let Some(prompt) = arg.strip_prefix("--prompt=") {
                config.prompt = prompt.to_string();
            } else if let Some(path) = arg.strip_prefix("--history=") {
                if path.is_empty() {
                    return Err(Error::Config("--history needs a path".to_string()));
                }
                config.history = Some(PathBuf::from(path));
            } else {
                return Err(Error::Config(format!("unknown argument `{}`", arg)));
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() -> Result<()> {
        let config = Config::from_args(Vec::<String>::new())?;

        assert_eq!(Config::default(), config);
        assert_eq!(Mode::Eval, config.mode);
        assert_eq!(">>> ", config.prompt);
        assert_eq!(None, config.history);

        Ok(())
    }

    #[test]
    fn test_flags() -> Result<()> {
        let config = Config::from_args(["--mode=ast", "--prompt=mua> ", "--history=/tmp/mua_history"])?;

        assert_eq!(Mode::Ast, config.mode);
        assert_eq!("mua> ", config.prompt);
        assert_eq!(Some(PathBuf::from("/tmp/mua_history")), config.history);

        assert_eq!(Mode::Tokens, Config::from_args(["--mode=tokens"])?.mode);

        Ok(())
    }

    #[test]
    fn test_later_flag_wins() -> Result<()> {
        let config = Config::from_args(["--mode=tokens", "--mode=eval"])?;

        assert_eq!(Mode::Eval, config.mode);

        Ok(())
    }

    #[test]
    fn test_bad_flags() {
        let tests = vec![
            ("--mode=vm", "bad configuration: unknown mode `vm`, expected eval, tokens or ast"),
            ("--engine=vm", "bad configuration: unknown argument `--engine=vm`"),
            ("--history=", "bad configuration: --history needs a path"),
        ];

        for (arg, expected) in tests {
            match Config::from_args([arg]) {
                Err(e @ Error::Config(_)) => assert_eq!(expected, e.to_string()),
                other => panic!("expected a config error for {}, got {:?}", arg, other),
            }
        }
    }
}
