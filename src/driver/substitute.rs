use std::path::PathBuf;

use crate::constants::PLACEHOLDER_HOST;
use crate::constants::PLACEHOLDER_PATH;
use crate::constants::PLACEHOLDER_PORT;
use crate::ClusterConfig;
use crate::Error;
use crate::Result;

/// Values a user command can reference as `{PATH}`, `{HOST}` and `{PORT}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    /// Repository root
    pub path: PathBuf,
    pub host: String,
    /// Bootstrap coordinator port
    pub port: u16,
}

impl CommandContext {
    pub fn from_config(cluster: &ClusterConfig) -> Result<Self> {
        Ok(Self {
            path: cluster.resolved_exec_path()?,
            host: cluster.host.clone(),
            port: cluster.coordinator_port,
        })
    }

    fn lookup(
        &self,
        name: &str,
    ) -> Option<String> {
        match name {
            PLACEHOLDER_PATH => Some(self.path.display().to_string()),
            PLACEHOLDER_HOST => Some(self.host.clone()),
            PLACEHOLDER_PORT => Some(self.port.to_string()),
            _ => None,
        }
    }
}

/// Replaces every `{NAME}` in `template` with its value from `ctx`.
///
/// `{{` and `}}` stand for literal braces. Unknown names, unterminated
/// placeholders and lone `}` are errors.
pub fn substitute(
    template: &str,
    ctx: &CommandContext,
) -> Result<String> {
    let error = |reason: String| Error::Template {
        template: template.to_string(),
        reason,
    };

    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') => return Err(error("nested '{' in placeholder".to_string())),
                        Some(c) => name.push(c),
                        None => return Err(error("unterminated placeholder".to_string())),
                    }
                }
                let value = ctx
                    .lookup(&name)
                    .ok_or_else(|| error(format!("unknown placeholder {{{name}}}")))?;
                out.push_str(&value);
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(error("single '}' encountered".to_string())),
            c => out.push(c),
        }
    }
    Ok(out)
}

/// Applies [`substitute`] to every element of `args`.
pub fn substitute_all(
    args: &[String],
    ctx: &CommandContext,
) -> Result<Vec<String>> {
    args.iter().map(|arg| substitute(arg, ctx)).collect()
}
