//! Scripted collaborators for resolution tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::detection::Host;
use crate::error::{InstallerError, Result};
use crate::registry::{ModuleRecord, RegistryClient};
use crate::shell::{CommandOptions, CommandResult, CommandRunner};

/// How a scripted command behaves.
#[derive(Debug, Clone)]
pub enum Reply {
    Succeed,
    Fail { stdout: String, stderr: String },
    TimeOut,
}

impl Reply {
    pub fn stderr(text: &str) -> Self {
        Self::Fail {
            stdout: String::new(),
            stderr: text.to_string(),
        }
    }
}

/// Runner that answers by command prefix and records every invocation.
///
/// Commands with no matching rule fail with exit code 1 and no output.
#[derive(Default)]
pub struct FakeRunner {
    rules: Vec<(String, Reply)>,
    pub calls: RefCell<Vec<(String, CommandOptions)>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, prefix: &str, reply: Reply) -> Self {
        self.rules.push((prefix.to_string(), reply));
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(c, _)| c.clone()).collect()
    }

    pub fn ran(&self, prefix: &str) -> bool {
        self.commands().iter().any(|c| c.starts_with(prefix))
    }

    pub fn options_for(&self, prefix: &str) -> Option<CommandOptions> {
        self.calls
            .borrow()
            .iter()
            .find(|(c, _)| c.starts_with(prefix))
            .map(|(_, o)| o.clone())
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, command: &str, options: &CommandOptions) -> Result<CommandResult> {
        self.calls
            .borrow_mut()
            .push((command.to_string(), options.clone()));

        let reply = self
            .rules
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| Reply::stderr(""));

        match reply {
            Reply::Succeed => Ok(CommandResult::success(
                String::new(),
                String::new(),
                Duration::ZERO,
            )),
            Reply::Fail { stdout, stderr } => {
                Ok(CommandResult::failure(Some(1), stdout, stderr, Duration::ZERO))
            }
            Reply::TimeOut => Err(InstallerError::Timeout {
                command: command.to_string(),
                after: options.timeout.unwrap_or_default(),
            }),
        }
    }
}

/// Registry with a fixed module table.
#[derive(Default)]
pub struct FakeRegistry {
    modules: HashMap<String, ModuleRecord>,
    unreachable: bool,
    pub lookups: RefCell<Vec<String>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, name: &str, version: &str) -> Self {
        self.modules.insert(
            name.to_string(),
            ModuleRecord {
                name: Some(name.to_string()),
                version: Some(version.to_string()),
                author: None,
                summary: None,
                distribution: None,
            },
        );
        self
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Default::default()
        }
    }
}

impl RegistryClient for FakeRegistry {
    fn lookup(&self, module: &str) -> Result<Option<ModuleRecord>> {
        self.lookups.borrow_mut().push(module.to_string());
        if self.unreachable {
            return Err(InstallerError::RegistryLookupFailed {
                module: module.to_string(),
                message: "network error: connection refused".to_string(),
            });
        }
        Ok(self.modules.get(module).cloned())
    }
}

/// Host with configurable facts.
pub struct FakeHost {
    pub os_release: Option<String>,
    pub on_path: Vec<String>,
    pub elevated: bool,
}

impl FakeHost {
    pub fn debian_root() -> Self {
        Self {
            os_release: Some("ID=debian\n".to_string()),
            on_path: vec!["apt-get".to_string()],
            elevated: true,
        }
    }

    pub fn with_tools(mut self, tools: &[&str]) -> Self {
        self.on_path.extend(tools.iter().map(|t| t.to_string()));
        self
    }

    pub fn unprivileged(mut self) -> Self {
        self.elevated = false;
        self
    }
}

impl Host for FakeHost {
    fn os_release(&self) -> Option<String> {
        self.os_release.clone()
    }

    fn is_darwin(&self) -> bool {
        false
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        self.on_path
            .iter()
            .any(|t| t == name)
            .then(|| PathBuf::from("/usr/bin").join(name))
    }

    fn is_elevated(&self) -> bool {
        self.elevated
    }
}
