// Copyright 2025 the Ergon authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The argument vector handed to executors, and the executor contract.

use std::fmt;

/// One parsed command: an owned argument vector.
///
/// `args[0]` is the command name, the rest are its arguments. A fresh value
/// is built for every parsed command, so executors can keep one without
/// aliasing the processor's internal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArgs {
    args: Vec<String>,
}

impl CommandArgs {
    /// Wraps an argument vector. The processor only builds non-empty
    /// vectors; an empty one is allowed here for programmatic dispatch and
    /// makes [`name`](Self::name) return `""`.
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    /// The command name (`args[0]`), or `""` for an empty vector.
    pub fn name(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or("")
    }

    /// Number of arguments, command name included.
    pub fn argc(&self) -> usize {
        self.args.len()
    }

    /// The argument at `index`, command name at 0.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// All arguments, command name first.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{arg}")?;
        }
        Ok(())
    }
}

/// Anything that can execute one parsed command.
///
/// The processor invokes `execute_command` once per command, synchronously,
/// on the calling thread. Executors must not panic; a panicking executor is
/// a contract violation the console does not recover from.
pub trait CommandExecutor {
    /// Executes one parsed command.
    fn execute_command(&mut self, args: &CommandArgs);
}

/// True when `name` is non-empty and contains only ASCII letters, digits,
/// and underscores.
pub fn is_valid_command_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}
