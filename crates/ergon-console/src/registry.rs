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

//! A named-command table implementing [`CommandExecutor`].

use std::collections::HashMap;

use crate::command::{is_valid_command_name, CommandArgs, CommandExecutor};
use crate::error::ConsoleError;

/// Handler invoked when a registered command is dispatched.
pub type CommandHandler = Box<dyn FnMut(&CommandArgs) + Send>;

struct RegisteredCommand {
    description: String,
    handler: CommandHandler,
}

/// A registry of named console commands.
///
/// The bundled executor for a [`CommandProcessor`](crate::CommandProcessor):
/// dispatches each parsed command to the handler registered under its name.
/// Unknown commands are logged, not errors — console text is user input.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, RegisteredCommand>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`.
    ///
    /// Names must pass [`is_valid_command_name`]. Re-registering an existing
    /// name replaces the previous handler with a logged warning.
    pub fn register<F>(
        &mut self,
        name: &str,
        description: &str,
        handler: F,
    ) -> Result<(), ConsoleError>
    where
        F: FnMut(&CommandArgs) + Send + 'static,
    {
        if !is_valid_command_name(name) {
            return Err(ConsoleError::InvalidCommandName(name.to_owned()));
        }
        let previous = self.commands.insert(
            name.to_owned(),
            RegisteredCommand {
                description: description.to_owned(),
                handler: Box::new(handler),
            },
        );
        if previous.is_some() {
            log::warn!("console: command '{name}' re-registered; previous handler replaced");
        }
        Ok(())
    }

    /// Removes a command, returning whether it was registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.commands.remove(name).is_some()
    }

    /// True when a command is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Iterates over `(name, description)` pairs, in no particular order.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &str)> {
        self.commands
            .iter()
            .map(|(name, cmd)| (name.as_str(), cmd.description.as_str()))
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True when no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl CommandExecutor for CommandRegistry {
    fn execute_command(&mut self, args: &CommandArgs) {
        let name = args.name();
        match self.commands.get_mut(name) {
            Some(command) => (command.handler)(args),
            None => log::warn!("console: unknown command '{name}'"),
        }
    }
}
