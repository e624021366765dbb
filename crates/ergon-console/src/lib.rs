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

//! # Ergon Console
//!
//! The text command core of the engine: a buffered tokenizer that parses
//! semicolon/newline-delimited command text (with quoting and comment
//! handling) into argument vectors and dispatches each complete command to
//! an executor.
//!
//! The [`CommandProcessor`] owns the text buffer; any text source — an
//! on-screen console, key bindings, startup scripts — feeds it via
//! [`append`](CommandProcessor::append) or
//! [`insert`](CommandProcessor::insert), and a single
//! [`execute`](CommandProcessor::execute) call drains the whole buffer
//! synchronously. Parsing is strictly best-effort: malformed input is
//! logged and recovered, never an error the caller has to handle.
//!
//! [`CommandRegistry`] is the bundled [`CommandExecutor`]: a table of named
//! commands with descriptions, in the mold of the engine's other
//! registries.
//!
//! ```rust
//! use ergon_console::{CommandProcessor, CommandRegistry};
//!
//! let mut registry = CommandRegistry::new();
//! registry
//!     .register("greet", "print a greeting", |args| {
//!         println!("hello {}", args.arg(1).unwrap_or("world"));
//!     })
//!     .unwrap();
//!
//! let mut console = CommandProcessor::new();
//! console.append("greet engine // comment is ignored\n");
//! console.execute(&mut registry);
//! assert!(console.is_empty());
//! ```

#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod processor;
pub mod registry;

pub use command::{is_valid_command_name, CommandArgs, CommandExecutor};
pub use error::ConsoleError;
pub use processor::CommandProcessor;
pub use registry::CommandRegistry;

/// Maximum number of arguments captured for one command; further tokens are
/// dropped with a logged warning.
pub const MAX_ARGS: usize = 256;

/// Maximum byte length of one bare token, terminator included; longer runs
/// split into a new token at `MAX_ARG_LEN - 1` bytes.
pub const MAX_ARG_LEN: usize = 256;
