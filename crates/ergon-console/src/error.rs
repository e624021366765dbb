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

//! Error types for the console.
//!
//! Only API misuse surfaces as an error. Malformed command *text* never
//! does: the tokenizer logs and recovers, because console input is user
//! input.

use thiserror::Error;

/// An error from the console's registration API.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsoleError {
    /// The command name contains characters outside `[A-Za-z0-9_]` or is
    /// empty.
    #[error("invalid command name '{0}': only ASCII letters, digits, and underscores are allowed")]
    InvalidCommandName(String),
}
