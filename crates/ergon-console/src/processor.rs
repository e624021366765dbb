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

//! The buffered command tokenizer.
//!
//! [`CommandProcessor::execute`] runs a single-pass state machine over the
//! buffered text: skip `//` line comments and `/* */` block comments, split
//! commands on `;` and newlines, and collect quoted or bare tokens into an
//! argument vector that is dispatched to the executor once per command.
//!
//! Every malformed construct degrades gracefully — an unterminated quote or
//! block comment, too many arguments, an over-long token — with a `warn`
//! log and the cursor still moving forward. The buffer is always empty when
//! `execute` returns.

use std::mem;

use crate::command::{CommandArgs, CommandExecutor};
use crate::{MAX_ARGS, MAX_ARG_LEN};

/// A growable command text buffer and its tokenizer.
///
/// Single-threaded and synchronous: `execute` drains the whole buffer on
/// the calling thread before returning. The exclusive borrow it takes rules
/// out the re-entrant case where an executor feeds text back into the
/// processor mid-drain; executors that generate follow-up commands hold
/// them until `execute` returns.
#[derive(Debug, Default)]
pub struct CommandProcessor {
    buffer: String,
}

impl CommandProcessor {
    /// Creates a processor with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends text to the end of the buffer.
    ///
    /// Text is taken verbatim; callers separate commands with `;` or a
    /// newline, otherwise two appends fuse into one token.
    pub fn append(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Inserts text at the front of the buffer, before anything already
    /// queued, keeping a newline between the insertion and the old content.
    ///
    /// This is how a command executed "immediately" jumps the queue.
    pub fn insert(&mut self, text: &str) {
        if self.buffer.is_empty() {
            self.buffer.push_str(text);
            return;
        }
        let mut rebuilt = String::with_capacity(text.len() + 1 + self.buffer.len());
        rebuilt.push_str(text);
        if !text.ends_with('\n') {
            rebuilt.push('\n');
        }
        rebuilt.push_str(&self.buffer);
        self.buffer = rebuilt;
    }

    /// True when no text is buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Buffered bytes awaiting execution.
    pub fn buffered_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// Tokenizes and dispatches every complete command in the buffer, then
    /// leaves the buffer empty.
    ///
    /// The executor is invoked once per parsed command, synchronously. A
    /// final command with no trailing delimiter is still dispatched. The
    /// buffer is cleared regardless of how malformed the input was.
    pub fn execute(&mut self, executor: &mut dyn CommandExecutor) {
        if self.buffer.is_empty() {
            return;
        }
        // Taking the buffer up front makes the clear-on-return guarantee
        // structural, whatever the scan below runs into.
        let text = mem::take(&mut self.buffer);
        let bytes = text.as_bytes();
        let len = bytes.len();
        let mut cursor = 0;
        let mut args: Vec<String> = Vec::new();

        while cursor < len {
            let c = bytes[cursor];

            // NUL ends the scan; the buffer's C-string ancestry.
            if c == 0 {
                break;
            }

            // Line comment: skip to end of line. The newline itself is left
            // for the delimiter arm so the current command still terminates.
            if c == b'/' && cursor + 1 < len && bytes[cursor + 1] == b'/' {
                while cursor < len && bytes[cursor] != b'\n' {
                    cursor += 1;
                }
                continue;
            }

            // Block comment: skip to the matching terminator.
            if c == b'/' && cursor + 1 < len && bytes[cursor + 1] == b'*' {
                match text[cursor + 2..].find("*/") {
                    Some(end) => cursor = cursor + 2 + end + 2,
                    None => {
                        log::warn!("console: expected \"*/\" before end of command buffer");
                        cursor = len;
                    }
                }
                continue;
            }

            // Command delimiter.
            if c == b'\n' || c == b';' {
                dispatch(&mut args, executor);
                cursor += 1;
                continue;
            }

            // Whitespace, including control characters.
            if c == b' ' || c == b'\t' || c < 0x20 {
                cursor += 1;
                continue;
            }

            // Quoted token: interior whitespace, delimiters, and comment
            // markers are all literal text.
            if c == b'"' {
                cursor += 1;
                let start = cursor;
                while cursor < len && bytes[cursor] != b'"' {
                    cursor += 1;
                }
                let token = &text[start..cursor];
                if cursor < len {
                    cursor += 1;
                } else {
                    log::warn!("console: no closed quote before end of command buffer");
                }
                // An empty quoted token carries no argument.
                if !token.is_empty() {
                    push_arg(&mut args, token.to_owned());
                }
                continue;
            }

            // Bare token: runs until whitespace, a delimiter, a comment
            // opener, or the length cap. Multi-byte UTF-8 sequences pass
            // through; every break lands on a char boundary.
            let start = cursor;
            while cursor < len {
                let c = bytes[cursor];
                if c < 0x80 {
                    if c == b' ' || c == b'\t' || c == b';' || c < 0x20 {
                        break;
                    }
                    if c == b'/'
                        && cursor + 1 < len
                        && (bytes[cursor + 1] == b'/' || bytes[cursor + 1] == b'*')
                    {
                        break;
                    }
                }
                if cursor - start >= MAX_ARG_LEN - 1 && text.is_char_boundary(cursor) {
                    break;
                }
                cursor += 1;
            }
            push_arg(&mut args, text[start..cursor].to_owned());
        }

        // A last command without a trailing delimiter still runs.
        dispatch(&mut args, executor);
    }
}

/// Hands the accumulated arguments to the executor, if there are any.
fn dispatch(args: &mut Vec<String>, executor: &mut dyn CommandExecutor) {
    if args.is_empty() {
        return;
    }
    let command = CommandArgs::new(mem::take(args));
    executor.execute_command(&command);
}

/// Appends a token to the argument vector, dropping it past [`MAX_ARGS`].
fn push_arg(args: &mut Vec<String>, token: String) {
    if args.len() == MAX_ARGS {
        log::warn!("console: command has more than {MAX_ARGS} arguments; dropping '{token}'");
        return;
    }
    args.push(token);
}
