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

use ergon_console::{
    CommandArgs, CommandExecutor, CommandProcessor, CommandRegistry, MAX_ARGS,
};

#[derive(Default)]
struct Recorder {
    commands: Vec<Vec<String>>,
}

impl CommandExecutor for Recorder {
    fn execute_command(&mut self, args: &CommandArgs) {
        self.commands.push(args.args().to_vec());
    }
}

#[test]
fn tokenizer_round_trip() {
    let mut processor = CommandProcessor::new();
    processor.append("cmd arg1 \"arg two\" ; cmd2 x");

    let mut recorder = Recorder::default();
    processor.execute(&mut recorder);

    assert_eq!(recorder.commands.len(), 2, "two commands must dispatch");
    assert_eq!(recorder.commands[0], vec!["cmd", "arg1", "arg two"]);
    assert_eq!(recorder.commands[1], vec!["cmd2", "x"]);
}

#[test]
fn comments_never_reach_the_executor() {
    let mut processor = CommandProcessor::new();
    processor.append("cmd // trailing comment\ncmd2");

    let mut recorder = Recorder::default();
    processor.execute(&mut recorder);

    assert_eq!(recorder.commands, vec![vec!["cmd"], vec!["cmd2"]]);
    for command in &recorder.commands {
        for arg in command {
            assert!(
                !arg.contains("comment"),
                "comment text must not appear in any argument"
            );
        }
    }
}

#[test]
fn buffer_is_empty_after_every_execute() {
    for text in [
        "well formed; commands\n",
        "\"unterminated quote",
        "/* unterminated comment",
        "plain",
        ";;;;",
    ] {
        let mut processor = CommandProcessor::new();
        processor.append(text);
        let mut recorder = Recorder::default();
        processor.execute(&mut recorder);
        assert!(
            processor.is_empty(),
            "buffer must clear after executing {text:?}"
        );
    }
}

#[test]
fn argument_cap_holds_without_crashing() {
    let mut text = String::new();
    for i in 0..MAX_ARGS + 5 {
        text.push_str(&format!("a{i} "));
    }

    let mut processor = CommandProcessor::new();
    processor.append(&text);
    let mut recorder = Recorder::default();
    processor.execute(&mut recorder);

    assert_eq!(recorder.commands.len(), 1);
    assert_eq!(
        recorder.commands[0].len(),
        MAX_ARGS,
        "exactly MAX_ARGS arguments must be captured"
    );
}

#[test]
fn processor_drives_a_registry_end_to_end() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let echoes = Arc::new(std::sync::Mutex::new(Vec::new()));
    let quits = Arc::new(AtomicUsize::new(0));

    let mut registry = CommandRegistry::new();
    {
        let echoes = Arc::clone(&echoes);
        registry
            .register("echo", "record the arguments", move |args| {
                let mut echoes = echoes.lock().unwrap();
                echoes.push(args.args()[1..].join(" "));
            })
            .unwrap();
    }
    {
        let quits = Arc::clone(&quits);
        registry
            .register("quit", "count shutdown requests", move |_| {
                quits.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();
    }

    let mut processor = CommandProcessor::new();
    processor.append("echo \"hello there\" friend\n");
    processor.append("unknown_cmd 1 2 3; echo again /* noise */; quit");
    processor.execute(&mut registry);

    assert_eq!(
        *echoes.lock().unwrap(),
        vec!["hello there friend".to_string(), "again".to_string()]
    );
    assert_eq!(quits.load(Ordering::Relaxed), 1);
}

#[test]
fn inserted_text_executes_before_appended_text() {
    let mut processor = CommandProcessor::new();
    processor.append("later\n");
    processor.insert("sooner");
    processor.insert("soonest");

    let mut recorder = Recorder::default();
    processor.execute(&mut recorder);

    assert_eq!(
        recorder.commands,
        vec![vec!["soonest"], vec!["sooner"], vec!["later"]]
    );
}

#[test]
fn executor_state_survives_across_executes() {
    let mut processor = CommandProcessor::new();
    let mut recorder = Recorder::default();

    processor.append("one");
    processor.execute(&mut recorder);
    processor.append("two");
    processor.execute(&mut recorder);

    assert_eq!(recorder.commands, vec![vec!["one"], vec!["two"]]);
}
