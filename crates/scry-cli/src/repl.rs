//! Interactive console over the demo graph.
//!
//! Line editing, history, and tab completion backed by the completion
//! engine: the completer replays the tokens typed so far and offers the
//! identifiers valid at that cursor position.

use std::sync::Arc;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use scry_core::{Inspector, TypeKey, Value};

use crate::demo::HubContext;
use crate::output::{print_error, report};

const PROMPT: &str = "scry> ";

struct ChainHelper {
    inspector: Arc<Inspector>,
    root: TypeKey,
}

impl Completer for ChainHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let head = &line[..pos];
        let mut tokens: Vec<&str> = head.split_whitespace().collect();
        if head.ends_with(char::is_whitespace) || tokens.is_empty() {
            tokens.push("");
        }
        let partial = tokens.last().copied().unwrap_or("");
        let start = pos - partial.len();

        let candidates = self
            .inspector
            .complete(&self.root, &tokens)
            .unwrap_or_default();
        Ok((
            start,
            candidates
                .into_iter()
                .map(|id| Pair {
                    display: id.clone(),
                    replacement: id,
                })
                .collect(),
        ))
    }
}

impl Hinter for ChainHelper {
    type Hint = String;
}

impl Highlighter for ChainHelper {}
impl Validator for ChainHelper {}
impl Helper for ChainHelper {}

pub fn execute(
    inspector: Arc<Inspector>,
    root: Value,
    root_key: TypeKey,
    ctx: HubContext,
) -> anyhow::Result<()> {
    let mut editor = Editor::<ChainHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(ChainHelper {
        inspector: Arc::clone(&inspector),
        root: root_key,
    }));

    let history_path = dirs::home_dir().map(|h| h.join(".scry").join("repl_history"));
    if let Some(ref path) = history_path {
        let _ = editor.load_history(path);
    }

    println!("Scry v{} console", env!("CARGO_PKG_VERSION"));
    println!("Type a method chain, help for help, exit to quit\n");

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    // No tokens: describe the root object itself.
                    println!("{}", inspector.render(&root));
                    continue;
                }
                let _ = editor.add_history_entry(trimmed);

                match trimmed {
                    "exit" | "quit" => break,
                    "help" => {
                        print_help();
                        continue;
                    }
                    _ => {}
                }

                let tokens: Vec<&str> = trimmed.split_whitespace().collect();
                report(&inspector, inspector.evaluate(&root, &tokens, &ctx));
            }
            Err(ReadlineError::Interrupted) => {
                println!("(To exit, press Ctrl+D or type exit)");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                print_error(&format!("{}", e));
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = editor.save_history(path);
    }

    Ok(())
}

fn print_help() {
    println!("Type identifiers separated by spaces to walk the object graph;");
    println!("each identifier names a method on the current object and the");
    println!("tokens after it become that method's arguments.");
    println!();
    println!("  sensors                    list all sensors");
    println!("  sensor thermal readings    readings of one sensor");
    println!("  sensor thermal record 21.4 append a reading");
    println!();
    println!("Tab completes the next identifier. An empty line describes the");
    println!("root object. exit quits.");
}
