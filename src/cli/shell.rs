use std::{
    borrow::Cow,
    collections::HashMap,
    fmt,
    io::{self, StdinLock},
};

use bizbalance_domain::CollectionKind;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;
use tracing::debug;

use crate::cli::commands::records::COLLECTION_COMMANDS;
use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output;

pub const SCRIPT_MODE_ENV: &str = "BIZBALANCE_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_MODE_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    let mut source = LineSource::for_mode(&context)?;
    if mode == CliMode::Interactive {
        output::section("BizBalance");
        output::info("Type `help` for commands, `summary` for the dashboard.");
    }
    run_loop(&mut context, &mut source)
}

/// What the next read produced.
enum ShellInput {
    Line(String),
    Interrupted,
    Closed,
}

/// Where command lines come from: a line editor or piped stdin.
enum LineSource {
    Editor(Box<Editor<ShellHelper, DefaultHistory>>),
    Stdin(io::Lines<StdinLock<'static>>),
}

impl LineSource {
    fn for_mode(context: &ShellContext) -> Result<Self, CliError> {
        match context.mode {
            CliMode::Script => Ok(Self::Stdin(io::stdin().lines())),
            CliMode::Interactive => {
                let mut editor = Editor::<ShellHelper, DefaultHistory>::new()?;
                editor.set_helper(Some(ShellHelper::new(context.command_spellings())));
                editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
                Ok(Self::Editor(Box::new(editor)))
            }
        }
    }

    fn next(&mut self, prompt: &str) -> Result<ShellInput, CliError> {
        match self {
            Self::Stdin(lines) => match lines.next() {
                Some(line) => Ok(ShellInput::Line(line?)),
                None => Ok(ShellInput::Closed),
            },
            Self::Editor(editor) => match editor.readline(prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        editor.add_history_entry(trimmed).ok();
                    }
                    Ok(ShellInput::Line(line))
                }
                Err(ReadlineError::Interrupted) => Ok(ShellInput::Interrupted),
                Err(ReadlineError::Eof) => {
                    output::info("Exiting shell.");
                    Ok(ShellInput::Closed)
                }
                Err(err) => Err(err.into()),
            },
        }
    }
}

/// Reads and runs lines until `exit`, end of input, or a confirmed interrupt.
///
/// A finished background insight is announced before each prompt, and the
/// prompt carries a `*` while one is still in flight.
fn run_loop(context: &mut ShellContext, source: &mut LineSource) -> Result<(), CliError> {
    while context.running {
        context.poll_background();
        let control = match source.next(&context.prompt())? {
            ShellInput::Line(line) => handle_line(context, &line),
            ShellInput::Interrupted => context.confirm("Exit BizBalance?").map(|leave| {
                if leave {
                    LoopControl::Exit
                } else {
                    LoopControl::Continue
                }
            }),
            ShellInput::Closed => Ok(LoopControl::Exit),
        };
        match control {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => context.running = false,
            Err(err) => context.report_error(err),
        }
    }
    debug!("shell loop finished");
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let tokens = match parse_command_line(trimmed) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(err);
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.dispatch(&raw.to_lowercase(), raw, &args)
}

/// Completes command names in the first word and collection aliases in the
/// second word of record commands.
struct ShellHelper {
    commands: Vec<String>,
    canonical: HashMap<String, &'static str>,
}

impl ShellHelper {
    fn new(spellings: Vec<(&'static str, &'static str)>) -> Self {
        let canonical: HashMap<String, &'static str> = spellings
            .into_iter()
            .map(|(spelling, name)| (spelling.to_ascii_lowercase(), name))
            .collect();
        let mut commands: Vec<String> = canonical.keys().cloned().collect();
        commands.sort();
        Self {
            commands,
            canonical,
        }
    }

    fn candidates(&self, words_before: &[&str], needle: &str) -> Vec<String> {
        let needle = needle.to_ascii_lowercase();
        match words_before {
            [] => self
                .commands
                .iter()
                .filter(|name| name.starts_with(&needle))
                .cloned()
                .collect(),
            [command] => {
                let takes_collection = self
                    .canonical
                    .get(&command.to_ascii_lowercase())
                    .is_some_and(|name| COLLECTION_COMMANDS.contains(name));
                if !takes_collection {
                    return Vec::new();
                }
                CollectionKind::ALL
                    .iter()
                    .map(|kind| kind.alias())
                    .filter(|alias| alias.starts_with(&needle))
                    .map(str::to_string)
                    .collect()
            }
            _ => Vec::new(),
        }
    }
}

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let words_before: Vec<&str> = prefix[..start].split_whitespace().collect();
        let candidates = self
            .candidates(&words_before, &prefix[start..])
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for ShellHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not parse input: {}", self.message)
    }
}
