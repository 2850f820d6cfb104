//! Command construction and known-args parsing using Clap

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::domain::config::RunnerConfig;
use crate::domain::level::LEVEL_CHOICES;

/// Arg id of `--verbosity`
pub const VERBOSITY: &str = "verbosity";

/// Arg id of `--log-level`
pub const LOG_LEVEL: &str = "log_level";

/// Empty command for a tool; long flags must be spelled out in full
pub fn base_command(name: &str) -> Command {
    Command::new(name.to_string()).infer_long_args(false)
}

/// Register `--verbosity/-v` and `--log-level/-l`, defaulting from `config`
pub fn add_default_arguments(command: Command, config: &RunnerConfig) -> Command {
    command
        .arg(
            Arg::new(VERBOSITY)
                .short('v')
                .long("verbosity")
                .value_name("LEVEL")
                .value_parser(LEVEL_CHOICES)
                .default_value(config.verbosity_or_default().as_str())
                .help("Application log level"),
        )
        .arg(
            Arg::new(LOG_LEVEL)
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .value_parser(LEVEL_CHOICES)
                .default_value(config.log_level_or_default().as_str())
                .help("Log level for non-application logs"),
        )
}

/// Parse what `command` recognizes and hand back everything else.
///
/// Unknown flags, and bare words beyond what the positionals accept, are
/// returned in order as leftovers. A known option's value is taken from
/// `--opt=value`, `-ovalue`, or the following token. Everything after `--`
/// is left over.
pub fn parse_known_args(
    command: &Command,
    raw: &[String],
) -> Result<(ArgMatches, Vec<String>), clap::Error> {
    let mut command = command.clone();
    command.build();

    let mut open_slots = positional_slots(&command);
    let mut known = Vec::new();
    let mut extra = Vec::new();
    let mut tokens = raw.iter();

    while let Some(token) = tokens.next() {
        if token == "--" {
            extra.push(token.clone());
            extra.extend(tokens.by_ref().cloned());
            break;
        }

        match classify(&command, token) {
            Token::Flag => known.push(token.clone()),
            Token::Option => {
                known.push(token.clone());
                if let Some(value) = tokens.next() {
                    known.push(value.clone());
                }
            }
            Token::Word if open_slots > 0 => {
                open_slots -= 1;
                known.push(token.clone());
            }
            Token::Word | Token::Unknown => extra.push(token.clone()),
        }
    }

    let name = command.get_name().to_string();
    let matches = command.try_get_matches_from(std::iter::once(name).chain(known))?;
    Ok((matches, extra))
}

/// Number of bare words the positionals accept; `usize::MAX` when unbounded
fn positional_slots(command: &Command) -> usize {
    command
        .get_positionals()
        .map(|arg| match arg.get_action() {
            ArgAction::Append => usize::MAX,
            _ => arg.get_num_args().map_or(1, |range| range.max_values()),
        })
        .fold(0, usize::saturating_add)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// Recognized and self-contained
    Flag,
    /// Recognized, value in the next token
    Option,
    /// Not a flag
    Word,
    /// Flag the command does not define
    Unknown,
}

fn classify(command: &Command, token: &str) -> Token {
    if let Some(body) = token.strip_prefix("--") {
        let (long, inline) = match body.split_once('=') {
            Some((long, _)) => (long, true),
            None => (body, false),
        };
        return match find_long(command, long) {
            Some(arg) if arg.get_action().takes_values() && !inline => Token::Option,
            Some(_) => Token::Flag,
            None => Token::Unknown,
        };
    }

    let Some(body) = token.strip_prefix('-').filter(|body| !body.is_empty()) else {
        return Token::Word;
    };

    let mut shorts = body.chars();
    let Some(first) = shorts.next() else {
        return Token::Word;
    };
    let rest = shorts.as_str();
    match find_short(command, first) {
        Some(arg) if arg.get_action().takes_values() => {
            if rest.is_empty() {
                Token::Option
            } else {
                Token::Flag
            }
        }
        // `-abc` is only known when every letter is a known switch
        Some(_) if rest.chars().all(|c| is_switch(command, c)) => Token::Flag,
        _ => Token::Unknown,
    }
}

fn find_long<'a>(command: &'a Command, long: &str) -> Option<&'a Arg> {
    command.get_arguments().find(|arg| {
        arg.get_long_and_visible_aliases()
            .is_some_and(|names| names.contains(&long))
    })
}

fn find_short(command: &Command, short: char) -> Option<&Arg> {
    command.get_arguments().find(|arg| {
        arg.get_short_and_visible_aliases()
            .is_some_and(|shorts| shorts.contains(&short))
    })
}

fn is_switch(command: &Command, short: char) -> bool {
    find_short(command, short).is_some_and(|arg| !arg.get_action().takes_values())
}
