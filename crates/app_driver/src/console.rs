//! Line commands read from stdin by the node binary.
//!
//! The console stands in for both the physical button and a Matter
//! controller writing attributes.

use std::str::FromStr;

use crate::NodeMessage;
use crate::data_model::AttrValue;
use crate::data_model::AttributeId;
use crate::data_model::AttributePath;
use crate::data_model::ClusterId;
use crate::data_model::EndpointId;
use crate::driver::ButtonEvent;

pub const HELP: &str = "\
commands:
  press | toggle                    press the button
  on | off                          write OnOff
  level <0-255>                     write CurrentLevel
  write <ep> <cluster> <attr> <v>   write any attribute (v: true|false|null|<int>)
  show                              print the node state
  help                              print this text
  quit                              exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Press,
    Power(bool),
    Level(u8),
    Write {
        path: AttributePath,
        value: AttrValue,
    },
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}', try 'help'")]
    UnknownCommand(String),

    #[error("'{command}' expects {expected} argument(s), got {got}")]
    WrongArity {
        command: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("invalid value '{0}', expected true, false, null or an integer")]
    InvalidValue(String),
}

impl Command {
    /// Node message for commands that act on the device.
    pub fn to_message(&self, endpoint_id: EndpointId) -> Option<NodeMessage> {
        match *self {
            Command::Press => Some(NodeMessage::Button(ButtonEvent::PressDown)),
            Command::Power(on) => Some(NodeMessage::WriteAttribute {
                path: AttributePath::on_off(endpoint_id),
                value: AttrValue::Bool(on),
            }),
            Command::Level(level) => Some(NodeMessage::WriteAttribute {
                path: AttributePath::current_level(endpoint_id),
                value: AttrValue::U8(level),
            }),
            Command::Write { path, value } => Some(NodeMessage::WriteAttribute { path, value }),
            Command::Show | Command::Help | Command::Quit => None,
        }
    }
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        parse(line)
    }
}

pub fn parse(line: &str) -> Result<Command, ParseError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Err(ParseError::Empty);
    };
    let args: Vec<&str> = words.collect();

    let (command, expected) = match name.to_ascii_lowercase().as_str() {
        "press" | "toggle" => (Command::Press, 0),
        "on" => (Command::Power(true), 0),
        "off" => (Command::Power(false), 0),
        "show" => (Command::Show, 0),
        "help" | "?" => (Command::Help, 0),
        "quit" | "exit" => (Command::Quit, 0),
        "level" => {
            arity("level", &args, 1)?;
            (Command::Level(parse_number(args[0])?), 1)
        }
        "write" => {
            arity("write", &args, 4)?;
            let path = AttributePath::new(
                parse_number::<EndpointId>(args[0])?,
                parse_number::<ClusterId>(args[1])?,
                parse_number::<AttributeId>(args[2])?,
            );
            (
                Command::Write {
                    path,
                    value: parse_value(args[3])?,
                },
                4,
            )
        }
        _ => return Err(ParseError::UnknownCommand(name.to_string())),
    };

    if args.len() != expected {
        return Err(ParseError::WrongArity {
            command: static_name(&command),
            expected,
            got: args.len(),
        });
    }
    Ok(command)
}

fn static_name(command: &Command) -> &'static str {
    match command {
        Command::Press => "press",
        Command::Power(true) => "on",
        Command::Power(false) => "off",
        Command::Level(_) => "level",
        Command::Write { .. } => "write",
        Command::Show => "show",
        Command::Help => "help",
        Command::Quit => "quit",
    }
}

fn arity(command: &'static str, args: &[&str], expected: usize) -> Result<(), ParseError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ParseError::WrongArity {
            command,
            expected,
            got: args.len(),
        })
    }
}

/// Decimal, or hex with a `0x` prefix.
fn parse_number<T>(word: &str) -> Result<T, ParseError>
where
    T: TryFrom<u64>,
{
    let parsed = match word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => word.parse::<u64>(),
    };
    parsed
        .ok()
        .and_then(|n| T::try_from(n).ok())
        .ok_or_else(|| ParseError::InvalidNumber(word.to_string()))
}

fn parse_value(word: &str) -> Result<AttrValue, ParseError> {
    match word {
        "true" => return Ok(AttrValue::Bool(true)),
        "false" => return Ok(AttrValue::Bool(false)),
        "null" => return Ok(AttrValue::Null),
        _ => {}
    }

    let n: u32 = parse_number(word).map_err(|_| ParseError::InvalidValue(word.to_string()))?;
    Ok(if let Ok(v) = u8::try_from(n) {
        AttrValue::U8(v)
    } else if let Ok(v) = u16::try_from(n) {
        AttrValue::U16(v)
    } else {
        AttrValue::U32(n)
    })
}
