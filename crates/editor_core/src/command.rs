//! Text form of the editor operations, as typed on the command line.
//!
//! ```text
//! add
//! remove <id>
//! move <id> up|down
//! edit <id> <field>=<value>
//! reset
//! dedupe
//! ```

use serde_json::Value;
use shared::domain::{ItemId, ItemKind};
use thiserror::Error;
use tracing::debug;

use crate::editor::{Direction, FieldEdit, OrderedItemEditor};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{command}' is missing its {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("'{0}' is not a valid item id")]
    InvalidId(String),
    #[error("'{0}' is not a direction, expected up or down")]
    InvalidDirection(String),
    #[error("invalid value for field '{field}': {reason}")]
    InvalidField { field: String, reason: String },
    #[error("unexpected trailing input '{0}'")]
    Trailing(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    Add,
    Remove(ItemId),
    Move(ItemId, Direction),
    Edit(ItemId, FieldEdit),
    Reset,
    Dedupe,
}

impl EditCommand {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "" => return Err(CommandError::Empty),
            "add" => {
                no_trailing(rest)?;
                EditCommand::Add
            }
            "reset" => {
                no_trailing(rest)?;
                EditCommand::Reset
            }
            "dedupe" => {
                no_trailing(rest)?;
                EditCommand::Dedupe
            }
            "remove" => {
                let mut args = rest.split_whitespace();
                let id = parse_id(args.next(), "remove")?;
                no_trailing(&args.collect::<Vec<_>>().join(" "))?;
                EditCommand::Remove(id)
            }
            "move" => {
                let mut args = rest.split_whitespace();
                let id = parse_id(args.next(), "move")?;
                let raw = args.next().ok_or(CommandError::MissingArgument {
                    command: "move",
                    argument: "direction",
                })?;
                let direction = Direction::parse(raw)
                    .ok_or_else(|| CommandError::InvalidDirection(raw.to_string()))?;
                no_trailing(&args.collect::<Vec<_>>().join(" "))?;
                EditCommand::Move(id, direction)
            }
            "edit" => {
                let (raw_id, assignment) = match rest.split_once(char::is_whitespace) {
                    Some((raw_id, assignment)) => (Some(raw_id), assignment.trim()),
                    None => (Some(rest).filter(|r| !r.is_empty()), ""),
                };
                let id = parse_id(raw_id, "edit")?;
                let (field, value) =
                    assignment
                        .split_once('=')
                        .ok_or(CommandError::MissingArgument {
                            command: "edit",
                            argument: "field=value assignment",
                        })?;
                EditCommand::Edit(id, parse_field(field.trim(), value.trim())?)
            }
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditCommand::Add => "add",
            EditCommand::Remove(_) => "remove",
            EditCommand::Move(..) => "move",
            EditCommand::Edit(..) => "edit",
            EditCommand::Reset => "reset",
            EditCommand::Dedupe => "dedupe",
        }
    }

    pub fn apply(self, editor: &mut OrderedItemEditor) {
        let name = self.name();
        match self {
            EditCommand::Add => {
                editor.add_item();
            }
            EditCommand::Remove(id) => {
                editor.remove_item(id);
            }
            EditCommand::Move(id, direction) => {
                editor.move_item(id, direction);
            }
            EditCommand::Edit(id, edit) => {
                editor.edit_field(id, edit);
            }
            EditCommand::Reset => {
                editor.reset();
            }
            EditCommand::Dedupe => {
                editor.dedupe_titles();
            }
        }
        debug!(command = name, len = editor.len(), "applied edit command");
    }
}

fn no_trailing(rest: &str) -> Result<(), CommandError> {
    if rest.trim().is_empty() {
        Ok(())
    } else {
        Err(CommandError::Trailing(rest.trim().to_string()))
    }
}

fn parse_id(raw: Option<&str>, command: &'static str) -> Result<ItemId, CommandError> {
    let raw = raw.ok_or(CommandError::MissingArgument {
        command,
        argument: "item id",
    })?;
    raw.parse::<i64>()
        .map(ItemId)
        .map_err(|_| CommandError::InvalidId(raw.to_string()))
}

/// Coerces the raw text to the type the field stores.
fn parse_field(field: &str, value: &str) -> Result<FieldEdit, CommandError> {
    let invalid = |reason: &str| CommandError::InvalidField {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    match field {
        "" => Err(CommandError::MissingArgument {
            command: "edit",
            argument: "field name",
        }),
        "id" => Err(invalid("ids are assigned by the editor")),
        "title" => Ok(FieldEdit::Title(value.to_string())),
        "type" | "kind" => ItemKind::parse(value)
            .map(FieldEdit::Kind)
            .ok_or_else(|| invalid("expected chapter or section")),
        "order" => value
            .parse::<u32>()
            .map(FieldEdit::Order)
            .map_err(|_| invalid("expected a non-negative integer")),
        name => {
            let value = serde_json::from_str::<Value>(value)
                .unwrap_or_else(|_| Value::String(value.to_string()));
            Ok(FieldEdit::Extra {
                name: name.to_string(),
                value,
            })
        }
    }
}

#[cfg(test)]
#[path = "tests/command_tests.rs"]
mod tests;
