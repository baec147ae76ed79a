use egui::Vec2;

use crate::document::Document;
use crate::element::{DrawableObject, Element, ObjectId};
use crate::error::{CommandError, CommandResult};

/// A reversible edit of the document.
///
/// Each variant stores only what the edit touched (one object, a delta, a list
/// of ids), never a snapshot of the whole document.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Insert an object, on top when `index` is `None`
    AddObject {
        object: DrawableObject,
        index: Option<usize>,
    },

    /// Remove the object found at `index`, restoring it there on undo
    RemoveObject { index: usize, object: DrawableObject },

    /// Translate several objects by the same delta
    MoveObjects { ids: Vec<ObjectId>, delta: Vec2 },

    /// Replace an object's geometry or properties (resize, rotate, restyle, rebind)
    ModifyObject {
        before: DrawableObject,
        after: DrawableObject,
    },

    /// Ordered composite; undone in reverse order
    Macro { label: String, commands: Vec<Command> },
}

impl Command {
    pub fn add(object: DrawableObject) -> Self {
        Command::AddObject { object, index: None }
    }

    pub fn insert(object: DrawableObject, index: usize) -> Self {
        Command::AddObject {
            object,
            index: Some(index),
        }
    }

    /// Remove a single object as it currently is in `document`
    pub fn remove(document: &Document, id: ObjectId) -> Option<Self> {
        let index = document.index_of(id)?;
        Some(Command::RemoveObject {
            index,
            object: document.objects()[index].clone(),
        })
    }

    /// Remove `ids` together with every connector attached to them.
    ///
    /// Removals run from the highest index down so each recorded index is still
    /// valid when it executes, and the reverse-order undo puts every object back
    /// at its original z position.
    pub fn remove_with_dependents(document: &Document, ids: &[ObjectId]) -> Option<Self> {
        let mut doomed: Vec<ObjectId> = Vec::new();
        for &id in ids {
            if !document.contains(id) {
                log::debug!("Skipping delete of missing object {}", id);
                continue;
            }
            for dependent in std::iter::once(id).chain(document.connectors_attached_to(id)) {
                if !doomed.contains(&dependent) {
                    doomed.push(dependent);
                }
            }
        }

        let mut removals: Vec<(usize, DrawableObject)> = doomed
            .into_iter()
            .filter_map(|id| {
                let index = document.index_of(id)?;
                Some((index, document.objects()[index].clone()))
            })
            .collect();
        removals.sort_by(|a, b| b.0.cmp(&a.0));

        let mut commands: Vec<Command> = removals
            .into_iter()
            .map(|(index, object)| Command::RemoveObject { index, object })
            .collect();

        match commands.len() {
            0 => None,
            1 => commands.pop(),
            n => Some(Command::Macro {
                label: format!("Delete {n} objects"),
                commands,
            }),
        }
    }

    pub fn move_objects(ids: Vec<ObjectId>, delta: Vec2) -> Self {
        Command::MoveObjects { ids, delta }
    }

    pub fn modify(before: DrawableObject, after: DrawableObject) -> Self {
        debug_assert_eq!(before.id(), after.id(), "modify must keep the object id");
        Command::ModifyObject { before, after }
    }

    pub fn macro_command(label: impl Into<String>, commands: Vec<Command>) -> Self {
        Command::Macro {
            label: label.into(),
            commands,
        }
    }

    /// Human readable description, e.g. "Add circle"
    pub fn label(&self) -> String {
        match self {
            Command::AddObject { object, .. } => format!("Add {}", object.kind()),
            Command::RemoveObject { object, .. } => format!("Delete {}", object.kind()),
            Command::MoveObjects { ids, .. } if ids.len() == 1 => "Move object".to_string(),
            Command::MoveObjects { ids, .. } => format!("Move {} objects", ids.len()),
            Command::ModifyObject { after, .. } => format!("Edit {}", after.kind()),
            Command::Macro { label, .. } => label.clone(),
        }
    }

    /// Apply the command, then let connectors catch up with their hosts
    pub fn execute(&self, document: &mut Document) -> CommandResult {
        self.apply(document)?;
        document.refresh_connectors();
        Ok(())
    }

    /// Reverse the command, then let connectors catch up with their hosts
    pub fn undo(&self, document: &mut Document) -> CommandResult {
        self.revert(document)?;
        document.refresh_connectors();
        Ok(())
    }

    fn apply(&self, document: &mut Document) -> CommandResult {
        match self {
            Command::AddObject { object, index } => {
                let index = index.unwrap_or(document.len());
                document.insert(index, object.clone())
            }

            Command::RemoveObject { index, object } => {
                if document.index_of(object.id()) != Some(*index) {
                    return Err(CommandError::ObjectNotFound(object.id()));
                }
                document.remove(object.id()).map(|_| ())
            }

            Command::MoveObjects { ids, delta } => translate_all(document, ids, *delta),

            Command::ModifyObject { after, .. } => document.replace(after.clone()).map(|_| ()),

            Command::Macro { commands, .. } => {
                for (index, command) in commands.iter().enumerate() {
                    if let Err(source) = command.apply(document) {
                        // Leave the document as it was before the macro started
                        for done in commands[..index].iter().rev() {
                            if let Err(err) = done.revert(document) {
                                log::error!("Rollback of '{}' failed: {}", done.label(), err);
                            }
                        }
                        return Err(CommandError::Macro {
                            index,
                            source: Box::new(source),
                        });
                    }
                }
                Ok(())
            }
        }
    }

    fn revert(&self, document: &mut Document) -> CommandResult {
        match self {
            Command::AddObject { object, .. } => document.remove(object.id()).map(|_| ()),

            Command::RemoveObject { index, object } => document.insert(*index, object.clone()),

            Command::MoveObjects { ids, delta } => translate_all(document, ids, -*delta),

            Command::ModifyObject { before, .. } => document.replace(before.clone()).map(|_| ()),

            Command::Macro { commands, .. } => {
                for (index, command) in commands.iter().enumerate().rev() {
                    command.revert(document).map_err(|source| CommandError::Macro {
                        index,
                        source: Box::new(source),
                    })?;
                }
                Ok(())
            }
        }
    }
}

fn translate_all(document: &mut Document, ids: &[ObjectId], delta: Vec2) -> CommandResult {
    // Validate first so a missing id never leaves a half-moved selection
    if let Some(missing) = ids.iter().find(|id| !document.contains(**id)) {
        return Err(CommandError::ObjectNotFound(*missing));
    }
    for id in ids {
        document.get_mut(*id)?.translate(delta);
    }
    Ok(())
}
