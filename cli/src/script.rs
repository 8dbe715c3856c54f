//! JSON command scripts replayed against a [`Document`].
//!
//! A script is a JSON array of `{ "op": ..., ... }` objects. Commands that
//! create an element (`addGemstone`, `addText`, `addImage`, `duplicate`,
//! `bezel`) append its id to a creation list, and later commands name
//! elements by their position in that list (`"target": 0` is the first
//! element created).

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use std::path::Path;

use ring_canvas::assets::ImageLoader;
use ring_canvas::document::{Document, Step};
use ring_canvas::element::{ElementId, ElementKind, GemstoneType, TextSpec};
use ring_canvas::error::{DocumentError, SceneError};
use ring_canvas::scene::Property;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Command {
    AddGemstone {
        gemstone: String,
    },
    AddText(TextSpec),
    AddImage {
        path: String,
        #[serde(default = "default_image_kind")]
        kind: String,
        name: Option<String>,
        gemstone: Option<String>,
    },
    Delete {
        target: usize,
    },
    Duplicate {
        target: usize,
    },
    Set {
        target: usize,
        key: String,
        value: Value,
    },
    Reorder {
        target: usize,
        index: usize,
    },
    Bezel {
        target: usize,
        style: String,
        metal: String,
    },
    Select {
        target: usize,
    },
    Undo,
    Redo,
}

fn default_image_kind() -> String {
    "custom".to_owned()
}

impl Command {
    pub fn op(&self) -> &'static str {
        match self {
            Self::AddGemstone { .. } => "addGemstone",
            Self::AddText(_) => "addText",
            Self::AddImage { .. } => "addImage",
            Self::Delete { .. } => "delete",
            Self::Duplicate { .. } => "duplicate",
            Self::Set { .. } => "set",
            Self::Reorder { .. } => "reorder",
            Self::Bezel { .. } => "bezel",
            Self::Select { .. } => "select",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }
}

/// Why a single command failed.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("no element #{0} has been created")]
    UnknownTarget(usize),
    #[error("unknown {0} `{1}`")]
    Unknown(&'static str, String),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl From<SceneError> for StepError {
    fn from(err: SceneError) -> Self {
        Self::Document(err.into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("step {step} ({op}): {source}")]
    Step {
        step: usize,
        op: &'static str,
        #[source]
        source: StepError,
    },
}

/// Parse a script file's contents.
///
/// # Errors
///
/// `Parse` if the text is not a JSON array of known commands.
pub fn parse(text: &str) -> Result<Vec<Command>, ScriptError> {
    Ok(serde_json::from_str(text)?)
}

pub struct Runner<'a> {
    loader: &'a dyn ImageLoader,
    created: Vec<ElementId>,
}

impl<'a> Runner<'a> {
    pub fn new(loader: &'a dyn ImageLoader) -> Self {
        Self { loader, created: Vec::new() }
    }

    /// Ids of created elements, in creation order.
    pub fn created(&self) -> &[ElementId] {
        &self.created
    }

    /// Apply `commands` in order, stopping at the first failure. Commands
    /// before the failing one stay applied.
    ///
    /// # Errors
    ///
    /// `Step` naming the failing command's position and op.
    pub async fn run(&mut self, doc: &mut Document, commands: Vec<Command>) -> Result<(), ScriptError> {
        for (step, command) in commands.into_iter().enumerate() {
            let op = command.op();
            self.step(doc, command).await.map_err(|source| ScriptError::Step { step, op, source })?;
            tracing::debug!(step, op, elements = doc.scene().len(), "applied");
        }
        Ok(())
    }

    async fn step(&mut self, doc: &mut Document, command: Command) -> Result<(), StepError> {
        match command {
            Command::AddGemstone { gemstone } => {
                let id = doc.add_gemstone(GemstoneType::parse(&gemstone))?;
                self.created.push(id);
            }
            Command::AddText(spec) => {
                let id = doc.add_text(&spec)?;
                self.created.push(id);
            }
            Command::AddImage { path, kind, name, gemstone } => {
                let kind = ElementKind::parse(&kind).ok_or(StepError::Unknown("kind", kind))?;
                let name = name.unwrap_or_else(|| file_name(&path));
                let gemstone = gemstone.as_deref().map(GemstoneType::parse);
                let request = doc.image_request(&path, &name, kind, gemstone)?;
                let id = doc.add_image(self.loader, request).await?;
                self.created.push(id);
            }
            Command::Delete { target } => doc.delete_element(self.target(target)?)?,
            Command::Duplicate { target } => {
                let id = doc.duplicate_element(self.target(target)?)?;
                self.created.push(id);
            }
            Command::Set { target, key, value } => {
                let prop = Property::parse(&key, &value)?;
                doc.set_property(self.target(target)?, prop)?;
            }
            Command::Reorder { target, index } => doc.reorder(self.target(target)?, index)?,
            Command::Bezel { target, style, metal } => {
                let id = doc.add_bezel(self.target(target)?, &style, &metal)?;
                self.created.push(id);
            }
            Command::Select { target } => doc.select(self.target(target)?)?,
            Command::Undo => {
                if doc.undo()? == Step::AtBoundary {
                    tracing::info!("nothing to undo");
                }
            }
            Command::Redo => {
                if doc.redo()? == Step::AtBoundary {
                    tracing::info!("nothing to redo");
                }
            }
        }
        Ok(())
    }

    fn target(&self, index: usize) -> Result<ElementId, StepError> {
        self.created.get(index).copied().ok_or(StepError::UnknownTarget(index))
    }
}

fn file_name(path: &str) -> String {
    Path::new(path).file_name().map_or_else(|| path.to_owned(), |name| name.to_string_lossy().into_owned())
}
