//! Host bindings: the command registry, the save trigger, and the
//! [`Extension`] tying them to the checker and the report panels.
//!
//! Commands are plain data: an identifier mapped to a handler function and
//! the surface its result is shown on. Hosts dispatch identifiers coming
//! from their own command palette or key bindings.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use redpen_config::Config;
use thiserror::Error;
use tracing::debug;

use crate::document::Document;
use crate::notify::Notifier;
use crate::pipeline::{Checker, ValidationOutcome};
use crate::presenter::{ReportPresenter, ReportSurfaces, Surface};
use crate::process::ToolRunner;

const COMMANDS_TARGET: &str = "redpen_checker::commands";

/// Identifier of the whole-document command.
pub const VALIDATE_COMMAND: &str = "redpen-check:validate";

/// Identifier of the selected-text command.
pub const VALIDATE_SELECTION_COMMAND: &str = "redpen-check:validate-selection";

/// Future returned by a command handler.
pub type CommandFuture<'a> = Pin<Box<dyn Future<Output = ValidationOutcome> + 'a>>;

/// Function running a command against a document.
pub type CommandHandler<R, N> = for<'a> fn(&'a Checker<R, N>, &'a Document) -> CommandFuture<'a>;

/// Errors raised by the command registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// No command is registered under the identifier.
    #[error("unknown command '{id}'")]
    Unknown {
        /// Identifier that was dispatched.
        id: String,
    },
    /// A command is already registered under the identifier.
    #[error("command '{id}' is already registered")]
    Duplicate {
        /// Identifier that was registered twice.
        id: String,
    },
}

/// A registered command.
pub struct Command<R, N> {
    surface: Surface,
    handler: CommandHandler<R, N>,
}

impl<R, N> Clone for Command<R, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, N> Copy for Command<R, N> {}

impl<R, N> Command<R, N> {
    /// Creates a command presenting on `surface`.
    #[must_use]
    pub const fn new(surface: Surface, handler: CommandHandler<R, N>) -> Self {
        Self { surface, handler }
    }

    /// Surface the command's result is shown on.
    #[must_use]
    pub const fn surface(&self) -> Surface {
        self.surface
    }
}

fn validate_document<'a, R: ToolRunner, N: Notifier>(
    checker: &'a Checker<R, N>,
    document: &'a Document,
) -> CommandFuture<'a> {
    Box::pin(checker.validate_document(document))
}

fn validate_selection<'a, R: ToolRunner, N: Notifier>(
    checker: &'a Checker<R, N>,
    document: &'a Document,
) -> CommandFuture<'a> {
    Box::pin(checker.validate_selection(document))
}

/// Mapping from command identifiers to commands.
pub struct CommandRegistry<R, N> {
    commands: BTreeMap<String, Command<R, N>>,
}

impl<R, N> Default for CommandRegistry<R, N> {
    fn default() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }
}

impl<R, N> CommandRegistry<R, N> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `command` under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Duplicate`] when `id` is taken.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        command: Command<R, N>,
    ) -> Result<(), CommandError> {
        let key = id.into();
        if self.commands.contains_key(&key) {
            return Err(CommandError::Duplicate { id: key });
        }
        self.commands.insert(key, command);
        Ok(())
    }

    /// Looks up a command.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Command<R, N>> {
        self.commands.get(id).copied()
    }

    /// Registered identifiers in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }
}

impl<R: ToolRunner, N: Notifier> CommandRegistry<R, N> {
    /// Registry holding the whole-document and selection commands.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut commands = BTreeMap::new();
        commands.insert(
            VALIDATE_COMMAND.to_owned(),
            Command::new(Surface::Primary, validate_document::<R, N>),
        );
        commands.insert(
            VALIDATE_SELECTION_COMMAND.to_owned(),
            Command::new(Surface::Selection, validate_selection::<R, N>),
        );
        Self { commands }
    }
}

/// Decides whether a save should trigger validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveTrigger {
    enabled: bool,
    extensions: Vec<String>,
}

impl SaveTrigger {
    /// Creates a trigger; `extensions` may carry a leading dot and any case.
    #[must_use]
    pub fn new<I, S>(enabled: bool, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self {
            enabled,
            extensions: allowed,
        }
    }

    /// Returns whether saving `document` should validate it.
    ///
    /// An empty allow-list accepts every document.
    #[must_use]
    pub fn accepts(&self, document: &Document) -> bool {
        if !self.enabled {
            return false;
        }
        if self.extensions.is_empty() {
            return true;
        }
        document
            .extension()
            .is_some_and(|ext| self.extensions.iter().any(|allowed| *allowed == ext))
    }
}

impl From<&Config> for SaveTrigger {
    fn from(config: &Config) -> Self {
        Self::new(config.validate_on_save, &config.validate_extensions)
    }
}

/// Result of dispatching a command.
#[derive(Debug)]
pub struct Dispatch {
    /// Surface the result was presented on.
    pub surface: Surface,
    /// What happened.
    pub outcome: ValidationOutcome,
}

/// The checker as seen by an editor host.
///
/// Created once when the host activates the integration and dropped (after
/// [`Extension::deactivate`]) when it shuts down.
pub struct Extension<R, N> {
    checker: Checker<R, N>,
    commands: CommandRegistry<R, N>,
    surfaces: ReportSurfaces,
    presenter: ReportPresenter,
    save_trigger: SaveTrigger,
}

impl<R: ToolRunner, N: Notifier> Extension<R, N> {
    /// Creates an extension with the default commands and fresh panels.
    #[must_use]
    pub fn new(checker: Checker<R, N>, save_trigger: SaveTrigger) -> Self {
        Self {
            checker,
            commands: CommandRegistry::with_defaults(),
            surfaces: ReportSurfaces::new(),
            presenter: ReportPresenter,
            save_trigger,
        }
    }

    /// The checker.
    #[must_use]
    pub const fn checker(&self) -> &Checker<R, N> {
        &self.checker
    }

    /// The report panels.
    #[must_use]
    pub const fn surfaces(&self) -> &ReportSurfaces {
        &self.surfaces
    }

    /// Runs the command registered under `id` and presents its result.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Unknown`] when nothing is registered under
    /// `id`. Validation failures are part of the returned outcome.
    pub async fn dispatch(
        &mut self,
        id: &str,
        document: &Document,
    ) -> Result<Dispatch, CommandError> {
        let command = self.commands.get(id).ok_or_else(|| CommandError::Unknown {
            id: id.to_owned(),
        })?;
        debug!(
            target: COMMANDS_TARGET,
            command = id,
            document = %document.title(),
            "dispatching command"
        );
        let outcome = (command.handler)(&self.checker, document).await;
        self.present(command.surface, &outcome);
        Ok(Dispatch {
            surface: command.surface,
            outcome,
        })
    }

    /// Validates `document` after a save when the save trigger accepts it.
    pub async fn on_save(&mut self, document: &Document) -> Option<Dispatch> {
        if !self.save_trigger.accepts(document) {
            debug!(
                target: COMMANDS_TARGET,
                document = %document.title(),
                "save does not trigger validation"
            );
            return None;
        }
        self.dispatch(VALIDATE_COMMAND, document).await.ok()
    }

    /// Presents an outcome computed outside [`Extension::dispatch`].
    ///
    /// Hosts that run several checks concurrently through
    /// [`Extension::checker`] present each result as it completes; the last
    /// one presented on a surface is what the panel shows.
    pub fn present(&mut self, surface: Surface, outcome: &ValidationOutcome) -> bool {
        self.presenter
            .present(self.surfaces.get_mut(surface), outcome)
    }

    /// Clears and hides both panels.
    pub fn deactivate(&mut self) {
        self.surfaces.dispose();
    }
}
