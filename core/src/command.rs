use log::debug;

pub const CREATE_PAGE_COMMAND_ID: &str = "create-page";
pub const CREATE_PAGE_COMMAND_NAME: &str = "Create Page with Template";

/// What the front end does when a command runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    CreatePage,
}

pub struct Command {
    pub id: &'static str,
    pub name: &'static str,
    pub action: CommandAction,
    check: Box<dyn Fn() -> bool + Send + Sync>,
}

impl Command {
    pub fn new<F>(id: &'static str, name: &'static str, action: CommandAction, check: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            id,
            name,
            action,
            check: Box::new(check),
        }
    }

    /// Whether the command can run right now
    pub fn is_enabled(&self) -> bool {
        (self.check)()
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command, replacing any registered with the same id
    pub fn register(&mut self, command: Command) {
        debug!("Registering command `{}`", command.id);
        self.commands.retain(|c| c.id != command.id);
        self.commands.push(command);
    }

    pub fn get(&self, id: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.id == id)
    }

    /// The commands that can run now, in registration order
    pub fn enabled(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(|c| c.is_enabled())
    }

    /// The action for `id` if the command exists and is enabled
    pub fn action_for(&self, id: &str) -> Option<CommandAction> {
        self.get(id)
            .filter(|command| command.is_enabled())
            .map(|command| command.action)
    }
}

pub fn create_page_command() -> Command {
    Command::new(
        CREATE_PAGE_COMMAND_ID,
        CREATE_PAGE_COMMAND_NAME,
        CommandAction::CreatePage,
        || true,
    )
}
