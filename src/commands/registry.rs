//! Fixed command table

use crate::{notify::Notification, state::Engine};

/// Action a command performs against the engine
pub type CommandAction = fn(&Engine) -> Notification;

/// A selectable command
#[derive(Clone, Copy)]
pub struct CommandDescriptor {
    /// Text the query is matched against
    pub keyword: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub action: CommandAction,
}

impl CommandDescriptor {
    /// Run the command's action
    pub fn invoke(&self, engine: &Engine) -> Notification {
        (self.action)(engine)
    }
}

impl std::fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("keyword", &self.keyword)
            .field("title", &self.title)
            .finish()
    }
}

/// Every command, in ranking tie-break order
pub static COMMANDS: [CommandDescriptor; 6] = [
    CommandDescriptor {
        keyword: "start",
        title: "Start session",
        subtitle: "Start a new Pomodoro session or resume a paused one",
        action: Engine::start_session,
    },
    CommandDescriptor {
        keyword: "stop",
        title: "Stop session",
        subtitle: "Stop the current session",
        action: Engine::stop_session,
    },
    CommandDescriptor {
        keyword: "pause",
        title: "Pause session",
        subtitle: "Pause the current session",
        action: Engine::pause_session,
    },
    CommandDescriptor {
        keyword: "skip",
        title: "Skip phase",
        subtitle: "Skip to the next phase in the session",
        action: Engine::skip_phase,
    },
    CommandDescriptor {
        keyword: "status",
        title: "Show status",
        subtitle: "Show session status",
        action: Engine::show_status,
    },
    CommandDescriptor {
        keyword: "help",
        title: "Help information",
        subtitle: "List the available commands",
        action: Engine::show_help,
    },
];

/// Look up a command by its exact keyword
pub fn find(keyword: &str) -> Option<&'static CommandDescriptor> {
    COMMANDS
        .iter()
        .find(|command| command.keyword.eq_ignore_ascii_case(keyword))
}
