//! Built-in shell commands.

mod add;
mod delete;
mod edit;
mod find;
mod get;
mod help;
mod path;
mod quit;
mod tags;

pub use add::AddCommand;
pub use delete::DeleteCommand;
pub use edit::EditCommand;
pub use find::FindCommand;
pub use get::GetCommand;
pub use help::HelpCommand;
pub use path::PathCommand;
pub use quit::QuitCommand;
pub use tags::TagsCommand;

use std::sync::Arc;

use super::command::CommandRegistry;

/// Registers all built-in commands with the registry.
pub fn register_all(registry: &mut CommandRegistry) {
    registry.register(Arc::new(AddCommand));
    registry.register(Arc::new(FindCommand));
    registry.register(Arc::new(GetCommand));
    registry.register(Arc::new(EditCommand));
    registry.register(Arc::new(TagsCommand));
    registry.register(Arc::new(DeleteCommand));
    registry.register(Arc::new(PathCommand));
    registry.register(Arc::new(HelpCommand));
    registry.register(Arc::new(QuitCommand));
}
