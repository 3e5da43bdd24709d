mod core;

pub use self::core::{CompletionProvider, Message, OpenAiCompletions, Role, completion};
