/// Built-in command table.
use crate::types::{ArgSpec, CommandDescriptor};

fn required(name: &'static str, placeholder: &'static str) -> ArgSpec {
    ArgSpec { name, placeholder, required: true }
}

fn optional(name: &'static str, placeholder: &'static str) -> ArgSpec {
    ArgSpec { name, placeholder, required: false }
}

fn command(
    id: u32,
    name: &'static str,
    display_name: &'static str,
    description: &'static str,
    args: Vec<ArgSpec>,
) -> CommandDescriptor {
    CommandDescriptor { id, name, display_name, description, args }
}

/// Every command the dispatcher understands, in numeric-id order.
pub fn builtin_commands() -> Vec<CommandDescriptor> {
    vec![
        command(1, "google", "Google Search", "Search the web and return result links.",
            vec![required("input", "<search_query>")]),
        command(2, "memory_add", "Memory Add", "Store a value in long-term memory. Key \"$time\" generates a unique key.",
            vec![required("key", "<key>"), required("value", "<string>")]),
        command(3, "memory_del", "Memory Delete", "Remove a key from long-term memory.",
            vec![required("key", "<key>")]),
        command(4, "memory_ovr", "Memory Overwrite", "Replace the value of an existing memory key.",
            vec![required("key", "<key>"), required("value", "<string>")]),
        command(5, "browse_website", "Browse Website", "Summarize a page and list some of its links.",
            vec![required("url", "<url>"), optional("question", "<what_you_want_to_find_on_website>")]),
        command(6, "start_agent", "Start GPT Agent", "Create a sub-agent and give it its first prompt.",
            vec![required("name", "<name>"), required("task", "<short_task_desc>"), required("prompt", "<prompt>")]),
        command(7, "message_agent", "Message GPT Agent", "Send a message to a running sub-agent.",
            vec![required("key", "<key>"), required("message", "<message>")]),
        command(8, "list_agents", "List GPT Agents", "List running sub-agents.", vec![]),
        command(9, "delete_agent", "Delete GPT Agent", "Stop a running sub-agent.",
            vec![required("key", "<key>")]),
        command(10, "write_to_file", "Write to file", "Write text to a workspace file, replacing it.",
            vec![required("file", "<file>"), required("text", "<text>")]),
        command(11, "read_file", "Read file", "Read a workspace file.",
            vec![required("file", "<file>")]),
        command(12, "append_to_file", "Append to file", "Append text to a workspace file.",
            vec![required("file", "<file>"), required("text", "<text>")]),
        command(13, "delete_file", "Delete file", "Delete a workspace file.",
            vec![required("file", "<file>")]),
        command(14, "evaluate_code", "Evaluate Code", "Suggest improvements for a piece of code.",
            vec![required("code", "<full_code_string>")]),
        command(15, "improve_code", "Get Improved Code", "Rewrite code applying the given suggestions.",
            vec![required("suggestions", "<list_of_suggestions>"), required("code", "<full_code_string>")]),
        command(16, "write_tests", "Write Tests", "Generate tests for a piece of code.",
            vec![required("code", "<full_code_string>"), optional("focus", "<list_of_focus_areas>")]),
        command(17, "execute_python_file", "Execute Python File", "Run a Python file from the workspace.",
            vec![required("file", "<file>")]),
        command(18, "task_complete", "Task Complete (Shutdown)", "Declare the task finished and shut down.",
            vec![optional("reason", "<reason>")]),
        command(19, "get_datetime", "Get Current Date and Time", "Report the local date and time.", vec![]),
        command(20, "get_url_text_summary", "Get Text Summary", "Summarize the text of a page.",
            vec![required("url", "<url>"), optional("question", "<question>")]),
        command(21, "get_hyperlinks", "Get Hyperlinks", "List every link on a page.",
            vec![required("url", "<url>")]),
    ]
}

/// Read-only lookup over the built-in command table.
pub struct CommandRegistry {
    commands: Vec<CommandDescriptor>,
}

impl CommandRegistry {
    pub fn builtin() -> Self {
        Self { commands: builtin_commands() }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|c| c.name == name)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Numbered command list for the model prompt.
    pub fn prompt_listing(&self) -> String {
        self.commands
            .iter()
            .map(|c| c.prompt_line())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
