//! Splits a stream of REPL lines into directive texts.
//!
//! A line that closes every brace it opened is a directive on its own.
//! Objects spanning several lines are collected until their braces balance,
//! and fenced blocks until the closing fence. A blank line always ends the
//! current directive.

#[derive(Debug, Default)]
pub struct DirectiveReader {
    buf: String,
    depth: i32,
    in_string: bool,
    escaped: bool,
    in_fence: bool,
    saw_brace: bool,
}

impl DirectiveReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line; returns a directive once one is complete.
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        if line.trim().is_empty() {
            return self.flush();
        }

        if !self.buf.is_empty() {
            self.buf.push('\n');
        }
        self.buf.push_str(line);

        if line.trim_start().starts_with("```") {
            self.in_fence = !self.in_fence;
            return if self.in_fence { None } else { self.flush() };
        }
        self.scan(line);

        if self.in_fence || self.in_string {
            return None;
        }
        if !self.saw_brace || self.depth <= 0 {
            return self.flush();
        }
        None
    }

    /// Whatever is left once input ends.
    pub fn finish(&mut self) -> Option<String> {
        self.flush()
    }

    fn scan(&mut self, line: &str) {
        for c in line.chars() {
            if self.in_string {
                match c {
                    _ if self.escaped => self.escaped = false,
                    '\\' => self.escaped = true,
                    '"' => self.in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => self.in_string = true,
                '{' => {
                    self.saw_brace = true;
                    self.depth += 1;
                }
                '}' => self.depth -= 1,
                _ => {}
            }
        }
    }

    fn flush(&mut self) -> Option<String> {
        let text = std::mem::take(&mut self.buf);
        *self = Self::default();
        let text = text.trim().to_string();
        (!text.is_empty()).then_some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(input: &str) -> Vec<String> {
        let mut reader = DirectiveReader::new();
        let mut out: Vec<String> = input.lines().filter_map(|l| reader.push_line(l)).collect();
        out.extend(reader.finish());
        out
    }

    #[test]
    fn one_directive_per_line() {
        let got = split(
            "{\"command\": {\"name\": \"list_agents\"}}\n{\"command\": {\"name\": \"get_datetime\"}}\n",
        );
        assert_eq!(got.len(), 2);
        assert!(got[1].contains("get_datetime"));
    }

    #[test]
    fn multi_line_object_is_collected() {
        let input = "{\n  \"command\": {\n    \"name\": \"read_file\",\n    \"args\": {\"file\": \"a}.txt\"}\n  }\n}\n";
        let got = split(input);
        assert_eq!(got.len(), 1);
        assert!(got[0].starts_with('{') && got[0].ends_with('}'));
    }

    #[test]
    fn blank_line_ends_unbalanced_object() {
        let got = split("{\"command\": {\"name\": \"list_agents\"\n\n{\"command\": {\"name\": \"x\"}}");
        assert_eq!(got.len(), 2);
        assert_eq!(got[0], "{\"command\": {\"name\": \"list_agents\"");
    }

    #[test]
    fn truncated_directive_does_not_swallow_later_ones() {
        let input = concat!(
            "{\"command\": {\"name\": \"google\", \"args\": {\"input\": \"rust\n",
            "\n",
            "{\"command\": {\"name\": \"list_agents\"}}\n",
            "\n",
            "{\"command\": {\"name\": \"get_datetime\"}}\n",
        );
        let got = split(input);
        assert_eq!(got.len(), 3);
        assert!(got[0].ends_with("\"rust"));
        assert!(got[1].contains("list_agents"));
        assert!(got[2].contains("get_datetime"));
    }

    #[test]
    fn fenced_block_is_one_directive() {
        let input = "```json\n{\"command\": {\"name\": \"x\"}}\n```\nplain prose";
        let got = split(input);
        assert_eq!(got.len(), 2);
        assert!(got[0].starts_with("```json") && got[0].ends_with("```"));
        assert_eq!(got[1], "plain prose");
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert!(split("\n   \n\n").is_empty());
    }
}
