//! Text of the generated debug statement

use tracepin_config::MessageConfig;

/// What the label of one statement is made of.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageContext<'a> {
    /// Expression that gets logged, usually the selection or its deep path
    pub variable: &'a str,
    pub file_name: Option<&'a str>,
    /// One-based line the statement will occupy
    pub line: usize,
    pub enclosing_class: Option<&'a str>,
    pub enclosing_function: Option<&'a str>,
}

/// `~` becomes ` ~ `; surrounding whitespace is normalized to one space.
pub fn spaced_delimiter(delimiter: &str) -> String {
    let trimmed = delimiter.trim();
    if trimmed.is_empty() {
        " ".to_string()
    } else {
        format!(" {trimmed} ")
    }
}

/// Assembles debug statements from a [`MessageConfig`].
#[derive(Debug, Clone, Copy)]
pub struct DebugMessageBuilder<'c> {
    config: &'c MessageConfig,
}

impl<'c> DebugMessageBuilder<'c> {
    pub fn new(config: &'c MessageConfig) -> Self {
        Self { config }
    }

    /// Label pieces in output order; disabled or unknown pieces are absent.
    fn label(&self, ctx: &MessageContext<'_>) -> String {
        let config = self.config;
        let mut pieces: Vec<String> = Vec::new();
        if !config.prefix.trim().is_empty() {
            pieces.push(config.prefix.trim().to_string());
        }

        let file = ctx.file_name.filter(|_| config.include_file_name);
        match (file, config.include_line_number) {
            (Some(file), true) => pieces.push(format!("{file}:{}", ctx.line)),
            (Some(file), false) => pieces.push(file.to_string()),
            (None, true) => pieces.push(ctx.line.to_string()),
            (None, false) => {}
        }

        if config.insert_enclosing_class {
            pieces.extend(ctx.enclosing_class.map(str::to_string));
        }
        if config.insert_enclosing_function {
            pieces.extend(ctx.enclosing_function.map(str::to_string));
        }
        pieces.push(format!("{}{}", ctx.variable, config.suffix));

        pieces.join(&spaced_delimiter(&config.delimiter))
    }

    fn quoted(&self, text: &str) -> String {
        let quote = &self.config.quote;
        if quote.is_empty() {
            return text.to_string();
        }
        let escaped = text.replace('\\', "\\\\").replace(quote.as_str(), &format!("\\{quote}"));
        format!("{quote}{escaped}{quote}")
    }

    fn terminated(&self, call: String) -> String {
        if self.config.add_semicolon {
            call + ";"
        } else {
            call
        }
    }

    /// The debug statement itself, e.g. `console.log("🚀 ~ app.ts:3 ~ user:", user);`.
    pub fn build(&self, ctx: &MessageContext<'_>) -> String {
        let label = self.quoted(&self.label(ctx));
        self.terminated(format!("{}({label}, {})", self.config.log_function, ctx.variable))
    }

    /// Banner statement printed above and below when wrapping is on.
    pub fn banner(&self, ctx: &MessageContext<'_>) -> String {
        let width = self.label(ctx).chars().count();
        let prefix = self.config.prefix.trim();
        let text = if prefix.is_empty() {
            "-".repeat(width)
        } else {
            format!("{prefix}{}{}", spaced_delimiter(&self.config.delimiter), "-".repeat(width))
        };
        self.terminated(format!("{}({})", self.config.log_function, self.quoted(&text)))
    }

    /// Lines the block places before the statement itself.
    pub fn lines_before_statement(&self) -> usize {
        usize::from(self.config.insert_empty_line_before) + usize::from(self.config.wrap_log_message)
    }

    /// The full insertion: blank lines, banners and statement, each line
    /// indented and newline-terminated.
    pub fn build_block(&self, ctx: &MessageContext<'_>, indent: &str) -> String {
        let mut out = String::new();
        if self.config.insert_empty_line_before {
            out.push('\n');
        }
        for line in self.statement_lines(ctx) {
            out.push_str(indent);
            out.push_str(&line);
            out.push('\n');
        }
        if self.config.insert_empty_line_after {
            out.push('\n');
        }
        out
    }

    /// Statement plus banners, unindented, for structural rewrites.
    pub fn build_statement(&self, ctx: &MessageContext<'_>) -> String {
        self.statement_lines(ctx).join("\n")
    }

    fn statement_lines(&self, ctx: &MessageContext<'_>) -> Vec<String> {
        if self.config.wrap_log_message {
            let banner = self.banner(ctx);
            vec![banner.clone(), self.build(ctx), banner]
        } else {
            vec![self.build(ctx)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plain_config() -> MessageConfig {
        MessageConfig {
            prefix: String::new(),
            quote: "'".to_string(),
            include_file_name: false,
            include_line_number: false,
            insert_enclosing_class: false,
            insert_enclosing_function: false,
            ..MessageConfig::default()
        }
    }

    fn context(variable: &str) -> MessageContext<'_> {
        MessageContext {
            variable,
            file_name: Some("app.ts"),
            line: 4,
            enclosing_class: Some("Store"),
            enclosing_function: Some("load"),
        }
    }

    #[test]
    fn test_plain_statement() {
        let config = plain_config();
        assert_eq!(DebugMessageBuilder::new(&config).build(&context("x")), "console.log('x:', x);");
    }

    #[test]
    fn test_full_label_with_defaults() {
        let config = MessageConfig::default();
        assert_eq!(
            DebugMessageBuilder::new(&config).build(&context("user")),
            "console.log(\"🚀 ~ app.ts:4 ~ Store ~ load ~ user:\", user);"
        );
    }

    #[test]
    fn test_file_and_line_are_colon_joined_only_together() {
        let mut config = plain_config();
        config.include_line_number = true;
        assert_eq!(DebugMessageBuilder::new(&config).build(&context("x")), "console.log('4 ~ x:', x);");
        config.include_file_name = true;
        config.include_line_number = false;
        assert_eq!(
            DebugMessageBuilder::new(&config).build(&context("x")),
            "console.log('app.ts ~ x:', x);"
        );
    }

    #[test]
    fn test_delimiter_spacing_and_semicolon() {
        assert_eq!(spaced_delimiter("  |"), " | ");
        assert_eq!(spaced_delimiter(""), " ");

        let mut config = plain_config();
        config.add_semicolon = false;
        config.include_line_number = true;
        config.delimiter = "|  ".to_string();
        assert_eq!(DebugMessageBuilder::new(&config).build(&context("x")), "console.log('4 | x:', x)");
    }

    #[test]
    fn test_quotes_in_the_label_are_escaped() {
        let config = plain_config();
        assert_eq!(
            DebugMessageBuilder::new(&config).build(&context("headers['id']")),
            "console.log('headers[\\'id\\']:', headers['id']);"
        );
    }

    #[test]
    fn test_block_with_wrapping_and_blank_lines() {
        let mut config = plain_config();
        config.wrap_log_message = true;
        config.insert_empty_line_before = true;
        let builder = DebugMessageBuilder::new(&config);
        assert_eq!(
            builder.build_block(&context("ab"), "  "),
            "\n  console.log('---');\n  console.log('ab:', ab);\n  console.log('---');\n"
        );
        assert_eq!(builder.lines_before_statement(), 2);
    }
}
