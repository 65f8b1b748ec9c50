//! VM code lexer
//! 
//! VM code is line oriented: one instruction per line, `//` starts a comment
//! running to the end of the line, and words are separated by whitespace.

const COMMENT_MARKER: &str = "//";

/// The words of one non-blank source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTokens {
    /// 1-based line number in the module
    pub line: u32,
    pub words: Vec<String>,
}

impl LineTokens {
    /// The line as written, without its comment, for diagnostics
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

pub struct Lexer<'a> {
    input: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Split the input into lines of words, skipping blank and
    /// comment-only lines
    pub fn tokenize(&self) -> Vec<LineTokens> {
        self.input
            .lines()
            .enumerate()
            .filter_map(|(i, line)| {
                let code = strip_comment(line).trim();
                if code.is_empty() {
                    return None;
                }
                Some(LineTokens {
                    line: i as u32 + 1,
                    words: code.split_whitespace().map(str::to_string).collect(),
                })
            })
            .collect()
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_MARKER) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_tokenize_lines() {
        let source = indoc! {"
            // Pushes and adds two constants.
            push constant 7

            push   constant\t8   // second operand
            add
        "};

        let lines = Lexer::new(source).tokenize();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].line, 2);
        assert_eq!(lines[0].words, vec!["push", "constant", "7"]);
        assert_eq!(lines[1].line, 4);
        assert_eq!(lines[1].words, vec!["push", "constant", "8"]);
        assert_eq!(lines[2].words, vec!["add"]);
    }

    #[test]
    fn test_comment_glued_to_code() {
        let lines = Lexer::new("return//done").tokenize();
        assert_eq!(lines[0].words, vec!["return"]);
    }

    #[test]
    fn test_windows_line_endings() {
        let lines = Lexer::new("push constant 1\r\nadd\r\n").tokenize();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].words, vec!["push", "constant", "1"]);
        assert_eq!(lines[1].text(), "add");
    }

    #[test]
    fn test_only_comments() {
        assert!(Lexer::new("// a\n   // b\n\n").tokenize().is_empty());
    }
}
