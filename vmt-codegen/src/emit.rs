//! Assembly text output

use hack_asm::Line;

/// Render lines as assembly text, one per line
pub fn emit_lines(lines: &[Line]) -> String {
    let mut text = String::new();
    for line in lines {
        text.push_str(&line.to_string());
        text.push('\n');
    }
    text
}

/// Render a complete program, with an optional header comment naming its
/// source modules
pub fn emit_program(lines: &[Line], modules: &[String], with_header: bool) -> String {
    let mut text = String::new();
    if with_header && !modules.is_empty() {
        text.push_str(&format!("// Translated from {}\n", modules.join(", ")));
    }
    text.push_str(&emit_lines(lines));
    text
}
