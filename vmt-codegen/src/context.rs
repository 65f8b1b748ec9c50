//! Translation state shared by every generation call

use hack_asm::{Comp, Dest, Instruction as AsmInst, Jump, Line};
use log::debug;

/// State carried across an entire multi-module translation.
///
/// The unique counter and the function scope are program-wide; only the
/// module name changes between modules. Generated lines accumulate in the
/// context's output until taken.
#[derive(Debug, Clone)]
pub struct TranslationContext {
    current_function: Option<String>,
    unique_counter: u32,
    current_module: String,
    emit_comments: bool,
    output: Vec<Line>,
}

impl TranslationContext {
    pub fn new() -> Self {
        Self {
            current_function: None,
            unique_counter: 0,
            current_module: String::new(),
            emit_comments: true,
            output: Vec::new(),
        }
    }

    /// Enable or disable the comment line restating each VM instruction
    pub fn with_comments(mut self, emit_comments: bool) -> Self {
        self.emit_comments = emit_comments;
        self
    }

    /// Start translating a new module. Only static naming depends on this.
    pub fn set_module(&mut self, module: &str) {
        debug!("Translating module {}", module);
        self.current_module = module.to_string();
    }

    pub fn current_function(&self) -> Option<&str> {
        self.current_function.as_deref()
    }

    pub(crate) fn enter_function(&mut self, name: &str) {
        debug!("Entering function {}", name);
        self.current_function = Some(name.to_string());
    }

    /// The next value of the program-wide counter; never returns the same
    /// value twice
    pub fn next_unique(&mut self) -> u32 {
        let value = self.unique_counter;
        self.unique_counter += 1;
        value
    }

    /// Number of unique values handed out so far
    pub fn unique_count(&self) -> u32 {
        self.unique_counter
    }

    /// Branch target name for a VM label in the current scope
    pub fn scoped_label(&self, label: &str) -> String {
        match &self.current_function {
            Some(function) => format!("{}${}", function, label),
            None => label.to_string(),
        }
    }

    /// A fresh return-address label scoped by the calling function
    pub(crate) fn return_label(&mut self) -> String {
        let id = self.next_unique();
        format!("{}$ret.{}", self.current_function.as_deref().unwrap_or(""), id)
    }

    /// Assembler symbol of a static cell; unique per (module, index)
    pub fn static_symbol(&self, index: u16) -> String {
        format!("{}.{}", self.current_module, index)
    }

    pub fn output(&self) -> &[Line] {
        &self.output
    }

    /// Take the generated lines, leaving the context's state otherwise intact
    pub fn take_output(&mut self) -> Vec<Line> {
        std::mem::take(&mut self.output)
    }

    pub fn comment(&mut self, text: impl Into<String>) {
        if self.emit_comments {
            self.output.push(Line::Comment(text.into()));
        }
    }

    pub(crate) fn at(&mut self, symbol: impl Into<String>) {
        self.output.push(AsmInst::at(symbol).into());
    }

    pub(crate) fn at_value(&mut self, value: u16) {
        self.output.push(AsmInst::at_value(value).into());
    }

    pub(crate) fn assign(&mut self, dest: Dest, comp: Comp) {
        self.output.push(AsmInst::assign(dest, comp).into());
    }

    pub(crate) fn jump(&mut self, comp: Comp, jump: Jump) {
        self.output.push(AsmInst::jump(comp, jump).into());
    }

    pub(crate) fn label(&mut self, name: impl Into<String>) {
        self.output.push(Line::Label(name.into()));
    }
}

impl Default for TranslationContext {
    fn default() -> Self {
        Self::new()
    }
}
