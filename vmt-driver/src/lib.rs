//! Hack VM Translator - Driver
//!
//! Ties the pipeline together: discover and parse the modules of a program,
//! decide on the bootstrap prologue, then generate every module's code
//! against one shared [`TranslationContext`].

pub mod discovery;

use hack_asm::Line;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use vmt_codegen::{emit_program, generate, generate_bootstrap, CodegenError, TranslationContext, BOOTSTRAP_FUNCTION};
use vmt_common::{Diagnostic, DiagnosticReporter, SourceLocation};
use vmt_frontend::{Frontend, Instruction, ParseError, VmModule};

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{location}: {source}")]
    Codegen {
        location: SourceLocation,
        #[source]
        source: CodegenError,
    },

    #[error("{location}: unrecognized instruction `{text}`")]
    Malformed { location: SourceLocation, text: String },

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no .vm files found in {}", .0.display())]
    NoModules(PathBuf),

    #[error("{} is neither a .vm file nor a directory", .0.display())]
    InvalidInput(PathBuf),

    #[error("module name `{0}` is not a valid assembler symbol; rename the file")]
    InvalidModuleName(String),
}

/// Translator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatorOptions {
    /// Precede each instruction's code with a comment restating it
    pub emit_comments: bool,
    /// Treat unrecognized instructions as fatal instead of skipping them
    pub strict: bool,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            emit_comments: true,
            strict: false,
        }
    }
}

/// Result of translating a whole program
#[derive(Debug, Clone)]
pub struct TranslationOutput {
    pub lines: Vec<Line>,
    /// Module names in translation order
    pub modules: Vec<String>,
    pub warnings: Vec<Diagnostic>,
    /// Human-readable warning count, e.g. "2 warnings"
    pub summary: String,
    pub has_bootstrap: bool,
    emit_comments: bool,
}

impl TranslationOutput {
    /// The program as assembly text
    pub fn render(&self) -> String {
        emit_program(&self.lines, &self.modules, self.emit_comments)
    }
}

pub struct Translator {
    options: TranslatorOptions,
}

impl Translator {
    pub fn new(options: TranslatorOptions) -> Self {
        Self { options }
    }

    /// Translate in-memory sources given as `(module name, text)` pairs
    pub fn translate_sources(&self, sources: &[(&str, &str)]) -> Result<TranslationOutput, TranslateError> {
        let modules = sources
            .iter()
            .map(|(name, text)| Frontend::parse_module(name, text))
            .collect::<Result<Vec<_>, _>>()?;
        self.translate_modules(&modules)
    }

    /// Translate a `.vm` file or a directory of them
    pub fn translate_path(&self, input: &Path) -> Result<TranslationOutput, TranslateError> {
        let modules = discovery::load_modules(input)?;
        self.translate_modules(&modules)
    }

    /// Translate parsed modules in the given order
    pub fn translate_modules(&self, modules: &[VmModule]) -> Result<TranslationOutput, TranslateError> {
        let mut reporter = DiagnosticReporter::new();
        for module in modules {
            discovery::check_module_name(&module.name)?;
            for diagnostic in &module.diagnostics {
                reporter.report(diagnostic.clone());
            }
        }

        let mut ctx = TranslationContext::new().with_comments(self.options.emit_comments);

        let has_bootstrap = modules.iter().any(|m| m.defines_function(BOOTSTRAP_FUNCTION));
        if has_bootstrap {
            generate_bootstrap(&mut ctx).map_err(|source| TranslateError::Codegen {
                location: SourceLocation::dummy(),
                source,
            })?;
        } else {
            debug!("No {} defined, omitting bootstrap", BOOTSTRAP_FUNCTION);
        }

        for module in modules {
            ctx.set_module(&module.name);
            for parsed in &module.instructions {
                if let Instruction::Malformed { text } = &parsed.instruction {
                    if self.options.strict {
                        return Err(TranslateError::Malformed {
                            location: parsed.location.clone(),
                            text: text.clone(),
                        });
                    }
                    warn!("{}: skipping unrecognized instruction `{}`", parsed.location, text);
                    reporter.warning(
                        format!("skipping unrecognized instruction `{}`", text),
                        parsed.location.clone(),
                    );
                    continue;
                }

                generate(&parsed.instruction, &mut ctx).map_err(|source| TranslateError::Codegen {
                    location: parsed.location.clone(),
                    source,
                })?;
            }
        }

        debug!(
            "Translated {} modules, {} unique labels",
            modules.len(),
            ctx.unique_count()
        );

        Ok(TranslationOutput {
            lines: ctx.take_output(),
            modules: modules.iter().map(|m| m.name.clone()).collect(),
            summary: reporter.summary(),
            warnings: reporter.into_diagnostics(),
            has_bootstrap,
            emit_comments: self.options.emit_comments,
        })
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(TranslatorOptions::default())
    }
}
