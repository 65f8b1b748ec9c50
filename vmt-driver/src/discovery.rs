//! Locating the modules of a program and naming its output

use crate::TranslateError;
use hack_asm::types::is_valid_symbol;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use vmt_frontend::{Frontend, VmModule};

pub const VM_EXTENSION: &str = "vm";
pub const ASM_EXTENSION: &str = "asm";

/// Output name used when a directory has no usable name of its own
const FALLBACK_OUTPUT_NAME: &str = "output";

pub fn is_vm_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == VM_EXTENSION)
}

/// Module name of a source file: its file name without the extension
pub fn module_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Module names prefix static symbols, so they must be assembler symbols
/// themselves. `-` or a space in a file name would otherwise break or merge
/// static cells.
pub fn check_module_name(name: &str) -> Result<(), TranslateError> {
    if is_valid_symbol(name) {
        Ok(())
    } else {
        Err(TranslateError::InvalidModuleName(name.to_string()))
    }
}

/// Source files making up the program at `input`.
///
/// A file is a one-module program. A directory contributes every `.vm`
/// file directly inside it, ordered by file name.
pub fn discover_modules(input: &Path) -> Result<Vec<PathBuf>, TranslateError> {
    if input.is_dir() {
        let entries = fs::read_dir(input).map_err(|source| TranslateError::Io {
            path: input.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| TranslateError::Io {
                path: input.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if is_vm_file(&path) {
                files.push(path);
            }
        }

        if files.is_empty() {
            return Err(TranslateError::NoModules(input.to_path_buf()));
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        debug!("Found {} modules in {}", files.len(), input.display());
        Ok(files)
    } else if is_vm_file(input) {
        Ok(vec![input.to_path_buf()])
    } else if !input.exists() {
        Err(TranslateError::Io {
            path: input.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
        })
    } else {
        Err(TranslateError::InvalidInput(input.to_path_buf()))
    }
}

/// Read and parse one module file
pub fn load_module(path: &Path) -> Result<VmModule, TranslateError> {
    let source = fs::read_to_string(path).map_err(|source| TranslateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = module_name(path);
    check_module_name(&name)?;
    debug!("Parsing {}", path.display());
    Ok(Frontend::parse_module(&name, &source)?)
}

/// Discover and parse every module of the program at `input`, in order
pub fn load_modules(input: &Path) -> Result<Vec<VmModule>, TranslateError> {
    discover_modules(input)?
        .iter()
        .map(|path| load_module(path))
        .collect()
}

/// Default output file: `X.vm` becomes `X.asm`, directory `D` becomes `D/D.asm`
pub fn output_path(input: &Path) -> PathBuf {
    if input.is_dir() {
        let name = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| FALLBACK_OUTPUT_NAME.to_string());
        input.join(format!("{}.{}", name, ASM_EXTENSION))
    } else {
        input.with_extension(ASM_EXTENSION)
    }
}
