//! CLI command implementations.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ls8_common::Program;
use ls8_vm::Config;
use tracing::debug;

/// Load and execute an .ls8 image, printing PRN output to stdout.
pub fn run(path: &Path, max_steps: Option<u64>) -> Result<(), i32> {
    let program = read_image(path)?;

    let mut config = Config::default();
    if let Some(limit) = max_steps {
        config = config.with_step_limit(limit);
    }

    match ls8_vm::run_with_config(&program, config, io::stdout()) {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(3)
        }
    }
}

/// Print the assembly listing of an .ls8 image.
pub fn disassemble(path: &Path) -> Result<(), i32> {
    let program = read_image(path)?;
    print!("{}", ls8_asm::disassemble(program.bytes()));
    Ok(())
}

/// Assemble a source file and write the result as .ls8 text.
pub fn assemble(input: &Path, output: Option<&Path>) -> Result<(), i32> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input));

    let text = read_text(input)?;
    let bytes = ls8_asm::assemble(&text).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    fs::write(&output, ls8_asm::to_image_text(&bytes)).map_err(|e| {
        eprintln!("error: cannot write '{}': {e}", output.display());
        1
    })?;

    eprintln!("assembled {} bytes -> {}", bytes.len(), output.display());
    Ok(())
}

// ---- Helpers ----

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("ls8")
}

fn read_text(path: &Path) -> Result<String, i32> {
    fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{}': {e}", path.display());
        1
    })
}

fn read_image(path: &Path) -> Result<Program, i32> {
    let text = read_text(path)?;
    let bytes = ls8_asm::load_image(&text).map_err(|e| {
        eprintln!("error: {}: {e}", path.display());
        1
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "image loaded");
    Program::new(bytes).map_err(|e| {
        eprintln!("error: {}: {e}", path.display());
        1
    })
}
