//! Runs an external OCR engine (tesseract by default) over a receipt image.

use crate::errors::{AppError, AppResult};
use std::path::Path;
use std::process::Command;

/// Split the configured command template into program + arguments,
/// substituting `{image}`. Without a placeholder the image goes last.
pub fn build_command(template: &str, image: &Path) -> AppResult<(String, Vec<String>)> {
    let image_str = image.to_string_lossy().to_string();
    let mut parts = template.split_whitespace().map(str::to_string);

    let program = parts
        .next()
        .ok_or_else(|| AppError::Ocr("OCR command is empty; set `ocr_command` in the config".into()))?;

    let mut args: Vec<String> = parts.collect();
    let mut substituted = false;
    for arg in args.iter_mut() {
        if arg.contains("{image}") {
            *arg = arg.replace("{image}", &image_str);
            substituted = true;
        }
    }
    if !substituted {
        args.push(image_str);
    }

    Ok((program, args))
}

pub fn run_ocr(template: &str, image: &Path) -> AppResult<String> {
    if !image.exists() {
        return Err(AppError::Ocr(format!("Image not found: {}", image.display())));
    }

    let (program, args) = build_command(template, image)?;
    let output = Command::new(&program)
        .args(&args)
        .output()
        .map_err(|e| AppError::Ocr(format!("Failed to run '{}': {}", program, e)))?;

    if !output.status.success() {
        return Err(AppError::Ocr(format!(
            "'{}' exited with {}: {}",
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
