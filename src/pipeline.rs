//! The three-stage external toolchain that renders one icon.
//!
//! Each (symbol, color) unit walks `latex` → `dvipng` → `mogrify` inside a
//! fresh temporary workspace. Stages are described as [`StageCommand`] data
//! and executed through the [`CommandRunner`] trait, so tests can substitute
//! a scripted runner and assert on exactly what would be invoked.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::catalog::SymbolRecord;
use crate::config::{BuildConfig, ICON_SIZE};
use crate::naming::BASE_PACKAGE;
use crate::types::{BuildOutcome, IconColor};

/// Name of the TeX job inside a unit's workspace.
const JOB_BASENAME: &str = "symbol";

/// One external-tool invocation: program, arguments, working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCommand {
    pub program: &'static str,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

/// Executes stage commands to completion.
pub trait CommandRunner {
    /// Runs the command, returning whether it exited successfully. Failure
    /// to spawn counts as an unsuccessful exit.
    fn run(&self, command: &StageCommand) -> bool;
}

/// Runner invoking the real toolchain. Tool output is discarded; failure is
/// judged on exit status (plus artifact checks made by the pipeline).
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &StageCommand) -> bool {
        match Command::new(command.program)
            .args(&command.args)
            .current_dir(&command.cwd)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) => status.success(),
            Err(error) => {
                tracing::warn!("failed to spawn {}: {error}", command.program);
                false
            }
        }
    }
}

/// Builds the minimal standalone document wrapping one symbol command.
///
/// Math-mode commands are wrapped in inline-math delimiters; a package
/// import is injected unless the symbol belongs to core LaTeX, and a
/// `fontenc` directive when the record carries one.
pub fn tex_source(record: &SymbolRecord, color: IconColor) -> String {
    let mut packages = String::new();
    if let Some(package) = &record.package {
        if !package.eq_ignore_ascii_case(BASE_PACKAGE) {
            packages.push_str(&format!("\\usepackage{{{package}}}\n"));
        }
    }
    if let Some(fontenc) = &record.fontenc {
        packages.push_str(&format!("\\usepackage[{fontenc}]{{fontenc}}\n"));
    }
    let body = if record.kind.wraps_math() {
        format!("${}$", record.command)
    } else {
        record.command.clone()
    };
    format!(
        "\\documentclass[10pt]{{article}}\n\
         \\usepackage[utf8]{{inputenc}}\n\
         \\usepackage{{color}}\n\
         {packages}\
         \\pagestyle{{empty}}\n\
         \\begin{{document}}\n\
         \\color{{{color}}}\n\
         {body}\n\
         \\end{{document}}\n"
    )
}

pub fn compile_command(workspace: &Path, tex_path: &Path) -> StageCommand {
    StageCommand {
        program: "latex",
        args: vec![
            "-interaction=batchmode".to_string(),
            format!("-output-directory={}", workspace.display()),
            tex_path.display().to_string(),
        ],
        cwd: workspace.to_path_buf(),
    }
}

pub fn rasterize_command(
    config: &BuildConfig,
    workspace: &Path,
    dvi_path: &Path,
    output: &Path,
) -> StageCommand {
    StageCommand {
        program: "dvipng",
        args: vec![
            "-bg".to_string(),
            "Transparent".to_string(),
            "-T".to_string(),
            "tight".to_string(),
            "-D".to_string(),
            config.dpi.to_string(),
            "--gamma".to_string(),
            config.gamma.to_string(),
            dvi_path.display().to_string(),
            "-o".to_string(),
            output.display().to_string(),
        ],
        cwd: workspace.to_path_buf(),
    }
}

/// Pad/crop to the fixed square canvas, transparency preserved. Icons are
/// anchored at the south edge so glyph baselines line up across the set.
pub fn resize_command(workspace: &Path, output: &Path) -> StageCommand {
    let canvas = format!("{ICON_SIZE}x{ICON_SIZE}");
    StageCommand {
        program: "mogrify",
        args: vec![
            "-resize".to_string(),
            format!("{canvas}>"),
            "-extent".to_string(),
            canvas,
            "-background".to_string(),
            "transparent".to_string(),
            "-gravity".to_string(),
            "south".to_string(),
            output.display().to_string(),
        ],
        cwd: workspace.to_path_buf(),
    }
}

/// Renders one (symbol, color) unit into `target`.
///
/// The unit's workspace is removed on every exit path. Output is written
/// under a staging name next to `target` and renamed into place only after
/// all three stages succeed, so a failed or interrupted unit never leaves a
/// half-built icon at the final path.
pub fn render_icon(
    config: &BuildConfig,
    runner: &dyn CommandRunner,
    record: &SymbolRecord,
    color: IconColor,
    target: &Path,
) -> BuildOutcome {
    let workspace = match tempfile::tempdir() {
        Ok(workspace) => workspace,
        Err(error) => {
            tracing::warn!("failed to create build workspace: {error}");
            return BuildOutcome::CompileFailed;
        }
    };

    let tex_path = workspace.path().join(format!("{JOB_BASENAME}.tex"));
    let dvi_path = workspace.path().join(format!("{JOB_BASENAME}.dvi"));
    if let Err(error) = fs::write(&tex_path, tex_source(record, color)) {
        tracing::warn!("failed to write tex source: {error}");
        return BuildOutcome::CompileFailed;
    }

    // latex can exit zero yet bail out before writing the DVI, so the
    // artifact check is not redundant with the status check.
    let compile = compile_command(workspace.path(), &tex_path);
    if !runner.run(&compile) || !dvi_path.is_file() {
        return BuildOutcome::CompileFailed;
    }

    let staging = staging_path(target);
    let rasterize = rasterize_command(config, workspace.path(), &dvi_path, &staging);
    if !runner.run(&rasterize) {
        remove_staging(&staging);
        return BuildOutcome::RasterizeFailed;
    }

    let resize = resize_command(workspace.path(), &staging);
    if !runner.run(&resize) {
        remove_staging(&staging);
        return BuildOutcome::ResizeFailed;
    }

    match fs::rename(&staging, target) {
        Ok(()) => BuildOutcome::Generated,
        Err(error) => {
            tracing::warn!("failed to move icon into place at {}: {error}", target.display());
            remove_staging(&staging);
            BuildOutcome::ResizeFailed
        }
    }
}

/// Staging sibling of the final icon path. Same directory, so the final
/// rename never crosses a filesystem boundary.
fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    target.with_file_name(name)
}

fn remove_staging(path: &Path) {
    if let Err(error) = fs::remove_file(path) {
        if error.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("failed to remove staging file {}: {error}", path.display());
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted runner shared by pipeline and orchestrator tests.

    use std::cell::RefCell;
    use std::fs;

    use super::{CommandRunner, StageCommand, JOB_BASENAME};

    /// Records every command and fabricates the artifacts a successful stage
    /// would have produced. Failures can be scripted per program, or per
    /// unit by matching a marker in the generated TeX source.
    pub(crate) struct FakeRunner {
        pub commands: RefCell<Vec<StageCommand>>,
        pub fail_program: Option<&'static str>,
        pub fail_tex_containing: Option<&'static str>,
        pub skip_artifacts: bool,
    }

    impl FakeRunner {
        pub fn succeeding() -> Self {
            Self {
                commands: RefCell::new(Vec::new()),
                fail_program: None,
                fail_tex_containing: None,
                skip_artifacts: false,
            }
        }

        pub fn failing_at(program: &'static str) -> Self {
            Self { fail_program: Some(program), ..Self::succeeding() }
        }

        pub fn failing_for_tex(marker: &'static str) -> Self {
            Self { fail_tex_containing: Some(marker), ..Self::succeeding() }
        }

        pub fn without_artifacts() -> Self {
            Self { skip_artifacts: true, ..Self::succeeding() }
        }

        pub fn invocations(&self) -> usize {
            self.commands.borrow().len()
        }

        pub fn programs(&self) -> Vec<&'static str> {
            self.commands.borrow().iter().map(|c| c.program).collect()
        }

        fn output_arg(command: &StageCommand) -> Option<String> {
            let mut args = command.args.iter();
            while let Some(arg) = args.next() {
                if arg == "-o" {
                    return args.next().cloned();
                }
            }
            None
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, command: &StageCommand) -> bool {
            self.commands.borrow_mut().push(command.clone());
            if self.fail_program == Some(command.program) {
                return false;
            }
            if command.program == "latex" {
                let tex = fs::read_to_string(command.cwd.join(format!("{JOB_BASENAME}.tex")))
                    .unwrap_or_default();
                if let Some(marker) = self.fail_tex_containing {
                    if tex.contains(marker) {
                        return false;
                    }
                }
                if !self.skip_artifacts {
                    fs::write(command.cwd.join(format!("{JOB_BASENAME}.dvi")), b"dvi")
                        .expect("write dvi artifact");
                }
            }
            if command.program == "dvipng" {
                let output = Self::output_arg(command).expect("dvipng -o argument");
                fs::write(output, b"png").expect("write png artifact");
            }
            true
        }
    }
}
