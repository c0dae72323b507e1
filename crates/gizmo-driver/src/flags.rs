//! Compiler, assembler and linker argument vectors.

use gizmo_build::{BuildKind, Profile};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const WARNING_FLAGS: &[&str] = &[
    "-Wall",
    "-Wextra",
    "-Wconversion",
    "-Wunreachable-code",
    "-Wshadow",
    "-Wundef",
    "-Wfloat-equal",
    "-Wformat=0",
    "-Wpointer-arith",
    "-Winit-self",
    "-Wduplicated-branches",
    "-Wduplicated-cond",
    "-Wnull-dereference",
    "-Wswitch-enum",
    "-Wvla",
    "-Wnoexcept",
    "-Wswitch-default",
    "-Wno-main",
    "-Wno-shadow",
    "-Wshadow=local",
];

/// Code generation flags.
pub const GEN_FLAGS: &[&str] = &["-fwrapv", "-fno-exceptions", "-fno-rtti"];

pub const OTHER_FLAGS: &[&str] = &["-Werror", "-pipe"];

pub const MAX_ERRORS_FLAG: &str = "-fmax-errors=1";
pub const DEBUG_INFO_FLAG: &str = "-ggdb";
pub const LTO_FLAG: &str = "-flto";

/// C++ standard revision passed as `-std=c++<N>`.
pub const STD_VERSION: &str = "20";

/// Optimization, LTO and debug-info flags for a kind.
pub fn profile_flags(kind: BuildKind) -> Vec<String> {
    let Profile {
        opt_level,
        debug_info,
        lto,
    } = kind.profile();

    let mut flags = Vec::with_capacity(3);
    if lto {
        flags.push(LTO_FLAG.to_string());
    }
    flags.push(format!("-O{opt_level}"));
    if debug_info {
        flags.push(DEBUG_INFO_FLAG.to_string());
    }
    flags
}

/// Arguments compiling `unit` into the object file `output`.
pub fn compile_args(kind: BuildKind, unit: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(
        GEN_FLAGS.len() + WARNING_FLAGS.len() + OTHER_FLAGS.len() + 10,
    );
    args.extend(GEN_FLAGS.iter().map(OsString::from));
    args.push(MAX_ERRORS_FLAG.into());
    args.extend(WARNING_FLAGS.iter().map(OsString::from));
    args.extend(OTHER_FLAGS.iter().map(OsString::from));
    args.push(format!("-std=c++{STD_VERSION}").into());
    args.extend(profile_flags(kind).into_iter().map(OsString::from));
    args.push("-o".into());
    args.push(output.into());
    args.push("-c".into());
    args.push(unit.into());
    args
}

/// Arguments assembling `sources` into the object file `output`.
pub fn assemble_args(sources: &[PathBuf], output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(2 + sources.len());
    args.push("-o".into());
    args.push(output.into());
    args.extend(sources.iter().map(OsString::from));
    args
}

/// Arguments linking `objects`, in order, into the executable `output`.
pub fn link_args(kind: BuildKind, objects: &[PathBuf], output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(5 + objects.len());
    args.extend(profile_flags(kind).into_iter().map(OsString::from));
    args.push("-o".into());
    args.push(output.into());
    args.extend(objects.iter().map(OsString::from));
    args
}
