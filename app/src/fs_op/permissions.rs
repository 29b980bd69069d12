//! Permission bits: the `rwx` codec and the inspect/change helpers.
//!
//! Only the low nine bits (owner/group/other triads) are modelled here.
//! Setuid, setgid and sticky bits are masked away on read; the OS keeps
//! whatever it already had for them.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::fs_op::error::{FsOpError, Result};

const PERMISSION_MASK: u32 = 0o777;

/// A validated nine-bit permission value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mode(u32);

impl Mode {
    /// `rwxr-xr-x`, the default for created folders.
    pub const DIR_DEFAULT: Mode = Mode(0o755);

    /// Build a `Mode`, rejecting anything above `0o777`.
    pub fn new(bits: u32) -> Result<Self> {
        if bits > PERMISSION_MASK {
            return Err(FsOpError::InvalidPermissions(bits));
        }
        Ok(Mode(bits))
    }

    /// Build a `Mode` from a raw `st_mode`, discarding file-type and
    /// special bits.
    pub fn from_raw(st_mode: u32) -> Self {
        Mode(st_mode & PERMISSION_MASK)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn to_symbolic(self) -> String {
        [6u32, 3, 0]
            .into_iter()
            .map(|shift| digit_to_symbol(((self.0 >> shift) & 0o7) as u8))
            .collect()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_symbolic())
    }
}

impl fmt::Octal for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Octal::fmt(&self.0, f)
    }
}

impl FromStr for Mode {
    type Err = FsOpError;

    /// Accepts octal (`755`, `0755`, `0o755`) or symbolic (`rwxr-xr-x`).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() == 9 && !s.bytes().all(|b| b.is_ascii_digit()) {
            return symbol_to_value(s).map(Mode);
        }
        let digits = s.strip_prefix("0o").unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
            return Err(FsOpError::InvalidSymbolic(s.to_string()));
        }
        let bits = u32::from_str_radix(digits, 8).map_err(|_| FsOpError::InvalidSymbolic(s.to_string()))?;
        Mode::new(bits)
    }
}

/// Convert one octal digit into its `rwx` triad, e.g. `5` -> `r-x`.
/// Only the low three bits are read.
pub fn digit_to_symbol(digit: u8) -> &'static str {
    const TRIADS: [&str; 8] = ["---", "--x", "-w-", "-wx", "r--", "r-x", "rw-", "rwx"];
    TRIADS[(digit & 0o7) as usize]
}

/// Convert a permission value (e.g. `0o755`) into `rwxr-xr-x`.
pub fn value_to_symbol(value: u32) -> Result<String> {
    Mode::new(value).map(Mode::to_symbolic)
}

/// Parse a nine-character `rwx` string back into its permission value.
pub fn symbol_to_value(symbolic: &str) -> Result<u32> {
    let bytes = symbolic.as_bytes();
    if bytes.len() != 9 {
        return Err(FsOpError::InvalidSymbolic(symbolic.to_string()));
    }
    let mut value = 0u32;
    for (i, &b) in bytes.iter().enumerate() {
        let expected = b"rwx"[i % 3];
        value <<= 1;
        if b == expected {
            value |= 1;
        } else if b != b'-' {
            return Err(FsOpError::InvalidSymbolic(symbolic.to_string()));
        }
    }
    Ok(value)
}

/// Permission snapshot of a single path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionInfo {
    pub path: PathBuf,
    pub mode: Mode,
    pub symbolic: String,
    pub is_dir: bool,
}

/// Read the permission bits of `path`, following symlinks.
pub fn get_permissions<P: AsRef<Path>>(path: P) -> Result<Mode> {
    let p = path.as_ref();
    if !p.exists() {
        return Err(FsOpError::FileNotFound(p.to_path_buf()));
    }
    Ok(mode_of(&fs::metadata(p)?))
}

/// Read permission bits plus a few descriptive fields for `path`.
pub fn inspect_permissions<P: AsRef<Path>>(path: P) -> Result<PermissionInfo> {
    let p = path.as_ref();
    if !p.exists() {
        return Err(FsOpError::FileNotFound(p.to_path_buf()));
    }
    let meta = fs::metadata(p)?;
    let mode = mode_of(&meta);
    Ok(PermissionInfo {
        path: p.to_path_buf(),
        mode,
        symbolic: mode.to_symbolic(),
        is_dir: meta.is_dir(),
    })
}

/// Set the permission bits of `path` to `mode`.
pub fn change_permissions<P: AsRef<Path>>(path: P, mode: Mode) -> std::io::Result<()> {
    let p = path.as_ref();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(p, fs::Permissions::from_mode(mode.bits()))
    }
    #[cfg(not(unix))]
    {
        // Only the owner write bit maps onto the read-only flag.
        let mut perms = fs::metadata(p)?.permissions();
        perms.set_readonly(mode.bits() & 0o200 == 0);
        fs::set_permissions(p, perms)
    }
}

/// Extract the nine permission bits from already-fetched metadata.
pub(crate) fn mode_of(meta: &fs::Metadata) -> Mode {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Mode::from_raw(meta.permissions().mode())
    }
    #[cfg(not(unix))]
    {
        let base = if meta.is_dir() { 0o555 } else { 0o444 };
        if meta.permissions().readonly() {
            Mode::from_raw(base)
        } else {
            Mode::from_raw(base | 0o222)
        }
    }
}
