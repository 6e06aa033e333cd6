//! Attaching to the game process.
//!
//! Process discovery, module enumeration and file version queries go
//! through Win32. On other platforms every constructor fails with
//! `ProcessNotFound` so the rest of the crate still builds and tests.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::offset::FileVersion;

/// Executable of the plain game client
pub const GAME_EXE: &str = "Game.exe";
/// Executable of the D2SE mod launcher, which hosts the game in-process
pub const D2SE_EXE: &str = "D2SE.exe";

/// A module mapped into the game process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub name: String,
    pub base_address: u64,
}

/// An open handle to the game process with read access
pub struct ProcessHandle {
    #[cfg(target_os = "windows")]
    handle: windows::Win32::Foundation::HANDLE,
    pub pid: u32,
    pub name: String,
    pub base_address: u64,
    pub exe_path: PathBuf,
}

impl ProcessHandle {
    /// Whether the game is hosted by D2SE rather than running standalone
    pub fn is_d2se(&self) -> bool {
        is_d2se_exe(&self.name)
    }
}

fn is_d2se_exe(name: &str) -> bool {
    name.eq_ignore_ascii_case(D2SE_EXE)
}

#[cfg(target_os = "windows")]
impl ProcessHandle {
    /// Find the first running process whose executable matches one of `names`
    pub fn find_and_open(names: &[&str]) -> Result<Self> {
        use windows::Win32::System::Diagnostics::ToolHelp::{
            CreateToolhelp32Snapshot, PROCESSENTRY32W, Process32FirstW, Process32NextW,
            TH32CS_SNAPPROCESS,
        };

        // SAFETY: the snapshot handle is closed below on every path.
        let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }
            .map_err(|e| Error::ProcessNotFound(format!("process snapshot failed: {e}")))?;

        let mut entry = PROCESSENTRY32W {
            dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };

        let mut found = None;
        // SAFETY: `entry` is a properly sized PROCESSENTRY32W.
        let mut more = unsafe { Process32FirstW(snapshot, &mut entry) }.is_ok();
        while more {
            let exe = utf16_until_nul(&entry.szExeFile);
            if names.iter().any(|n| n.eq_ignore_ascii_case(&exe)) {
                found = Some(entry.th32ProcessID);
                break;
            }
            // SAFETY: same snapshot and entry as above.
            more = unsafe { Process32NextW(snapshot, &mut entry) }.is_ok();
        }

        // SAFETY: handle came from CreateToolhelp32Snapshot.
        unsafe {
            let _ = windows::Win32::Foundation::CloseHandle(snapshot);
        }

        match found {
            Some(pid) => Self::open(pid),
            None => Err(Error::ProcessNotFound(names.join(", "))),
        }
    }

    /// Open a process by PID
    pub fn open(pid: u32) -> Result<Self> {
        use windows::Win32::Foundation::HMODULE;
        use windows::Win32::System::ProcessStatus::GetModuleFileNameExW;
        use windows::Win32::System::Threading::{
            OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ,
        };

        // SAFETY: OpenProcess has no preconditions; failure is reported as Err.
        let handle = unsafe { OpenProcess(PROCESS_QUERY_INFORMATION | PROCESS_VM_READ, false, pid) }
            .map_err(|e| Error::ProcessOpenFailed(format!("pid {pid}: {e}")))?;

        let mut path_buf = [0u16; 1024];
        // SAFETY: a null module handle queries the main executable.
        let len = unsafe { GetModuleFileNameExW(handle, HMODULE::default(), &mut path_buf) };
        let exe_path = PathBuf::from(String::from_utf16_lossy(&path_buf[..len as usize]));
        let name = exe_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut process = Self {
            handle,
            pid,
            name,
            base_address: 0,
            exe_path,
        };

        let modules = process.modules()?;
        process.base_address = modules
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(&process.name))
            .or_else(|| modules.first())
            .map(|m| m.base_address)
            .ok_or_else(|| Error::ProcessOpenFailed(format!("pid {pid}: no modules")))?;

        Ok(process)
    }

    /// Read `buffer.len()` bytes at `address`
    pub fn read_into(&self, address: u64, buffer: &mut [u8]) -> Result<()> {
        use std::ffi::c_void;
        use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;

        let mut bytes_read = 0usize;
        // SAFETY: buffer is valid for writes of buffer.len() bytes.
        unsafe {
            ReadProcessMemory(
                self.handle,
                address as *const c_void,
                buffer.as_mut_ptr() as *mut c_void,
                buffer.len(),
                Some(&mut bytes_read),
            )
        }
        .map_err(|e| Error::read_failed(address, e.to_string()))?;

        if bytes_read != buffer.len() {
            return Err(Error::read_failed(
                address,
                format!("partial read: {} of {} bytes", bytes_read, buffer.len()),
            ));
        }
        Ok(())
    }

    /// List every module loaded in the process
    pub fn modules(&self) -> Result<Vec<ModuleInfo>> {
        use windows::Win32::Foundation::HMODULE;
        use windows::Win32::System::ProcessStatus::{
            EnumProcessModulesEx, GetModuleFileNameExW, LIST_MODULES_ALL,
        };

        let mut handles = [HMODULE::default(); 1024];
        let mut needed = 0u32;
        // SAFETY: `handles` is sized as passed in `cb`.
        unsafe {
            EnumProcessModulesEx(
                self.handle,
                handles.as_mut_ptr(),
                std::mem::size_of_val(&handles) as u32,
                &mut needed,
                LIST_MODULES_ALL,
            )
        }
        .map_err(|e| Error::ProcessOpenFailed(format!("module enumeration failed: {e}")))?;

        let count = (needed as usize / std::mem::size_of::<HMODULE>()).min(handles.len());
        let mut modules = Vec::with_capacity(count);
        for module in &handles[..count] {
            let mut path_buf = [0u16; 512];
            // SAFETY: module handles come from EnumProcessModulesEx on this process.
            let len = unsafe { GetModuleFileNameExW(self.handle, *module, &mut path_buf) };
            if len == 0 {
                continue;
            }
            let path = String::from_utf16_lossy(&path_buf[..len as usize]);
            let name = Path::new(&path)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(path);
            modules.push(ModuleInfo {
                name,
                base_address: module.0 as u64,
            });
        }
        Ok(modules)
    }
}

#[cfg(target_os = "windows")]
impl Drop for ProcessHandle {
    fn drop(&mut self) {
        // SAFETY: handle was opened by OpenProcess and is closed once.
        unsafe {
            let _ = windows::Win32::Foundation::CloseHandle(self.handle);
        }
    }
}

#[cfg(target_os = "windows")]
fn utf16_until_nul(buf: &[u16]) -> String {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..len])
}

#[cfg(not(target_os = "windows"))]
impl ProcessHandle {
    pub fn find_and_open(names: &[&str]) -> Result<Self> {
        Err(Error::ProcessNotFound(format!(
            "{} (process access is only supported on Windows)",
            names.join(", ")
        )))
    }

    pub fn open(pid: u32) -> Result<Self> {
        Err(Error::ProcessNotFound(format!(
            "pid {pid} (process access is only supported on Windows)"
        )))
    }

    pub fn read_into(&self, address: u64, _buffer: &mut [u8]) -> Result<()> {
        Err(Error::read_failed(address, "unsupported platform"))
    }

    pub fn modules(&self) -> Result<Vec<ModuleInfo>> {
        Ok(Vec::new())
    }
}

/// Read the fixed file version resource of an executable
#[cfg(target_os = "windows")]
pub fn query_file_version(path: &Path) -> Result<FileVersion> {
    use std::ffi::c_void;
    use windows::Win32::Storage::FileSystem::{
        GetFileVersionInfoSizeW, GetFileVersionInfoW, VS_FIXEDFILEINFO, VerQueryValueW,
    };
    use windows::core::HSTRING;

    let file = HSTRING::from(path.as_os_str());
    // SAFETY: size query with no handle output.
    let size = unsafe { GetFileVersionInfoSizeW(&file, None) };
    if size == 0 {
        return Err(Error::VersionQueryFailed(format!(
            "{}: no version resource",
            path.display()
        )));
    }

    let mut data = vec![0u8; size as usize];
    // SAFETY: `data` holds `size` bytes as reported above.
    unsafe { GetFileVersionInfoW(&file, 0, size, data.as_mut_ptr() as *mut c_void) }
        .map_err(|e| Error::VersionQueryFailed(format!("{}: {e}", path.display())))?;

    let mut info: *mut c_void = std::ptr::null_mut();
    let mut info_len = 0u32;
    // SAFETY: `info` points into `data`, which outlives its use below.
    let found = unsafe {
        VerQueryValueW(
            data.as_ptr() as *const c_void,
            &HSTRING::from("\\"),
            &mut info,
            &mut info_len,
        )
    };
    if !found.as_bool()
        || info.is_null()
        || (info_len as usize) < std::mem::size_of::<VS_FIXEDFILEINFO>()
    {
        return Err(Error::VersionQueryFailed(format!(
            "{}: no fixed file info",
            path.display()
        )));
    }

    // SAFETY: checked non-null and large enough above.
    let fixed = unsafe { &*(info as *const VS_FIXEDFILEINFO) };
    Ok(FileVersion::from_dwords(
        fixed.dwFileVersionMS,
        fixed.dwFileVersionLS,
    ))
}

#[cfg(not(target_os = "windows"))]
pub fn query_file_version(path: &Path) -> Result<FileVersion> {
    Err(Error::VersionQueryFailed(format!(
        "{}: version resources are only readable on Windows",
        path.display()
    )))
}
