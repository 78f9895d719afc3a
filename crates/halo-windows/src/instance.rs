use halo_core::{Error, Result};
use windows::Win32::Foundation::{CloseHandle, ERROR_ALREADY_EXISTS, GetLastError, HANDLE};
use windows::Win32::System::Threading::CreateMutexW;
use windows::core::w;

/// Holds the named mutex that marks a running halo instance.
///
/// Released when dropped.
pub struct InstanceGuard {
    handle: HANDLE,
}

impl InstanceGuard {
    /// Claims the single-instance mutex for this session.
    ///
    /// Fails with [`Error::AlreadyRunning`] if another process holds it.
    pub fn acquire() -> Result<Self> {
        let handle = unsafe { CreateMutexW(None, true, w!("Local\\HaloBorderSingleInstance")) }
            .map_err(|e| Error::platform("CreateMutexW", e))?;
        if unsafe { GetLastError() } == ERROR_ALREADY_EXISTS {
            unsafe {
                let _ = CloseHandle(handle);
            }
            return Err(Error::AlreadyRunning);
        }
        Ok(Self { handle })
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.handle);
        }
    }
}
