//! Request-scoped containers for key material and decrypted plaintext.
//!
//! Passphrase-derived keys, per-envelope AES keys, and decrypted payloads
//! live in these types for the lifetime of a single conversion:
//! - zeroized on drop via [`zeroize`]
//! - best-effort `mlock` so pages are not swapped out
//! - `Debug`/`Display` output is masked
//!
//! [`disable_core_dumps`] is called once by the server at startup.

use crate::error::CodecError;
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretSlice};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ---------------------------------------------------------------------------
// Page locking
// ---------------------------------------------------------------------------

/// Guard over an `mlock`'d region; unlocks on drop.
///
/// Locking is best-effort. Containers stay usable (and are still zeroized)
/// when the platform refuses the lock.
pub struct LockedRegion {
    ptr: *const u8,
    len: usize,
    locked: bool,
}

// SAFETY: The pointer is only handed to mlock/munlock, which are
// thread-safe. The data itself is owned by SecretBuffer/SecretBytes.
unsafe impl Send for LockedRegion {}
unsafe impl Sync for LockedRegion {}

impl LockedRegion {
    /// Lock `len` bytes at `ptr`. Callers guarantee the region outlives the guard.
    #[must_use]
    pub(crate) fn try_lock(ptr: *const u8, len: usize) -> Self {
        let locked = platform::try_mlock(ptr, len);
        if !locked && len > 0 {
            static WARNED: std::sync::Once = std::sync::Once::new();
            WARNED.call_once(|| {
                tracing::warn!(
                    "mlock unavailable; request key material may be swapped to disk \
                     (raise RLIMIT_MEMLOCK to enable locking)"
                );
            });
        }
        Self { ptr, len, locked }
    }

    /// A guard that locks nothing.
    const fn unlocked() -> Self {
        Self {
            ptr: std::ptr::null(),
            len: 0,
            locked: false,
        }
    }

    /// Whether the region is currently locked.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }
}

impl Drop for LockedRegion {
    fn drop(&mut self) {
        if self.locked {
            platform::try_munlock(self.ptr, self.len);
        }
    }
}

// ---------------------------------------------------------------------------
// SecretBuffer
// ---------------------------------------------------------------------------

/// Heap buffer for variable-length secrets (derived keys, decrypted text).
///
/// Backed by [`SecretSlice<u8>`], which zeroizes its allocation on drop.
pub struct SecretBuffer {
    inner: SecretSlice<u8>,
    lock: LockedRegion,
}

impl SecretBuffer {
    /// Copy `data` into a new locked allocation.
    ///
    /// The caller remains responsible for zeroizing its own copy.
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` keeps the signature stable for
    /// allocators that can report failure.
    pub fn new(data: &[u8]) -> Result<Self, CodecError> {
        let inner: SecretSlice<u8> = data.to_vec().into();
        let exposed = inner.expose_secret();
        let lock = LockedRegion::try_lock(exposed.as_ptr(), exposed.len());
        Ok(Self { inner, lock })
    }

    /// A buffer of `len` CSPRNG bytes.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::SecureMemory` if the OS RNG fails.
    pub fn random(len: usize) -> Result<Self, CodecError> {
        let mut bytes = vec![0u8; len];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CodecError::SecureMemory(format!("CSPRNG fill failed: {e}")))?;
        let result = Self::new(&bytes);
        bytes.zeroize();
        result
    }

    /// Borrow the secret bytes. Keep the borrow as short as possible.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    /// Interpret the contents as UTF-8 and copy them out as a `String`.
    ///
    /// Used for decrypted payloads that are handed back to the caller.
    #[must_use]
    pub fn to_utf8(&self) -> Option<String> {
        std::str::from_utf8(self.expose()).ok().map(str::to_owned)
    }

    /// Number of bytes held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.expose().len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the backing pages were successfully `mlock`'d.
    #[must_use]
    pub const fn is_mlocked(&self) -> bool {
        self.lock.is_locked()
    }
}

impl fmt::Debug for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretBuffer(***)")
    }
}

impl fmt::Display for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretBuffer(***)")
    }
}

// ---------------------------------------------------------------------------
// SecretBytes<N>
// ---------------------------------------------------------------------------

/// Fixed-size secret, used for the random AES key of a hybrid envelope.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes<const N: usize> {
    bytes: [u8; N],
    #[zeroize(skip)]
    lock: LockedRegion,
}

impl<const N: usize> SecretBytes<N> {
    /// Take ownership of `data`.
    ///
    /// The lock covers the address at construction time; a later move leaves
    /// it pointing at the old slot, and `munlock` there is a harmless no-op.
    /// Zeroize-on-drop does not depend on the lock.
    #[must_use]
    pub fn new(data: [u8; N]) -> Self {
        let mut s = Self {
            bytes: data,
            lock: LockedRegion::unlocked(),
        };
        s.lock = LockedRegion::try_lock(s.bytes.as_ptr(), N);
        s
    }

    /// `N` CSPRNG bytes.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::SecureMemory` if the OS RNG fails.
    pub fn random() -> Result<Self, CodecError> {
        let mut bytes = [0u8; N];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CodecError::SecureMemory(format!("CSPRNG fill failed: {e}")))?;
        let secret = Self::new(bytes);
        bytes.zeroize();
        Ok(secret)
    }

    /// Borrow the secret bytes.
    #[must_use]
    pub const fn expose(&self) -> &[u8; N] {
        &self.bytes
    }
}

impl<const N: usize> fmt::Debug for SecretBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes<{N}>(***)")
    }
}

// ---------------------------------------------------------------------------
// Core dumps
// ---------------------------------------------------------------------------

/// Set `RLIMIT_CORE` to zero so a crash never writes request secrets to disk.
///
/// No-op on non-Unix targets.
///
/// # Errors
///
/// Returns `CodecError::SecureMemory` if `setrlimit` fails.
pub fn disable_core_dumps() -> Result<(), CodecError> {
    platform::disable_core_dumps_impl()
}

#[cfg(unix)]
mod platform {
    use crate::error::CodecError;

    pub(super) fn try_mlock(ptr: *const u8, len: usize) -> bool {
        if len == 0 {
            return true;
        }
        // SAFETY: mlock only inspects the address range; an invalid range
        // yields ENOMEM, which we treat as "not locked".
        unsafe { libc::mlock(ptr.cast(), len) == 0 }
    }

    pub(super) fn try_munlock(ptr: *const u8, len: usize) {
        if len == 0 {
            return;
        }
        // SAFETY: munlock on any range is sound; failure is ignored.
        unsafe {
            libc::munlock(ptr.cast(), len);
        }
    }

    pub(super) fn disable_core_dumps_impl() -> Result<(), CodecError> {
        let limit = libc::rlimit {
            rlim_cur: 0,
            rlim_max: 0,
        };
        // SAFETY: plain POSIX call with a valid pointer to a local.
        let ret = unsafe { libc::setrlimit(libc::RLIMIT_CORE, &raw const limit) };
        if ret != 0 {
            return Err(CodecError::SecureMemory(
                "failed to disable core dumps via RLIMIT_CORE".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(not(unix))]
mod platform {
    use crate::error::CodecError;

    pub(super) fn try_mlock(_ptr: *const u8, _len: usize) -> bool {
        false
    }

    pub(super) fn try_munlock(_ptr: *const u8, _len: usize) {}

    pub(super) fn disable_core_dumps_impl() -> Result<(), CodecError> {
        Ok(())
    }
}
