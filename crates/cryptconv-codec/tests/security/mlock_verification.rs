//! mlock and core dump checks. Unix only.

use cryptconv_codec::memory::{disable_core_dumps, SecretBuffer};

#[cfg(unix)]
#[test]
fn secret_buffer_reports_mlock_status() {
    let buf = SecretBuffer::new(b"mlock test data").expect("allocation should succeed");
    // Containers often run with RLIMIT_MEMLOCK at 0, so either answer is fine.
    eprintln!("mlock status: {}", buf.is_mlocked());
}

#[cfg(target_os = "linux")]
#[test]
fn locked_buffer_is_counted_in_vmlck() {
    let before = read_vmlck_kb();
    let buf = SecretBuffer::new(&vec![0xAA; 65_536]).expect("allocation should succeed");

    if buf.is_mlocked() {
        let after = read_vmlck_kb();
        assert!(
            after >= before,
            "VmLck went down after mlock: before={before}KB, after={after}KB"
        );
    } else {
        eprintln!("mlock refused (insufficient quota); skipping VmLck check");
    }
}

#[cfg(target_os = "linux")]
fn read_vmlck_kb() -> u64 {
    let status =
        std::fs::read_to_string("/proc/self/status").expect("failed to read /proc/self/status");
    status
        .lines()
        .find_map(|line| line.strip_prefix("VmLck:"))
        .and_then(|rest| rest.trim().trim_end_matches("kB").trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(unix)]
#[test]
fn disable_core_dumps_sets_rlimit_zero() {
    disable_core_dumps().expect("disable_core_dumps should succeed");

    let mut limit = libc::rlimit {
        rlim_cur: 1,
        rlim_max: 1,
    };
    let ret = unsafe { libc::getrlimit(libc::RLIMIT_CORE, &raw mut limit) };
    assert_eq!(ret, 0, "getrlimit failed");
    assert_eq!(limit.rlim_cur, 0, "RLIMIT_CORE soft limit should be 0");
}
