pub mod io;


/// Reset SIGPIPE to default behavior (SIG_DFL).
/// Rust sets SIGPIPE to SIG_IGN by default, but a sorter feeding a pipe
/// should be killed by SIGPIPE (exit code 141 = 128 + 13) like other
/// line-oriented tools. Must be called at the start of main().
#[inline]
pub fn reset_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}
