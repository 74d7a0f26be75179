//! SIGINT / SIGTERM → stop signal.
//!
//! The stop signals are blocked in the calling thread before any other
//! thread exists, so every thread inherits the mask and no handler ever
//! runs asynchronously.  A dedicated watcher thread collects them with
//! `sigwait` and raises the loop's [`StopSignal`].

use core::ffi::c_int;
use std::mem::MaybeUninit;
use std::thread::{self, JoinHandle};

use log::{error, info};

use crate::app::service::StopSignal;
use crate::error::Error;

/// Stop signal raised by the watcher thread.
pub static STOP: StopSignal = StopSignal::new();

const STOP_SIGNALS: [c_int; 2] = [libc::SIGINT, libc::SIGTERM];

fn signal_set(signals: &[c_int]) -> libc::sigset_t {
    let mut set = MaybeUninit::<libc::sigset_t>::uninit();
    // SAFETY: sigemptyset initialises the set before sigaddset touches it.
    unsafe {
        libc::sigemptyset(set.as_mut_ptr());
        for &sig in signals {
            libc::sigaddset(set.as_mut_ptr(), sig);
        }
        set.assume_init()
    }
}

/// Block SIGINT and SIGTERM, then start the watcher for `stop`.
///
/// Must be called before any other thread is spawned.
pub fn spawn_watcher(stop: &'static StopSignal) -> Result<JoinHandle<()>, Error> {
    spawn_for(&STOP_SIGNALS, stop)
}

fn spawn_for(signals: &[c_int], stop: &'static StopSignal) -> Result<JoinHandle<()>, Error> {
    let set = signal_set(signals);

    // SAFETY: `set` is initialised; the old mask is not requested.
    let ret = unsafe { libc::pthread_sigmask(libc::SIG_BLOCK, &set, core::ptr::null_mut()) };
    if ret != 0 {
        return Err(Error::Init("cannot block stop signals"));
    }

    thread::Builder::new()
        .name("signals".into())
        .spawn(move || watch(&set, stop))
        .map_err(|_| Error::Init("cannot spawn signal watcher"))
}

fn watch(set: &libc::sigset_t, stop: &StopSignal) {
    let mut sig: c_int = 0;
    // SAFETY: both pointers are valid for the duration of the call.
    let ret = unsafe { libc::sigwait(set, &mut sig) };
    if ret == 0 {
        info!("Received signal {}, stopping", sig);
    } else {
        error!("sigwait failed ({}), stopping", ret);
    }
    stop.signal(());
}
