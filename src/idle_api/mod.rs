//! Contains logic for asking the desktop environment how long the user has been inactive.
//! [GenericIdleSource] is the main artifact of this module that abstracts the operations.

#[cfg(feature = "win")]
pub mod win;
#[cfg(feature = "x11")]
pub mod x11;

#[cfg(feature = "win")]
extern crate windows;

#[cfg(feature = "x11")]
extern crate xcb;

use anyhow::Result;

/// Intended to serve as a contract windows and linux systems must implement.
///
/// Implementations are queried once per scheduler iteration, so a query must be cheap and must
/// not change anything on the queried system. Any error is treated as fatal by the caller.
#[cfg_attr(test, mockall::automock)]
pub trait IdleSource {
    /// Retrieve amount of time user has been inactive in milliseconds
    fn idle_time(&mut self) -> Result<u32>;
}

/// Serves as a cross-compatible IdleSource implementation.
pub struct GenericIdleSource {
    inner: Box<dyn IdleSource>,
}

impl GenericIdleSource {
    pub fn new() -> Result<Self> {
        cfg_if::cfg_if! {
            if #[cfg(feature = "win")] {
                use win::WindowsIdleSource;
                Ok(Self {
                    inner: Box::new(WindowsIdleSource::new()),
                })
            }
            else if #[cfg(feature = "x11")] {
                use x11::X11IdleSource;
                Ok(Self {
                    inner: Box::new(X11IdleSource::new()?),
                })
            }
            else {
                // Still compiles without a platform so the core can be built and tested anywhere.
                Err(anyhow::anyhow!(
                    "no idle source available, build with the `x11` or `win` feature"
                ))
            }
        }
    }
}

impl IdleSource for GenericIdleSource {
    fn idle_time(&mut self) -> Result<u32> {
        self.inner.idle_time()
    }
}
