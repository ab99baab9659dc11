use anyhow::{anyhow, Context, Result};
use tracing::{debug, instrument};
use xcb::{
    screensaver::{QueryInfo, QueryInfoReply, QueryVersion},
    x::{Drawable, Window},
    Connection, Extension,
};

use super::IdleSource;

/// Reads idle time through the MIT-SCREEN-SAVER extension. The connection is opened once and
/// closed when the source is dropped.
pub struct X11IdleSource {
    connection: Connection,
    root: Window,
}

impl X11IdleSource {
    pub fn new() -> Result<Self> {
        let (connection, preferred_screen) =
            Connection::connect_with_extensions(None, &[Extension::ScreenSaver], &[])
                .context("cannot open display")?;

        // Currently the application only supports 1 x11 screen.
        let root = connection
            .get_setup()
            .roots()
            .nth(preferred_screen.max(0) as usize)
            .ok_or_else(|| anyhow!("display has no screen {preferred_screen}"))?
            .root();

        let version = connection
            .wait_for_reply(connection.send_request(&QueryVersion {
                client_major_version: 1,
                client_minor_version: 1,
            }))
            .context("screensaver extension is not available")?;
        debug!(
            "Using screensaver extension {}.{} on screen {preferred_screen}",
            version.server_major_version(),
            version.server_minor_version()
        );

        Ok(Self { connection, root })
    }
}

impl IdleSource for X11IdleSource {
    #[instrument(skip(self))]
    fn idle_time(&mut self) -> Result<u32> {
        let cookie = self.connection.send_request(&QueryInfo {
            drawable: Drawable::Window(self.root),
        });
        let reply: QueryInfoReply = self
            .connection
            .wait_for_reply(cookie)
            .context("cannot query screensaver info")?;
        Ok(reply.ms_since_user_input())
    }
}
