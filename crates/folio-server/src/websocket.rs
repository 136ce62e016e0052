//! Live reload over WebSocket.
//!
//! Every browser tab opened on the dev server loads a small client script
//! that connects back to the server. The server broadcasts a
//! [`ReloadMessage`] after each batch of file changes.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Messages pushed to connected browsers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReloadMessage {
    /// Sent once after the socket opens
    Connected,

    /// Content changed; `changed` lists the files relative to the docs directory
    Reload { changed: Vec<String> },

    /// The docs could not be reloaded and the previous pages are still served
    Error { message: String },
}

/// Fan-out of reload messages to every connected browser.
#[derive(Debug, Clone)]
pub struct ReloadHub {
    sender: broadcast::Sender<ReloadMessage>,
}

impl ReloadHub {
    /// Create a hub buffering up to 16 undelivered messages per client.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    /// Broadcast a message, returning how many clients it reached.
    pub fn send(&self, msg: ReloadMessage) -> usize {
        self.sender.send(msg).unwrap_or(0)
    }

    /// Receiver for one client connection.
    pub fn subscribe(&self) -> broadcast::Receiver<ReloadMessage> {
        self.sender.subscribe()
    }

    /// Number of connected clients.
    pub fn client_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ReloadHub {
    fn default() -> Self {
        Self::new()
    }
}

const CLIENT_SCRIPT: &str = r#"(function () {
  'use strict';

  var url = (location.protocol === 'https:' ? 'wss://' : 'ws://') + location.host + '__SOCKET_PATH__';
  var retries = 0;

  function connect() {
    var socket = new WebSocket(url);

    socket.onopen = function () {
      if (retries > 0) {
        location.reload();
      }
      retries = 0;
    };

    socket.onmessage = function (event) {
      var msg = JSON.parse(event.data);
      if (msg.type === 'reload') {
        console.info('[folio] changed: ' + msg.changed.join(', '));
        location.reload();
      } else if (msg.type === 'error') {
        console.error('[folio] ' + msg.message);
      }
    };

    socket.onclose = function () {
      if (retries < 10) {
        retries++;
        setTimeout(connect, 500 * retries);
      }
    };
  }

  connect();
})();
"#;

/// Client script connecting to `socket_path` on the page's own host.
pub fn reload_client_script(socket_path: &str) -> String {
    CLIENT_SCRIPT.replace("__SOCKET_PATH__", socket_path)
}
