//! Playwright browser automation
//!
//! A session is a `node` process running a small bridge script that owns
//! one browser and one page. Commands go in on stdin and replies come back on
//! stdout, one JSON object per line.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command as TokioCommand};
use tracing::{debug, info, warn};

use probekit_common::{BrowserKind, UiConfig, Viewport};

use crate::error::{E2eError, E2eResult};
use crate::session::{BrowserSession, SessionFactory};

const CONFIG_ENV: &str = "PROBEKIT_BRIDGE_CONFIG";

/// Slack on top of the action timeout before the bridge is considered hung
const REPLY_GRACE: Duration = Duration::from_secs(5);

/// How long a terminated bridge may take to exit on SIGTERM
const TERM_GRACE: Duration = Duration::from_millis(500);
const TERM_POLL: Duration = Duration::from_millis(20);

const BRIDGE_SCRIPT: &str = r#"
const readline = require('readline');
const playwright = require('playwright');

const reply = (msg) => process.stdout.write(JSON.stringify(msg) + '\n');

(async () => {
  const cfg = JSON.parse(process.env.PROBEKIT_BRIDGE_CONFIG);
  const browser = await playwright[cfg.browser].launch({ headless: cfg.headless });
  const context = await browser.newContext({
    viewport: { width: cfg.viewport.width, height: cfg.viewport.height }
  });
  const page = await context.newPage();
  page.setDefaultTimeout(cfg.action_timeout_ms);
  reply({ id: 0, ok: true, value: 'ready' });

  const rl = readline.createInterface({ input: process.stdin });
  for await (const line of rl) {
    if (!line.trim()) continue;
    const cmd = JSON.parse(line);
    try {
      let value = null;
      switch (cmd.op) {
        case 'goto': {
          const response = await page.goto(cmd.url);
          if (response && !response.ok()) {
            throw new Error(`HTTP ${response.status()}`);
          }
          break;
        }
        case 'fill':
          await page.locator(cmd.selector).fill(cmd.value);
          break;
        case 'click':
          await page.locator(cmd.selector).click();
          break;
        case 'text_content':
          value = await page.locator(cmd.selector).textContent();
          break;
        case 'close':
          await browser.close();
          reply({ id: cmd.id, ok: true, value: null });
          process.exit(0);
        default:
          throw new Error(`unknown op ${cmd.op}`);
      }
      reply({ id: cmd.id, ok: true, value });
    } catch (error) {
      const kind = error.name === 'TimeoutError' ? 'timeout' : 'error';
      reply({ id: cmd.id, ok: false, kind, error: error.message });
    }
  }
  await browser.close();
})().catch((error) => {
  reply({ id: 0, ok: false, kind: 'launch', error: error.message });
  process.exit(1);
});
"#;

/// Configuration for Playwright
#[derive(Debug, Clone, Serialize)]
pub struct PlaywrightConfig {
    #[serde(skip)]
    pub node_binary: PathBuf,

    /// Directory whose `node_modules` provides `playwright`
    #[serde(skip)]
    pub working_dir: Option<PathBuf>,

    pub browser: BrowserKind,
    pub headless: bool,
    pub viewport: Viewport,
    pub action_timeout_ms: u64,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self::from_ui_config(&UiConfig::default())
    }
}

impl PlaywrightConfig {
    pub fn from_ui_config(config: &UiConfig) -> Self {
        Self {
            node_binary: config.node_binary.clone(),
            working_dir: None,
            browser: config.browser,
            headless: config.headless,
            viewport: config.viewport,
            action_timeout_ms: config.action_timeout_ms,
        }
    }

    fn reply_timeout(&self) -> Duration {
        Duration::from_millis(self.action_timeout_ms) + REPLY_GRACE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum BridgeOp {
    Goto { url: String },
    Fill { selector: String, value: String },
    Click { selector: String },
    TextContent { selector: String },
    Close,
}

impl BridgeOp {
    fn selector(&self) -> Option<&str> {
        match self {
            BridgeOp::Fill { selector, .. }
            | BridgeOp::Click { selector }
            | BridgeOp::TextContent { selector } => Some(selector),
            BridgeOp::Goto { .. } | BridgeOp::Close => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct BridgeCommand<'a> {
    id: u64,
    #[serde(flatten)]
    op: &'a BridgeOp,
}

#[derive(Debug, Deserialize)]
struct BridgeReply {
    id: u64,
    ok: bool,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl BridgeReply {
    /// Map a failed reply onto the error the caller should see
    fn into_result(self, op: &BridgeOp) -> E2eResult<Value> {
        if self.ok {
            return Ok(self.value);
        }
        let reason = self.error.unwrap_or_else(|| "unknown error".to_string());
        let timed_out = self.kind.as_deref() == Some("timeout");
        Err(match (op, op.selector()) {
            (BridgeOp::Goto { url }, _) if timed_out => {
                E2eError::Timeout(format!("navigation to {}", url))
            }
            (BridgeOp::Goto { url }, _) => E2eError::Navigation {
                url: url.clone(),
                reason,
            },
            (_, Some(selector)) => E2eError::ElementNotInteractable {
                selector: selector.to_string(),
                reason,
            },
            _ => E2eError::Playwright(reason),
        })
    }
}

/// A live browser page hosted by the Playwright bridge
pub struct PlaywrightSession {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    next_id: u64,
    reply_timeout: Duration,
    closed: bool,
}

impl PlaywrightSession {
    /// Launch the bridge and wait until the browser is ready
    pub async fn launch(config: &PlaywrightConfig) -> E2eResult<Self> {
        Self::check_playwright_installed(config)?;

        info!(
            "Launching {} (headless: {})",
            config.browser.as_str(),
            config.headless
        );

        let mut cmd = TokioCommand::new(&config.node_binary);
        cmd.arg("-e")
            .arg(BRIDGE_SCRIPT)
            .env(CONFIG_ENV, serde_json::to_string(config)?)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &config.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|e| {
            E2eError::BrowserLaunch(format!(
                "Failed to spawn {}: {}",
                config.node_binary.display(),
                e
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| E2eError::BrowserLaunch("bridge stdin not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| E2eError::BrowserLaunch("bridge stdout not captured".to_string()))?;

        let mut session = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            next_id: 1,
            reply_timeout: config.reply_timeout(),
            closed: false,
        };

        let ready = session.read_reply().await?;
        if !ready.ok {
            return Err(E2eError::BrowserLaunch(
                ready.error.unwrap_or_else(|| "bridge failed to start".to_string()),
            ));
        }
        debug!("Playwright bridge ready");
        Ok(session)
    }

    /// Verify playwright is resolvable by node
    fn check_playwright_installed(config: &PlaywrightConfig) -> E2eResult<()> {
        let mut cmd = Command::new(&config.node_binary);
        cmd.args(["-e", "require.resolve('playwright')"])
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(dir) = &config.working_dir {
            cmd.current_dir(dir);
        }

        match cmd.status() {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    async fn read_reply(&mut self) -> E2eResult<BridgeReply> {
        let line = tokio::time::timeout(self.reply_timeout, self.stdout.next_line())
            .await
            .map_err(|_| E2eError::Timeout("reply from Playwright bridge".to_string()))??;
        match line {
            Some(line) => Ok(serde_json::from_str(&line)?),
            None => Err(E2eError::Playwright("bridge exited unexpectedly".to_string())),
        }
    }

    async fn call(&mut self, op: BridgeOp) -> E2eResult<Value> {
        if self.closed {
            return Err(E2eError::SessionClosed);
        }
        let id = self.next_id;
        self.next_id += 1;

        let mut line = serde_json::to_string(&BridgeCommand { id, op: &op })?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;

        // Replies to calls that already timed out may still be queued
        loop {
            let reply = self.read_reply().await?;
            if reply.id < id {
                debug!("Discarding late reply to request {}", reply.id);
                continue;
            }
            if reply.id != id {
                return Err(E2eError::Playwright(format!(
                    "reply id {} does not match request {}",
                    reply.id, id
                )));
            }
            return reply.into_result(&op);
        }
    }

    /// Send SIGTERM and give the bridge `TERM_GRACE` to exit before killing it
    fn terminate(&mut self) {
        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            if let Some(pid) = self.child.id() {
                if kill(Pid::from_raw(pid as i32), Signal::SIGTERM).is_ok() {
                    let deadline = Instant::now() + TERM_GRACE;
                    while Instant::now() < deadline {
                        if let Ok(Some(_)) = self.child.try_wait() {
                            return;
                        }
                        std::thread::sleep(TERM_POLL);
                    }
                    warn!("Bridge ignored SIGTERM, killing it");
                }
            }
        }
        let _ = self.child.start_kill();
    }
}

#[async_trait]
impl BrowserSession for PlaywrightSession {
    async fn goto(&mut self, url: &str) -> E2eResult<()> {
        debug!("goto {}", url);
        self.call(BridgeOp::Goto { url: url.to_string() }).await?;
        Ok(())
    }

    async fn fill(&mut self, selector: &str, value: &str) -> E2eResult<()> {
        debug!("fill {}", selector);
        self.call(BridgeOp::Fill {
            selector: selector.to_string(),
            value: value.to_string(),
        })
        .await?;
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> E2eResult<()> {
        debug!("click {}", selector);
        self.call(BridgeOp::Click { selector: selector.to_string() }).await?;
        Ok(())
    }

    async fn text_content(&mut self, selector: &str) -> E2eResult<Option<String>> {
        let value = self
            .call(BridgeOp::TextContent { selector: selector.to_string() })
            .await?;
        Ok(value.as_str().map(String::from))
    }

    async fn close(&mut self) -> E2eResult<()> {
        if self.closed {
            return Ok(());
        }
        let result = self.call(BridgeOp::Close).await;
        self.closed = true;
        if let Err(e) = &result {
            warn!("Bridge did not close cleanly: {}", e);
            self.terminate();
        }
        let _ = self.child.wait().await;
        result.map(|_| ())
    }
}

impl Drop for PlaywrightSession {
    fn drop(&mut self) {
        if !self.closed {
            self.terminate();
        }
    }
}

/// Opens one Playwright session per scenario
#[derive(Debug, Clone, Default)]
pub struct PlaywrightLauncher {
    config: PlaywrightConfig,
}

impl PlaywrightLauncher {
    pub fn new(config: PlaywrightConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionFactory for PlaywrightLauncher {
    type Session = PlaywrightSession;

    async fn open(&self) -> E2eResult<PlaywrightSession> {
        PlaywrightSession::launch(&self.config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_wire_format() {
        let op = BridgeOp::Fill {
            selector: "input#userName".to_string(),
            value: "Donald Duck".to_string(),
        };
        let line = serde_json::to_value(BridgeCommand { id: 3, op: &op }).unwrap();
        assert_eq!(
            line,
            json!({"id": 3, "op": "fill", "selector": "input#userName", "value": "Donald Duck"})
        );

        let close = serde_json::to_value(BridgeCommand { id: 4, op: &BridgeOp::Close }).unwrap();
        assert_eq!(close, json!({"id": 4, "op": "close"}));
    }

    #[test]
    fn test_config_passed_to_bridge() {
        let value = serde_json::to_value(PlaywrightConfig::default()).unwrap();
        assert_eq!(value["browser"], "chromium");
        assert_eq!(value["headless"], true);
        assert_eq!(value["viewport"]["width"], 1280);
        assert_eq!(value["action_timeout_ms"], 5000);
        assert!(value.get("node_binary").is_none());
    }

    #[test]
    fn test_element_failure_maps_to_not_interactable() {
        let reply: BridgeReply = serde_json::from_value(json!({
            "id": 1,
            "ok": false,
            "kind": "timeout",
            "error": "locator.fill: Timeout 5000ms exceeded."
        }))
        .unwrap();
        let op = BridgeOp::Fill {
            selector: "#missing".to_string(),
            value: String::new(),
        };
        match reply.into_result(&op) {
            Err(E2eError::ElementNotInteractable { selector, reason }) => {
                assert_eq!(selector, "#missing");
                assert!(reason.contains("Timeout"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_navigation_failures() {
        let op = BridgeOp::Goto { url: "https://demoqa.com/text-box".to_string() };

        let timeout: BridgeReply =
            serde_json::from_value(json!({"id": 1, "ok": false, "kind": "timeout", "error": "t"}))
                .unwrap();
        assert!(matches!(timeout.into_result(&op), Err(E2eError::Timeout(_))));

        let refused: BridgeReply = serde_json::from_value(
            json!({"id": 1, "ok": false, "kind": "error", "error": "net::ERR_CONNECTION_REFUSED"}),
        )
        .unwrap();
        assert!(matches!(refused.into_result(&op), Err(E2eError::Navigation { .. })));
    }

    #[test]
    fn test_text_reply_value() {
        let reply: BridgeReply =
            serde_json::from_value(json!({"id": 9, "ok": true, "value": "Name:Donald Duck"}))
                .unwrap();
        let op = BridgeOp::TextContent { selector: "#name".to_string() };
        assert_eq!(reply.into_result(&op).unwrap(), json!("Name:Donald Duck"));
    }

    /// Stands in for `node`: speaks the bridge protocol without a browser and
    /// holds back `goto` replies for `goto_delay_secs`
    #[cfg(unix)]
    fn stub_node(dir: &std::path::Path, goto_delay_secs: u32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = format!(
            r#"#!/bin/sh
case "$2" in
  *require.resolve*) exit 0 ;;
esac
echo '{{"id":0,"ok":true,"value":"ready"}}'
while IFS= read -r line; do
  id=$(printf '%s\n' "$line" | sed -n 's/^{{"id":\([0-9]*\).*/\1/p')
  case "$line" in
    *'"op":"goto"'*) sleep {delay}; echo "{{\"id\":$id,\"ok\":true,\"value\":null}}" ;;
    *'"op":"text_content"'*) echo "{{\"id\":$id,\"ok\":true,\"value\":\"Name:Donald Duck\"}}" ;;
    *'"op":"close"'*) echo "{{\"id\":$id,\"ok\":true,\"value\":null}}"; exit 0 ;;
    *) echo "{{\"id\":$id,\"ok\":true,\"value\":null}}" ;;
  esac
done
"#,
            delay = goto_delay_secs
        );

        let path = dir.join("node");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    fn stub_config(dir: &std::path::Path, goto_delay_secs: u32) -> PlaywrightConfig {
        PlaywrightConfig {
            node_binary: stub_node(dir, goto_delay_secs),
            ..PlaywrightConfig::default()
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_close_is_idempotent_and_final() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = PlaywrightSession::launch(&stub_config(dir.path(), 0))
            .await
            .unwrap();

        session.goto("https://demoqa.com/text-box").await.unwrap();
        assert_eq!(
            session.text_content("#name").await.unwrap(),
            Some("Name:Donald Duck".to_string())
        );

        session.close().await.unwrap();
        session.close().await.unwrap();
        assert!(matches!(
            session.goto("https://demoqa.com/text-box").await,
            Err(E2eError::SessionClosed)
        ));
        assert!(matches!(
            session.click("#submit").await,
            Err(E2eError::SessionClosed)
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_drop_stops_bridge() {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        let dir = tempfile::tempdir().unwrap();
        let session = PlaywrightSession::launch(&stub_config(dir.path(), 0))
            .await
            .unwrap();
        let pid = Pid::from_raw(session.child.id().unwrap() as i32);

        drop(session);

        let deadline = Instant::now() + Duration::from_secs(2);
        while kill(pid, None::<Signal>).is_ok() && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(kill(pid, None::<Signal>).is_err(), "bridge {} still running", pid);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_late_reply_does_not_desync_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = PlaywrightSession::launch(&stub_config(dir.path(), 1))
            .await
            .unwrap();

        session.reply_timeout = Duration::from_millis(200);
        let err = session.goto("https://demoqa.com/text-box").await.unwrap_err();
        assert!(matches!(err, E2eError::Timeout(_)), "{:?}", err);

        // The goto reply arrives after the next request was sent
        session.reply_timeout = Duration::from_secs(5);
        assert_eq!(
            session.text_content("#name").await.unwrap(),
            Some("Name:Donald Duck".to_string())
        );
        session.close().await.unwrap();
    }
}
