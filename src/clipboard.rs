use anyhow::{Context, Result};
use log::{debug, warn};
use std::io::Write;
use std::process::{Command, Stdio};

/// A destination that can receive copied text.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Primary tier: the system clipboard.
pub struct SystemClipboard {
    // Connecting can fail on headless systems; defer until first use so
    // constructing the chain never does.
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self { inner: None }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let clipboard = match self.inner.as_mut() {
            Some(clipboard) => clipboard,
            None => {
                let clipboard = arboard::Clipboard::new().context("Clipboard unavailable")?;
                self.inner.insert(clipboard)
            }
        };
        clipboard.set_text(text).context("Clipboard write failed")?;
        Ok(())
    }
}

/// Legacy tier: pipe the text through whatever copy utility the platform
/// has.
pub struct CommandClipboard;

const COPY_COMMANDS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
    ("clip", &[]),
];

impl ClipboardSink for CommandClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        for (cmd, args) in COPY_COMMANDS {
            let child = Command::new(cmd)
                .args(*args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();

            let mut child = match child {
                Ok(child) => child,
                Err(_) => continue,
            };

            if let Some(stdin) = child.stdin.as_mut() {
                stdin
                    .write_all(text.as_bytes())
                    .with_context(|| format!("Failed piping text to {}", cmd))?;
            }

            let status = child
                .wait()
                .with_context(|| format!("{} did not exit", cmd))?;
            if status.success() {
                debug!("Copied via {}", cmd);
                return Ok(());
            }
        }

        anyhow::bail!("No copy utility available")
    }
}

/// Two-tier copy: the system clipboard first, the legacy utility second.
///
/// Callers see a single best-effort operation. A copy that misses both
/// tiers is logged and swallowed; it never interrupts the review flow.
pub struct ClipboardChain {
    primary: Box<dyn ClipboardSink>,
    fallback: Box<dyn ClipboardSink>,
}

impl ClipboardChain {
    pub fn new(primary: Box<dyn ClipboardSink>, fallback: Box<dyn ClipboardSink>) -> Self {
        Self { primary, fallback }
    }

    pub fn system() -> Self {
        Self::new(Box::new(SystemClipboard::new()), Box::new(CommandClipboard))
    }

    /// Returns true if either tier accepted the text.
    pub fn copy_best_effort(&mut self, text: &str) -> bool {
        match self.primary.write_text(text) {
            Ok(()) => true,
            Err(primary_err) => {
                warn!("Clipboard copy failed: {:#}", primary_err);
                match self.fallback.write_text(text) {
                    Ok(()) => true,
                    Err(fallback_err) => {
                        warn!("Fallback copy failed: {:#}", fallback_err);
                        false
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::{Arc, Mutex};

    struct ScriptedSink {
        label: &'static str,
        fail: bool,
        writes: Arc<Mutex<Vec<(&'static str, String)>>>,
    }

    impl ClipboardSink for ScriptedSink {
        fn write_text(&mut self, text: &str) -> Result<()> {
            if self.fail {
                return Err(anyhow!("{} unavailable", self.label));
            }
            self.writes.lock().unwrap().push((self.label, text.to_string()));
            Ok(())
        }
    }

    fn chain(
        primary_fails: bool,
        fallback_fails: bool,
    ) -> (ClipboardChain, Arc<Mutex<Vec<(&'static str, String)>>>) {
        let writes = Arc::new(Mutex::new(Vec::new()));
        let chain = ClipboardChain::new(
            Box::new(ScriptedSink {
                label: "primary",
                fail: primary_fails,
                writes: writes.clone(),
            }),
            Box::new(ScriptedSink {
                label: "fallback",
                fail: fallback_fails,
                writes: writes.clone(),
            }),
        );
        (chain, writes)
    }

    #[test]
    fn test_primary_success_skips_fallback() {
        let (mut chain, writes) = chain(false, false);
        assert!(chain.copy_best_effort("hello"));

        let writes = writes.lock().unwrap();
        assert_eq!(writes.as_slice(), [("primary", "hello".to_string())]);
    }

    #[test]
    fn test_primary_failure_recovers_to_fallback() {
        let (mut chain, writes) = chain(true, false);
        assert!(chain.copy_best_effort("hello"));

        let writes = writes.lock().unwrap();
        assert_eq!(writes.as_slice(), [("fallback", "hello".to_string())]);
    }

    #[test]
    fn test_both_tiers_failing_is_not_fatal() {
        let (mut chain, writes) = chain(true, true);
        assert!(!chain.copy_best_effort("hello"));
        assert!(writes.lock().unwrap().is_empty());
    }
}
