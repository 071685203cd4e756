//! Human-readable rendering and trusted replay of a decoded message.

use std::hint::black_box;
use std::time::{Duration, Instant};

use engine_protocol::{DecodeError, Message};

/// Renders every header field and, when offsets were precomputed, every
/// parameter (payloads truncated to `preview_bytes`).
///
/// # Errors
///
/// Propagates any [`DecodeError`] raised while reading a parameter.
pub fn render(msg: &Message<'_>, preview_bytes: usize) -> Result<String, DecodeError> {
    let mut lines = vec![
        format!("id          {}", msg.uuid()),
        format!("action      {:#010x} ({})", msg.action(), msg.action()),
        format!("params      {}", msg.param_count()),
        format!(
            "size table  {:?}",
            msg.param_sizes().iter().collect::<Vec<_>>()
        ),
    ];

    if msg.is_precomputed() {
        for (index, param) in msg.params().enumerate() {
            let param = param?;
            let shown = &param[..param.len().min(preview_bytes)];
            let ellipsis = if shown.len() < param.len() { "…" } else { "" };
            lines.push(format!(
                "param[{index}]    {} byte(s)  {}{ellipsis}",
                param.len(),
                hex::encode(shown)
            ));
        }
        if let Some(end) = msg.payload_len() {
            let trailing = msg.as_bytes().len() - end;
            if trailing > 0 {
                lines.push(format!("trailing    {trailing} byte(s) after last payload"));
            }
        }
    } else {
        lines.push("parameters not shown: offsets were not precomputed".to_string());
    }

    Ok(lines.join("\n"))
}

/// Outcome of [`replay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub iterations: u32,
    pub elapsed: Duration,
    /// Folded action codes and parameter lengths; keeps the loop observable.
    pub checksum: u64,
}

impl ReplayStats {
    /// Mean time per replay.
    pub fn per_iteration(&self) -> Duration {
        self.elapsed / self.iterations.max(1)
    }
}

/// Re-reads an already validated message `iterations` times through the
/// unchecked decoder.
pub fn replay(msg: &Message<'_>, iterations: u32) -> ReplayStats {
    let start = Instant::now();
    let mut checksum = 0u64;

    for _ in 0..iterations {
        let req = black_box(msg.as_trusted());
        checksum = checksum.wrapping_add(u64::from(req.action()));
        if req.is_precomputed() {
            for index in 0..usize::from(req.param_count()) {
                // SAFETY: `req` comes from a validated, precomputed message
                // and `index` is below its parameter count.
                let param = unsafe { req.param_unchecked(index) };
                checksum = checksum.wrapping_add(param.len() as u64);
            }
        }
    }

    ReplayStats {
        iterations,
        elapsed: start.elapsed(),
        checksum,
    }
}
