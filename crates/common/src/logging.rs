use std::sync::OnceLock;

use tracing::{field::Visit, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static IGNORE_PATTERNS: OnceLock<Vec<regex::Regex>> = OnceLock::new();

/// Install the global subscriber: `RUST_LOG` (default `warn`) filtering, a
/// stderr fmt layer so stdout stays reserved for the report, and the
/// [`LogIgnoreFilter`].
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(default_directive: &str) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_filter(LogIgnoreFilter),
        )
        .try_init();
}

/// Compile and activate the log-ignore patterns from config.
///
/// Called once the config is loaded, which happens after [`init`] so that
/// config warnings are visible.  Only the first call takes effect.
pub fn set_ignore_patterns(patterns: &[String]) -> Result<(), regex::Error> {
    let compiled = patterns
        .iter()
        .map(|p| regex::Regex::new(p))
        .collect::<Result<Vec<_>, _>>()?;
    let _ = IGNORE_PATTERNS.set(compiled);
    Ok(())
}

/// True when `"target: message"` matches an installed ignore pattern.
fn is_ignored(target: &str, message: &str) -> bool {
    let Some(patterns) = IGNORE_PATTERNS.get() else {
        return false;
    };
    if patterns.is_empty() {
        return false;
    }
    let candidate = format!("{target}: {message}");
    patterns.iter().any(|p| p.is_match(&candidate))
}

/// Per-layer filter dropping events whose message matches an ignore pattern.
pub struct LogIgnoreFilter;

impl<S: Subscriber> tracing_subscriber::layer::Filter<S> for LogIgnoreFilter {
    fn enabled(&self, _meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        true
    }

    fn event_enabled(&self, event: &tracing::Event<'_>, _cx: &Context<'_, S>) -> bool {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        !is_ignored(event.metadata().target(), &visitor.message)
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}
