//! A small `tracing` subscriber driven by `RUST_LOG`.
//!
//! `RUST_LOG` is a comma-separated list of `level`, `target` or
//! `target=level` filters. Events go to stderr so command output on stdout
//! stays machine-readable. With `RUST_LOG` unset nothing is logged.

use std::env;
use std::fmt::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::field::Visit;
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_core::Field;

struct LineVisitor<'a> {
    line: &'a mut String,
}

impl Visit for LineVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let _ = if field.name() == "message" {
            write!(self.line, "{value:?} ")
        } else {
            write!(self.line, "{}={:?} ", field.name(), value)
        };
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        let _ = if field.name() == "message" {
            write!(self.line, "{value} ")
        } else {
            write!(self.line, "{}={} ", field.name(), value)
        };
    }
}

#[derive(Debug, PartialEq, Eq)]
struct LogFilter {
    target: Option<String>,
    level: Option<Level>,
}

impl LogFilter {
    fn parse(directive: &str) -> Option<Self> {
        let directive = directive.trim();
        if directive.is_empty() {
            return None;
        }
        Some(match directive.split_once('=') {
            Some((target, level)) => LogFilter {
                target: Some(target.to_string()),
                level: parse_level(level),
            },
            None => match parse_level(directive) {
                Some(level) => LogFilter {
                    target: None,
                    level: Some(level),
                },
                None => LogFilter {
                    target: Some(directive.to_string()),
                    level: None,
                },
            },
        })
    }

    /// A filter level admits events at that level and anything more severe.
    fn matches(&self, metadata: &Metadata<'_>) -> bool {
        let level_ok = self.level.is_none_or(|level| *metadata.level() <= level);
        let target_ok = self
            .target
            .as_deref()
            .is_none_or(|target| metadata.target().starts_with(target));
        level_ok && target_ok
    }
}

fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

pub struct StderrLogger {
    filters: Vec<LogFilter>,
    next_span: AtomicU64,
}

impl StderrLogger {
    fn from_directives(directives: &str) -> Self {
        StderrLogger {
            filters: directives.split(',').filter_map(LogFilter::parse).collect(),
            next_span: AtomicU64::new(1),
        }
    }

    /// Install as the global subscriber if `RUST_LOG` is set.
    pub fn init() {
        let Ok(directives) = env::var("RUST_LOG") else {
            return;
        };
        // Another subscriber already installed is fine; keep it.
        let _ = tracing::subscriber::set_global_default(Self::from_directives(&directives));
    }
}

impl Subscriber for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.filters.is_empty() || self.filters.iter().any(|f| f.matches(metadata))
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(self.next_span.fetch_add(1, Ordering::Relaxed))
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let metadata = event.metadata();
        let mut line = String::new();
        event.record(&mut LineVisitor { line: &mut line });
        eprintln!("{} {}: {}", metadata.level(), metadata.target(), line.trim_end());
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}
