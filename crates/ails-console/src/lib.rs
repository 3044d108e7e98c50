//! Colorful console output for search events.
//!
//! Provides a custom `tracing` layer that formats the engine's structured
//! events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (search start/end, initial solution, new best)
//! - **DEBUG**: One line per perturbation iteration
//! - **TRACE**: Omega adjustments
//! - **WARN**: Sink failures and infeasible candidates

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SEARCH_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_DIRECTIVE: &str = "ails_solver=info";

/// Initializes the console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the banner and sets up tracing with `RUST_LOG` or
/// [`DEFAULT_DIRECTIVE`].
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SearchConsoleLayer)
            .try_init();
    });
}

// Marks the start of the search for elapsed time tracking.
fn mark_search_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SEARCH_START_NANOS.store(nanos, Ordering::Relaxed);
}

// Wall-clock seconds since the search started.
fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SEARCH_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
    _    ___ _     ____        ___ ___
   / \  |_ _| |   / ___|      |_ _|_ _|
  / _ \  | || |   \___ \ _____ | | | |
 / ___ \ | || |___ ___) |_____|| | | |
/_/   \_\___|_____|____/      |___|___|
"#;

    let version_line = format!(
        "      v{} - Adaptive Iterated Local Search for the CVRP\n",
        VERSION
    );

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats search events with colors.
pub struct SearchConsoleLayer;

impl<S: Subscriber> Layer<S> for SearchConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();

        // Accept events from the engine crates
        if !target.starts_with("ails_solver") && !target.starts_with("ails::") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    instance: Option<String>,
    operator: Option<String>,
    sink_event: Option<String>,
    error: Option<String>,
    omega: Option<String>,
    customers: Option<u64>,
    capacity: Option<u64>,
    min_routes: Option<u64>,
    routes: Option<u64>,
    seed: Option<u64>,
    operators: Option<u64>,
    iteration: Option<u64>,
    iterations: Option<u64>,
    iteration_of_best: Option<u64>,
    improvements: Option<u64>,
    cost: Option<f64>,
    time: Option<f64>,
    total_time: Option<f64>,
    distance: Option<f64>,
    best: Option<f64>,
    old_omega: Option<f64>,
    new_omega: Option<f64>,
    mean_distance: Option<f64>,
    ideal_distance: Option<f64>,
    accepted: Option<bool>,
    forced: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        let s = s.trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "instance" => self.instance = Some(s),
            "operator" => self.operator = Some(s),
            "sink_event" => self.sink_event = Some(s),
            "error" => self.error = Some(s),
            "omega" => self.omega = Some(s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "customers" => self.customers = Some(value),
            "capacity" => self.capacity = Some(value),
            "min_routes" => self.min_routes = Some(value),
            "routes" => self.routes = Some(value),
            "seed" => self.seed = Some(value),
            "operators" => self.operators = Some(value),
            "iteration" => self.iteration = Some(value),
            "iterations" => self.iterations = Some(value),
            "iteration_of_best" => self.iteration_of_best = Some(value),
            "improvements" => self.improvements = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "cost" => self.cost = Some(value),
            "time" => self.time = Some(value),
            "total_time" => self.total_time = Some(value),
            "distance" => self.distance = Some(value),
            "best" => self.best = Some(value),
            "old_omega" => self.old_omega = Some(value),
            "new_omega" => self.new_omega = Some(value),
            "mean_distance" => self.mean_distance = Some(value),
            "ideal_distance" => self.ideal_distance = Some(value),
            _ => {}
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        match field.name() {
            "accepted" => self.accepted = Some(value),
            "forced" => self.forced = Some(value),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "instance" => self.instance = Some(value.to_string()),
            "operator" => self.operator = Some(value.to_string()),
            "sink_event" => self.sink_event = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    let event = v.event.as_deref().unwrap_or("");

    match event {
        "search_start" => format_search_start(v),
        "initial_solution" => format_initial(v),
        "new_best" => format_new_best(v),
        "iteration" => format_iteration(v, level),
        "omega_adjusted" => format_omega(v, level),
        "search_end" => format_search_end(v),
        "sink_error" => format_sink_error(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn format_search_start(v: &EventVisitor) -> String {
    mark_search_start();
    let instance = v.instance.as_deref().unwrap_or("instance");
    let customers = v.customers.unwrap_or(0);
    let capacity = v.capacity.unwrap_or(0);
    let min_routes = v.min_routes.unwrap_or(0);

    let mut output = format!(
        "{} {} Solving {} │ {} customers │ capacity {} │ ≥ {} routes",
        format_elapsed(),
        "▶".bright_green().bold(),
        instance.white().bold(),
        customers.to_formatted_string(&Locale::en).bright_yellow(),
        capacity.to_formatted_string(&Locale::en).bright_yellow(),
        min_routes.to_formatted_string(&Locale::en).bright_yellow(),
    );

    if let Some(operators) = v.operators {
        output.push_str(&format!(" │ {} operators", operators.bright_yellow()));
    }
    if let Some(seed) = v.seed {
        output.push_str(&format!(" │ seed {}", seed.bright_magenta()));
    }

    output
}

fn format_initial(v: &EventVisitor) -> String {
    format!(
        "{} {} Initial solution │ {} │ {} routes │ {}",
        format_elapsed(),
        "◆".bright_blue(),
        format_cost(v.cost).bright_white().bold(),
        v.routes.unwrap_or(0).white(),
        format_secs(v.time).yellow(),
    )
}

fn format_new_best(v: &EventVisitor) -> String {
    format!(
        "{} {} New best │ iteration {:>10} │ {} │ {} routes │ {}",
        format_elapsed(),
        "★".bright_green().bold(),
        v.iteration
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .white(),
        format_cost(v.cost).bright_green().bold(),
        v.routes.unwrap_or(0).white(),
        format_secs(v.time).yellow(),
    )
}

fn format_iteration(v: &EventVisitor, level: Level) -> String {
    if level != Level::DEBUG {
        return String::new();
    }

    let icon = match (v.forced.unwrap_or(false), v.accepted.unwrap_or(false)) {
        (true, _) => "⟳".bright_magenta().to_string(),
        (false, true) => "✓".bright_green().to_string(),
        (false, false) => "✗".bright_red().to_string(),
    };

    format!(
        "{} {} Iteration {:>10} │ {:<13} │ ω {:>6} │ d {:>7.2} │ {} │ best {}",
        format_elapsed(),
        icon,
        v.iteration
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .bright_black(),
        v.operator.as_deref().unwrap_or("?"),
        format_omega_value(v.omega.as_deref()),
        v.distance.unwrap_or(0.0),
        format_cost(v.cost).bright_black(),
        format_cost(v.best).white(),
    )
}

fn format_omega(v: &EventVisitor, level: Level) -> String {
    if level != Level::TRACE {
        return String::new();
    }

    format!(
        "{} {} ω {} │ {:.2} → {:.2} │ mean {:.2} vs ideal {:.2}",
        format_elapsed(),
        "~".bright_cyan(),
        v.operator.as_deref().unwrap_or("?").white(),
        v.old_omega.unwrap_or(0.0),
        v.new_omega.unwrap_or(0.0),
        v.mean_distance.unwrap_or(0.0),
        v.ideal_distance.unwrap_or(0.0),
    )
}

fn format_search_end(v: &EventVisitor) -> String {
    let cost = format_cost(v.cost);
    let iterations = v.iterations.unwrap_or(0);
    let iteration_of_best = v.iteration_of_best.unwrap_or(0);
    let total_time = v.total_time.unwrap_or(0.0);

    let mut output = format!(
        "{} {} Search complete │ {} │ {} iterations │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        cost.bright_green().bold(),
        iterations.to_formatted_string(&Locale::en).white(),
        format_secs(Some(total_time)).yellow(),
    );

    // Summary box
    let rows = [
        ("Best cost:", cost.clone()),
        ("Routes:", v.routes.unwrap_or(0).to_string()),
        (
            "Iterations:",
            iterations.to_formatted_string(&Locale::en),
        ),
        (
            "Last improvement:",
            format!(
                "iteration {}",
                iteration_of_best.to_formatted_string(&Locale::en)
            ),
        ),
        (
            "Improvements:",
            v.improvements
                .unwrap_or(0)
                .to_formatted_string(&Locale::en),
        ),
        ("Total time:", format_secs(Some(total_time))),
    ];

    output.push_str("\n\n");
    output.push_str(
        &"╔══════════════════════════════════════════════════════════╗"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');
    for (label, value) in rows {
        output.push_str(&format!(
            "{}  {:<18}{:>36}  {}",
            "║".bright_cyan(),
            label,
            value,
            "║".bright_cyan()
        ));
        output.push('\n');
    }
    output.push_str(
        &"╚══════════════════════════════════════════════════════════╝"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');

    output
}

fn format_sink_error(v: &EventVisitor) -> String {
    format!(
        "{} {} Sink failed on {} │ {}",
        format_elapsed(),
        "!".bright_red().bold(),
        v.sink_event.as_deref().unwrap_or("event"),
        v.error.as_deref().unwrap_or("unknown error").bright_red(),
    )
}

fn format_cost(cost: Option<f64>) -> String {
    match cost {
        Some(cost) if cost.is_finite() => format!("{:.4}", cost),
        _ => "N/A".to_string(),
    }
}

fn format_secs(secs: Option<f64>) -> String {
    let secs = secs.unwrap_or(0.0);
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        let whole = secs as u64;
        format!("{}m {}s", whole / 60, whole % 60)
    }
}

fn format_omega_value(omega: Option<&str>) -> String {
    match omega {
        Some(s) if s.starts_with("Some(") => {
            let inner = s.trim_start_matches("Some(").trim_end_matches(')');
            match inner.parse::<f64>() {
                Ok(value) => format!("{:.1}", value),
                Err(_) => inner.to_string(),
            }
        }
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cost() {
        assert_eq!(format_cost(Some(1234.56789)), "1234.5679");
        assert_eq!(format_cost(Some(f64::INFINITY)), "N/A");
        assert_eq!(format_cost(None), "N/A");
    }

    #[test]
    fn test_format_secs() {
        assert_eq!(format_secs(Some(0.25)), "250ms");
        assert_eq!(format_secs(Some(12.5)), "12.50s");
        assert_eq!(format_secs(Some(125.0)), "2m 5s");
    }

    #[test]
    fn test_format_omega_value() {
        assert_eq!(format_omega_value(Some("Some(7.0)")), "7.0");
        assert_eq!(format_omega_value(Some("None")), "-");
        assert_eq!(format_omega_value(None), "-");
    }

    #[test]
    fn test_unknown_events_are_silent() {
        let visitor = EventVisitor {
            event: Some("default_seed".into()),
            ..EventVisitor::default()
        };
        assert!(format_event(&visitor, Level::INFO).is_empty());
    }

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }
}
