//! Interactive terminal output: a live progress view while gremlins are being
//! tested, and a final styled report once the run is done.

use std::sync::Arc;
use std::time::Instant;

use console::style;
use nutmeg::Options;

use crate::aggregator::MutationScore;
use crate::gremlin::Gremlin;
use crate::result::GremlinStatus;

/// Progress state rendered by [nutmeg] while the pool is working.
struct ProgressModel {
    total: usize,
    done: usize,
    zapped: usize,
    survived: usize,
    current: Vec<String>,
    started: Instant,
}

impl nutmeg::Model for ProgressModel {
    fn render(&mut self, _width: usize) -> String {
        let current = if self.current.is_empty() {
            String::new()
        } else {
            format!("\n  {}", self.current.join("\n  "))
        };
        format!(
            "{}/{} gremlins tested, {} zapped, {} survived, {:.1}s elapsed{}",
            self.done,
            self.total,
            self.zapped,
            self.survived,
            self.started.elapsed().as_secs_f64(),
            current,
        )
    }
}

/// The live console: a thin wrapper over a [nutmeg::View] that every worker
/// thread can update concurrently.
pub struct Console {
    view: Arc<nutmeg::View<ProgressModel>>,
}

impl Console {
    pub fn start(total: usize) -> Console {
        let view = nutmeg::View::new(
            ProgressModel {
                total,
                done: 0,
                zapped: 0,
                survived: 0,
                current: Vec::new(),
                started: Instant::now(),
            },
            Options::default(),
        );
        Console {
            view: Arc::new(view),
        }
    }

    /// Record that a gremlin has begun testing.
    pub fn gremlin_started(&self, gremlin: &Gremlin) {
        self.view.update(|model| {
            model.current.push(gremlin.name(true));
        });
    }

    /// Record the outcome of one gremlin.
    pub fn gremlin_finished(&self, gremlin: &Gremlin, status: GremlinStatus) {
        self.view.update(|model| {
            model.done += 1;
            match status {
                GremlinStatus::Zapped | GremlinStatus::Timeout => model.zapped += 1,
                GremlinStatus::Survived | GremlinStatus::Error => model.survived += 1,
            }
            model.current.retain(|line| line != &gremlin.name(true));
        });
        let line = format!(
            "{} ... {}",
            gremlin.name(true),
            style_status(status),
        );
        self.view.message(&line);
    }

    /// Print a one-off message above the progress view.
    pub fn message(&self, text: &str) {
        self.view.message(text);
    }
}

fn style_status(status: GremlinStatus) -> console::StyledObject<&'static str> {
    match status {
        GremlinStatus::Zapped => style("zapped").green(),
        GremlinStatus::Timeout => style("timeout (zapped)").green(),
        GremlinStatus::Survived => style("SURVIVED").red().bold(),
        GremlinStatus::Error => style("error").yellow(),
    }
}

/// Print the final summary: overall score, then each surviving gremlin.
pub fn print_report(score: &MutationScore) {
    println!(
        "{}",
        style(format!(
            "{}/{} gremlins zapped ({:.1}%)",
            score.detected,
            score.total,
            score.percentage()
        ))
        .bold()
    );
    for file_score in &score.by_file {
        println!(
            "  {}: {} zapped, {} survived",
            file_score.file, file_score.zapped, file_score.survived
        );
    }
    if !score.survived.is_empty() {
        println!("{}", style("Survivors:").bold().red());
        for survivor in &score.survived {
            println!(
                "  {}:{} {} ({})",
                survivor.file, survivor.line, survivor.description, survivor.gremlin_id
            );
        }
    }
}
