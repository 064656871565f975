use std::path::Path;

use chrono::{TimeDelta, Utc};
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use log::info;

use yw_core::{Detector, Entity, Scene};
use yw_report::Analytics;
use yw_simulation::{EventLog, SimConfig, SimEventKind, Simulation};

const TICKS_PER_MINUTE: u64 = 60;

pub struct RunArgs<'a> {
    pub layout: &'a Path,
    pub defs: &'a Path,
    pub minutes: u64,
    pub seed: u64,
    pub analytics: Option<&'a Path>,
    pub keep_events: usize,
    pub verbose: bool,
}

pub fn run(args: &RunArgs<'_>) -> Result<(), String> {
    let scene = yw_scene::load_scene(args.layout, args.defs).map_err(|e| e.to_string())?;

    let ticks = args.minutes * TICKS_PER_MINUTE;
    let span = i64::try_from(ticks)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(|| format!("{} minutes is too long to simulate", args.minutes))?;
    // Start in the past so the last tick lands on the current time.
    let start = Utc::now() - span;

    let config = SimConfig::default()
        .with_seed(args.seed)
        .with_start_time(start)
        .with_event_limit(args.keep_events);
    let mut sim = Simulation::new(scene, config);

    let mut analytics = match args.analytics {
        Some(path) => Some(
            Analytics::create(path, start)
                .map_err(|e| format!("cannot create {}: {e}", path.display()))?,
        ),
        None => None,
    };

    for frame in 0..ticks {
        let scene = sim.advance();
        if let Some(writer) = analytics.as_mut() {
            writer
                .record(scene, frame)
                .map_err(|e| format!("analytics failed at frame {frame}: {e}"))?;
        }
        let tick = frame + 1;
        if tick % TICKS_PER_MINUTE == 0 {
            info!(
                "simulated minute {}/{} ({} live items)",
                tick / TICKS_PER_MINUTE,
                args.minutes,
                scene.items().len()
            );
        }
    }

    let lines = match analytics {
        Some(writer) => {
            let lines = writer.lines_written();
            writer.finish().map_err(|e| e.to_string())?;
            Some(lines)
        }
        None => None,
    };

    print_summary(&sim, args, lines);
    Ok(())
}

fn print_summary(sim: &Simulation, args: &RunArgs<'_>, lines: Option<u64>) {
    let scene = sim.scene();
    let events = sim.events();

    println!(
        "  {} {} {}",
        "Simulation".bold(),
        args.layout.display(),
        format!(
            "({} ticks, seed={}, ended {})",
            sim.current_tick(),
            args.seed,
            sim.clock().now().format("%Y-%m-%d %H:%M:%S")
        )
        .dimmed()
    );
    println!(
        "  {} processes, {} movers, {} cameras, {} live items, {} events logged",
        scene.processes().len(),
        scene.movers().len(),
        scene.cameras().len(),
        scene.items().len(),
        events.len() as u64 + events.evicted()
    );
    if let (Some(path), Some(lines)) = (args.analytics, lines) {
        println!("  Wrote {lines} ELK lines to {}", path.display());
    }
    println!();

    if args.verbose {
        println!("  {}", "Event Log".bold().underline());
        println!();
        if events.evicted() > 0 {
            println!(
                "  {}",
                format!("({} earlier events dropped)", events.evicted()).dimmed()
            );
        }
        for event in events.iter() {
            let tick_label = format!("[tick {:>5}]", event.tick).dimmed();
            let desc = colorize_event(&event.kind, &event.description);
            println!("  {tick_label} {desc}");
        }
        if events.is_empty() {
            println!("  {}", "(no events)".dimmed());
        }
        println!();
    }

    print_processes(scene, events);
    print_movers(scene, events);
    print_cameras(scene);
}

fn print_processes(scene: &Scene, events: &EventLog) {
    println!("  {}", "Processes".bold().underline());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Process", "Type", "State", "Runs", "Inventory"]);

    for (id, process) in scene.processes() {
        let runs = events.tally(id).finished;
        let inventory = process
            .inventory()
            .available()
            .iter()
            .map(|(category, n)| format!("{category}: {n}"))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            id.to_string(),
            process.label().to_string(),
            process.state().to_string(),
            runs.to_string(),
            if inventory.is_empty() { "--".into() } else { inventory },
        ]);
    }

    println!("{table}");
    println!();
}

fn print_movers(scene: &Scene, events: &EventLog) {
    if scene.movers().is_empty() {
        return;
    }
    println!("  {}", "Movers".bold().underline());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Mover", "Type", "Route", "State", "Trips", "Carrying"]);

    for (id, mover) in scene.movers() {
        let trips = events.tally(id).trips;
        table.add_row(vec![
            id.to_string(),
            mover.label().to_string(),
            format!("{} -> {}", mover.source(), mover.target()),
            mover.state().to_string(),
            trips.to_string(),
            format!("{}/{}", mover.inventory().size(), mover.capacity()),
        ]);
    }

    println!("{table}");
    println!();
}

fn print_cameras(scene: &Scene) {
    if scene.cameras().is_empty() {
        return;
    }
    println!("  {}", "Cameras (last frame)".bold().underline());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Camera", "Sees", "ROIs"]);

    for camera in scene.cameras().values() {
        let sees = summarize(camera);
        let rois = scene
            .rois_of(camera)
            .map(|roi| format!("{}: {}", roi.label(), summarize(roi)))
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            camera.label().to_string(),
            sees,
            if rois.is_empty() { "--".into() } else { rois },
        ]);
    }

    println!("{table}");
    println!();
}

fn summarize<D: Detector>(sensor: &D) -> String {
    let sorted = sensor.detections_sorted();
    if sorted.is_empty() {
        return "nothing".dimmed().to_string();
    }
    sorted
        .iter()
        .map(|(kind, seen)| format!("{} {kind}", seen.len()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn colorize_event(kind: &SimEventKind, description: &str) -> colored::ColoredString {
    match kind {
        SimEventKind::ProductionStarted { .. } => description.cyan(),
        SimEventKind::ProductionFinished { .. } => description.green(),
        SimEventKind::MoverStateChanged { .. } => description.blue(),
        SimEventKind::ItemsPurged { .. } => description.dimmed(),
    }
}
